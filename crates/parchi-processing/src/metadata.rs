//! Geolocation metadata recovered from an image

use parchi_core::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Capture position embedded in an image, plus the optional fields cameras write next to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTag {
    pub coordinates: Coordinates,
    /// Meters above sea level (negative below)
    pub altitude_m: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geotag_serialization() {
        let tag = GeoTag {
            coordinates: Coordinates::new(37.775, -122.4195).unwrap(),
            altitude_m: None,
        };
        let json = serde_json::to_string(&tag).unwrap();
        let back: GeoTag = serde_json::from_str(&json).unwrap();
        assert_eq!(tag, back);
    }
}
