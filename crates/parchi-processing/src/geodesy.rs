//! Great-circle distance on a spherical Earth.
//!
//! Haversine on the IUGG mean-radius sphere. Against the WGS84 ellipsoid the error stays
//! below 0.5%, far inside the gaps between verification bands.

use parchi_core::models::Coordinates;

/// IUGG mean Earth radius, meters
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Distance in meters between two points.
pub fn haversine_distance_m(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards against h drifting just past 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_MEAN_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn test_zero_distance() {
        let p = point(37.7749, -122.4194);
        assert_eq!(haversine_distance_m(p, p), 0.0);
    }

    #[test]
    fn test_nearby_points_are_meters_apart() {
        let d = haversine_distance_m(point(37.7749, -122.4194), point(37.7750, -122.4195));
        assert!(d > 5.0 && d < 20.0, "distance was {}", d);
    }

    #[test]
    fn test_several_kilometers() {
        let d = haversine_distance_m(point(37.7749, -122.4194), point(37.8, -122.5));
        assert!(d > 7_000.0 && d < 8_000.0, "distance was {}", d);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_distance_m(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 10.0, "distance was {}", d);
    }

    #[test]
    fn test_symmetric() {
        let a = point(51.5074, -0.1278);
        let b = point(48.8566, 2.3522);
        let ab = haversine_distance_m(a, b);
        let ba = haversine_distance_m(b, a);
        assert!((ab - ba).abs() < 1e-6);
        assert!((ab - 343_500.0).abs() < 1_500.0, "distance was {}", ab);
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_distance_m(point(0.0, 0.0), point(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_MEAN_RADIUS_M;
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_crosses_antimeridian() {
        let d = haversine_distance_m(point(0.0, 179.9995), point(0.0, -179.9995));
        assert!(d < 200.0, "distance was {}", d);
    }
}
