//! Parchi Processing Library
//!
//! Everything the verification evaluator computes from an uploaded image: the embedded
//! GPS position, the great-circle distance to the claimed position, and the resulting
//! verification status.

pub mod classification;
pub mod exif_gps;
pub mod geodesy;
pub mod metadata;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use classification::{Classification, ClassificationPolicy};
pub use exif_gps::{ExifGpsExtractor, GpsExtractionError, GpsExtractor};
pub use geodesy::{haversine_distance_m, EARTH_MEAN_RADIUS_M};
pub use metadata::GeoTag;
