//! GPS extraction from EXIF metadata.
//!
//! Cameras store latitude and longitude as three unsigned rationals (degrees, minutes,
//! seconds) plus a one-letter hemisphere reference. Some writers emit fewer components
//! (decimal minutes), which is accepted as long as the parts that are present are valid.

use crate::metadata::GeoTag;
use exif::{Exif, In, Reader, Tag, Value};
use parchi_core::models::Coordinates;
use std::io::Cursor;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GpsExtractionError {
    #[error("file carries no EXIF metadata")]
    NoExif,

    #[error("EXIF metadata has no GPS position")]
    NoGps,

    #[error("GPS receiver reported a void measurement")]
    VoidFix,

    #[error("malformed GPS metadata: {0}")]
    Malformed(String),
}

/// Reads the capture position embedded in an image file.
///
/// Implementations are synchronous and CPU-bound; async callers should run them on a
/// blocking thread.
pub trait GpsExtractor: Send + Sync {
    fn extract(&self, data: &[u8]) -> Result<GeoTag, GpsExtractionError>;
}

/// `GpsExtractor` backed by kamadak-exif. Supports every container the reader does
/// (JPEG, TIFF, HEIF, PNG, WebP).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifGpsExtractor;

impl ExifGpsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl GpsExtractor for ExifGpsExtractor {
    fn extract(&self, data: &[u8]) -> Result<GeoTag, GpsExtractionError> {
        let mut cursor = Cursor::new(data);
        let exif = Reader::new()
            .read_from_container(&mut cursor)
            .map_err(|e| match e {
                exif::Error::NotFound(_) => GpsExtractionError::NoExif,
                other => GpsExtractionError::Malformed(other.to_string()),
            })?;

        if let Some(status) = ascii_value(&exif, Tag::GPSStatus) {
            if status.eq_ignore_ascii_case("V") {
                return Err(GpsExtractionError::VoidFix);
            }
        }

        let latitude = signed_coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, 'N', 'S')?;
        let longitude =
            signed_coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, 'E', 'W')?;

        let coordinates = Coordinates::new(latitude, longitude).ok_or_else(|| {
            GpsExtractionError::Malformed(format!(
                "position out of range: {}, {}",
                latitude, longitude
            ))
        })?;

        let tag = GeoTag {
            coordinates,
            altitude_m: altitude(&exif),
        };

        tracing::debug!(
            latitude = tag.coordinates.latitude,
            longitude = tag.coordinates.longitude,
            altitude_m = ?tag.altitude_m,
            "Extracted EXIF GPS position"
        );

        Ok(tag)
    }
}

fn signed_coordinate(
    exif: &Exif,
    value_tag: Tag,
    ref_tag: Tag,
    positive: char,
    negative: char,
) -> Result<f64, GpsExtractionError> {
    let field = exif
        .get_field(value_tag, In::PRIMARY)
        .ok_or(GpsExtractionError::NoGps)?;

    let magnitude = dms_to_degrees(&field.value)
        .ok_or_else(|| GpsExtractionError::Malformed(format!("unreadable {}", value_tag)))?;

    let reference = ascii_value(exif, ref_tag)
        .and_then(|s| s.trim().chars().next())
        .map(|c| c.to_ascii_uppercase())
        .ok_or_else(|| GpsExtractionError::Malformed(format!("missing {}", ref_tag)))?;

    if reference == positive {
        Ok(magnitude)
    } else if reference == negative {
        Ok(-magnitude)
    } else {
        Err(GpsExtractionError::Malformed(format!(
            "unexpected {} value '{}'",
            ref_tag, reference
        )))
    }
}

/// Degrees/minutes/seconds rationals to decimal degrees.
fn dms_to_degrees(value: &Value) -> Option<f64> {
    let parts: Vec<f64> = match value {
        Value::Rational(v) => v
            .iter()
            .map(|r| (r.denom != 0).then(|| r.to_f64()))
            .collect::<Option<_>>()?,
        Value::SRational(v) => v
            .iter()
            .map(|r| (r.denom != 0).then(|| r.to_f64()))
            .collect::<Option<_>>()?,
        _ => return None,
    };

    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return None;
    }

    let scales = [1.0, 60.0, 3600.0];
    Some(parts.iter().zip(scales).map(|(p, s)| p / s).sum())
}

fn ascii_value(exif: &Exif, tag: Tag) -> Option<String> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn altitude(exif: &Exif) -> Option<f64> {
    let meters = match &exif.get_field(Tag::GPSAltitude, In::PRIMARY)?.value {
        Value::Rational(v) => v.first().filter(|r| r.denom != 0)?.to_f64(),
        _ => return None,
    };
    // GPSAltitudeRef: 0 = above sea level, 1 = below
    let below = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        == Some(1);
    Some(if below { -meters } else { meters })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        ascii_field, gps_fields, gps_fields_with_refs, jpeg_with_exif_but_no_gps,
        jpeg_with_fields, jpeg_with_gps, jpeg_with_gps_refs, jpeg_without_exif, primary_field,
    };
    use exif::Rational;

    #[test]
    fn test_extracts_northern_western_position() {
        let data = jpeg_with_gps(37.7750, -122.4195);
        let tag = ExifGpsExtractor::new().extract(&data).unwrap();
        assert!((tag.coordinates.latitude - 37.7750).abs() < 1e-6);
        assert!((tag.coordinates.longitude + 122.4195).abs() < 1e-6);
    }

    #[test]
    fn test_extracts_southern_eastern_position() {
        let data = jpeg_with_gps(-33.8688, 151.2093);
        let tag = ExifGpsExtractor::new().extract(&data).unwrap();
        assert!((tag.coordinates.latitude + 33.8688).abs() < 1e-6);
        assert!((tag.coordinates.longitude - 151.2093).abs() < 1e-6);
        assert_eq!(tag.altitude_m, None);
    }

    #[test]
    fn test_void_fix_is_rejected() {
        let mut fields = gps_fields(37.7750, -122.4195);
        fields.push(ascii_field(Tag::GPSStatus, "V"));
        let err = ExifGpsExtractor::new()
            .extract(&jpeg_with_fields(&fields))
            .unwrap_err();
        assert_eq!(err, GpsExtractionError::VoidFix);
    }

    #[test]
    fn test_active_fix_is_accepted() {
        let mut fields = gps_fields(37.7750, -122.4195);
        fields.push(ascii_field(Tag::GPSStatus, "A"));
        let tag = ExifGpsExtractor::new()
            .extract(&jpeg_with_fields(&fields))
            .unwrap();
        assert!((tag.coordinates.latitude - 37.7750).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_hemisphere_ref() {
        let err = ExifGpsExtractor::new()
            .extract(&jpeg_with_gps_refs(37.7750, 122.4195, "N", "X"))
            .unwrap_err();
        match err {
            GpsExtractionError::Malformed(msg) => assert!(msg.contains("GPSLongitudeRef")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_lowercase_hemisphere_ref() {
        let tag = ExifGpsExtractor::new()
            .extract(&jpeg_with_gps_refs(33.8688, 151.2093, "s", "e"))
            .unwrap();
        assert!((tag.coordinates.latitude + 33.8688).abs() < 1e-6);
        assert!((tag.coordinates.longitude - 151.2093).abs() < 1e-6);
    }

    #[test]
    fn test_missing_hemisphere_ref() {
        let fields: Vec<_> = gps_fields_with_refs(37.7750, 122.4195, "N", "W")
            .into_iter()
            .filter(|f| f.tag != Tag::GPSLatitudeRef)
            .collect();
        let err = ExifGpsExtractor::new()
            .extract(&jpeg_with_fields(&fields))
            .unwrap_err();
        match err {
            GpsExtractionError::Malformed(msg) => assert!(msg.contains("GPSLatitudeRef")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_latitude() {
        let err = ExifGpsExtractor::new()
            .extract(&jpeg_with_gps(95.0, 10.0))
            .unwrap_err();
        match err {
            GpsExtractionError::Malformed(msg) => assert!(msg.contains("out of range")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_altitude_below_sea_level() {
        let mut fields = gps_fields(31.5590, 35.4732);
        fields.push(primary_field(
            Tag::GPSAltitude,
            Value::Rational(vec![Rational { num: 125, denom: 10 }]),
        ));
        fields.push(primary_field(Tag::GPSAltitudeRef, Value::Byte(vec![1])));
        let tag = ExifGpsExtractor::new()
            .extract(&jpeg_with_fields(&fields))
            .unwrap();
        assert_eq!(tag.altitude_m, Some(-12.5));
    }

    #[test]
    fn test_altitude_above_sea_level() {
        let mut fields = gps_fields(46.5580, 7.8350);
        fields.push(primary_field(
            Tag::GPSAltitude,
            Value::Rational(vec![Rational { num: 3454, denom: 1 }]),
        ));
        fields.push(primary_field(Tag::GPSAltitudeRef, Value::Byte(vec![0])));
        let tag = ExifGpsExtractor::new()
            .extract(&jpeg_with_fields(&fields))
            .unwrap();
        assert_eq!(tag.altitude_m, Some(3454.0));
    }

    #[test]
    fn test_no_exif() {
        let err = ExifGpsExtractor::new()
            .extract(&jpeg_without_exif())
            .unwrap_err();
        assert_eq!(err, GpsExtractionError::NoExif);
    }

    #[test]
    fn test_exif_without_gps() {
        let err = ExifGpsExtractor::new()
            .extract(&jpeg_with_exif_but_no_gps())
            .unwrap_err();
        assert_eq!(err, GpsExtractionError::NoGps);
    }

    #[test]
    fn test_not_an_image() {
        let err = ExifGpsExtractor::new()
            .extract(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, GpsExtractionError::Malformed(_)));
    }

    #[test]
    fn test_empty_input() {
        assert!(ExifGpsExtractor::new().extract(&[]).is_err());
    }

    #[test]
    fn test_dms_conversion() {
        let value = Value::Rational(vec![
            exif::Rational { num: 37, denom: 1 },
            exif::Rational { num: 46, denom: 1 },
            exif::Rational {
                num: 2964,
                denom: 100,
            },
        ]);
        let degrees = dms_to_degrees(&value).unwrap();
        assert!((degrees - 37.7749).abs() < 1e-6);
    }

    #[test]
    fn test_dms_decimal_minutes() {
        let value = Value::Rational(vec![
            exif::Rational { num: 10, denom: 1 },
            exif::Rational { num: 30, denom: 1 },
        ]);
        assert_eq!(dms_to_degrees(&value), Some(10.5));
    }

    #[test]
    fn test_dms_rejects_zero_denominator() {
        let value = Value::Rational(vec![exif::Rational { num: 10, denom: 0 }]);
        assert_eq!(dms_to_degrees(&value), None);
    }

    #[test]
    fn test_dms_rejects_wrong_type() {
        assert_eq!(dms_to_degrees(&Value::Ascii(vec![b"37".to_vec()])), None);
    }
}
