//! Fixture builders for tests: minimal JPEG files with and without embedded GPS.
//!
//! The files contain no scan data, only the markers the EXIF reader walks through, which
//! keeps them small enough to build inline in every test.

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use std::io::Cursor;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];
const APP0_JFIF: [u8; 18] = [
    0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
    0x01, 0x00, 0x00,
];

/// JPEG whose EXIF GPS block places the capture at `latitude`, `longitude`.
pub fn jpeg_with_gps(latitude: f64, longitude: f64) -> Vec<u8> {
    jpeg_with_fields(&gps_fields(latitude, longitude))
}

/// JPEG with the given magnitudes and raw hemisphere references, for files whose GPS block
/// does not follow the EXIF conventions.
pub fn jpeg_with_gps_refs(
    latitude: f64,
    longitude: f64,
    lat_ref: &str,
    lon_ref: &str,
) -> Vec<u8> {
    jpeg_with_fields(&gps_fields_with_refs(latitude, longitude, lat_ref, lon_ref))
}

/// GPS latitude/longitude fields with hemisphere references derived from the signs.
pub fn gps_fields(latitude: f64, longitude: f64) -> Vec<Field> {
    let lat_ref = if latitude < 0.0 { "S" } else { "N" };
    let lon_ref = if longitude < 0.0 { "W" } else { "E" };
    gps_fields_with_refs(latitude, longitude, lat_ref, lon_ref)
}

pub fn gps_fields_with_refs(
    latitude: f64,
    longitude: f64,
    lat_ref: &str,
    lon_ref: &str,
) -> Vec<Field> {
    vec![
        ascii_field(Tag::GPSLatitudeRef, lat_ref),
        primary_field(Tag::GPSLatitude, degrees_to_dms(latitude.abs())),
        ascii_field(Tag::GPSLongitudeRef, lon_ref),
        primary_field(Tag::GPSLongitude, degrees_to_dms(longitude.abs())),
    ]
}

/// JPEG with EXIF (camera make only) but no GPS block.
pub fn jpeg_with_exif_but_no_gps() -> Vec<u8> {
    jpeg_with_fields(&[ascii_field(Tag::Make, "Parchi Test Camera")])
}

/// Plain JFIF JPEG without any EXIF segment.
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut out = Vec::with_capacity(SOI.len() + APP0_JFIF.len() + EOI.len());
    out.extend_from_slice(&SOI);
    out.extend_from_slice(&APP0_JFIF);
    out.extend_from_slice(&EOI);
    out
}

pub fn ascii_field(tag: Tag, text: &str) -> Field {
    primary_field(tag, Value::Ascii(vec![text.as_bytes().to_vec()]))
}

pub fn primary_field(tag: Tag, value: Value) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value,
    }
}

fn degrees_to_dms(degrees: f64) -> Value {
    let whole = degrees.trunc();
    let minutes_total = (degrees - whole) * 60.0;
    let minutes = minutes_total.trunc();
    let seconds = (minutes_total - minutes) * 60.0;
    Value::Rational(vec![
        Rational {
            num: whole as u32,
            denom: 1,
        },
        Rational {
            num: minutes as u32,
            denom: 1,
        },
        Rational {
            num: (seconds * 10_000.0).round() as u32,
            denom: 10_000,
        },
    ])
}

/// Minimal JPEG carrying an EXIF segment with exactly `fields`.
pub fn jpeg_with_fields(fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer
        .write(&mut tiff, false)
        .expect("fixture EXIF should serialize");
    let tiff = tiff.into_inner();

    // APP1 length counts itself (2 bytes) plus the "Exif\0\0" header and the TIFF body.
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("fixture EXIF fits in APP1");

    let mut out = Vec::with_capacity(tiff.len() + 16);
    out.extend_from_slice(&SOI);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&EOI);
    out
}
