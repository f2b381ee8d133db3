//! Request bodies and photo fixtures.

#![allow(dead_code, unused_imports)]

use serde_json::{json, Value};

pub use parchi_processing::test_helpers::{
    jpeg_with_exif_but_no_gps, jpeg_with_gps, jpeg_with_gps_refs, jpeg_without_exif,
};

/// Claimed capture position used throughout the tests (San Francisco City Hall area).
pub const CLAIMED_LAT: f64 = 37.7749;
pub const CLAIMED_LON: f64 = -122.4194;

pub fn presign_body(local_upload_id: &str) -> Value {
    json!({ "localUploadId": local_upload_id })
}

pub fn complete_body(public_id: &str, lat: f64, lon: f64) -> Value {
    json!({
        "publicId": public_id,
        "captureLat": lat,
        "captureLon": lon,
    })
}
