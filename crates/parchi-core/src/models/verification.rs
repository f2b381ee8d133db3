use crate::constants::MAX_PUBLIC_ID_LEN;

/// `validator` length bounds are `u64`.
const MAX_PUBLIC_ID_LEN_U64: u64 = MAX_PUBLIC_ID_LEN as u64;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Verdict of comparing claimed and embedded capture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    LowConfidence,
    Unverified,
    Flagged,
}

impl VerificationStatus {
    /// Higher is more trustworthy. Used to check that the classification never
    /// rewards a larger distance.
    pub fn confidence_rank(self) -> u8 {
        match self {
            VerificationStatus::Verified => 3,
            VerificationStatus::LowConfidence => 2,
            VerificationStatus::Unverified => 1,
            VerificationStatus::Flagged => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::LowConfidence => "low_confidence",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Flagged => "flagged",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point on the Earth in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless both components are finite and inside their ranges.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Request sent by the client once the direct upload has finished
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    /// Device-reported capture latitude
    #[validate(range(min = -90.0, max = 90.0, message = "captureLat must be between -90 and 90"))]
    pub capture_lat: f64,
    /// Device-reported capture longitude
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "captureLon must be between -180 and 180"
    ))]
    pub capture_lon: f64,
    /// Storage reference returned by the provider (the `public_id` that was signed)
    #[validate(length(
        min = 1,
        max = MAX_PUBLIC_ID_LEN_U64,
        message = "publicId must be non-empty and within the length limit"
    ))]
    pub public_id: String,
}

impl CompleteUploadRequest {
    pub fn claimed_coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.capture_lat, self.capture_lon)
    }
}

/// Outcome of one verification attempt. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationResult {
    #[serde(rename = "imageId")]
    pub image_id: Uuid,
    #[serde(rename = "storageUrl")]
    pub storage_url: String,
    #[serde(rename = "verification_status")]
    pub status: VerificationStatus,
    #[serde(rename = "verification_reason")]
    pub reason: String,
    /// Great-circle distance between claimed and embedded coordinates, meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}
