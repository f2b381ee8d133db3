//! Distance-banded verification policy.

use parchi_core::models::VerificationStatus;
use parchi_core::VerificationThresholds;

/// Verdict for one distance, with the human-readable reason shown to reviewers.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: VerificationStatus,
    pub reason: String,
}

/// Maps the distance between claimed and embedded positions onto a `VerificationStatus`.
///
/// Pure function of the distance and the configured bands: the same distance always yields
/// the same verdict, and a larger distance never yields a more trusted one. Upper bounds are
/// inclusive.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationPolicy {
    thresholds: VerificationThresholds,
}

impl ClassificationPolicy {
    /// Thresholds are expected to have passed `VerificationThresholds::validate`.
    pub fn new(thresholds: VerificationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> VerificationThresholds {
        self.thresholds
    }

    pub fn classify(&self, distance_m: f64) -> Classification {
        let t = &self.thresholds;

        // NaN compares false everywhere and falls through to flagged.
        let (status, reason) = if distance_m <= t.verified_max_m {
            (
                VerificationStatus::Verified,
                "EXIF and capture GPS match.".to_string(),
            )
        } else if distance_m <= t.low_confidence_max_m {
            (
                VerificationStatus::LowConfidence,
                format!(
                    "EXIF and capture GPS are close but outside the {} m tolerance.",
                    t.verified_max_m
                ),
            )
        } else if distance_m <= t.unverified_max_m {
            (
                VerificationStatus::Unverified,
                "EXIF and capture GPS have a measurable mismatch.".to_string(),
            )
        } else {
            (
                VerificationStatus::Flagged,
                "Large discrepancy between EXIF and capture GPS. Likely spoofed.".to_string(),
            )
        };

        Classification { status, reason }
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::new(VerificationThresholds::default())
    }
}
