//! Post-upload verification: compares the device-reported capture position with the one
//! embedded in the uploaded file.

use crate::error::app_error_from_storage;
use parchi_core::constants::uploads_folder;
use parchi_core::models::{CompleteUploadRequest, VerificationResult};
use parchi_core::{AppError, IdGenerator};
use parchi_processing::{haversine_distance_m, ClassificationPolicy, GpsExtractor};
use parchi_storage::keys::{is_within_folder, validate_key};
use parchi_storage::Storage;
use std::sync::Arc;
use validator::Validate;

pub struct VerificationEvaluator {
    storage: Arc<dyn Storage>,
    extractor: Arc<dyn GpsExtractor>,
    policy: ClassificationPolicy,
    ids: Arc<dyn IdGenerator>,
    folder: String,
}

impl VerificationEvaluator {
    pub fn new(
        storage: Arc<dyn Storage>,
        extractor: Arc<dyn GpsExtractor>,
        policy: ClassificationPolicy,
        ids: Arc<dyn IdGenerator>,
        tenant_prefix: &str,
    ) -> Self {
        Self {
            storage,
            extractor,
            policy,
            ids,
            folder: uploads_folder(tenant_prefix),
        }
    }

    /// Fetch the uploaded asset, read its embedded GPS position and classify the distance
    /// to the claimed one.
    ///
    /// A file without a usable geotag is rejected with `MetadataExtractionFailed`; storage
    /// failures surface as errors. Neither is ever turned into a verdict.
    pub async fn evaluate(
        &self,
        request: &CompleteUploadRequest,
    ) -> Result<VerificationResult, AppError> {
        request.validate()?;
        let claimed = request.claimed_coordinates().ok_or_else(|| {
            AppError::InvalidRequest("captureLat/captureLon must be finite coordinates".to_string())
        })?;

        let public_id = request.public_id.as_str();
        validate_key(public_id).map_err(|e| AppError::InvalidRequest(e.to_string()))?;
        if !is_within_folder(public_id, &self.folder) {
            return Err(AppError::InvalidRequest(format!(
                "publicId must reference an upload under {}/",
                self.folder
            )));
        }

        let data = self
            .storage
            .download(public_id)
            .await
            .map_err(app_error_from_storage)?;
        let size = data.len();

        // EXIF parsing is CPU-bound; keep it off the async workers.
        let extractor = self.extractor.clone();
        let geotag = tokio::task::spawn_blocking(move || extractor.extract(&data))
            .await
            .map_err(|e| AppError::Internal(format!("EXIF extraction task failed: {}", e)))?
            .map_err(|e| {
                tracing::warn!(public_id = %public_id, size, error = %e, "No usable EXIF GPS");
                AppError::MetadataExtractionFailed(e.to_string())
            })?;

        // Classify the reported (rounded) value so the verdict always agrees with it.
        let distance_m = round_to_decimeter(haversine_distance_m(claimed, geotag.coordinates));
        let classification = self.policy.classify(distance_m);
        let image_id = self.ids.next_id();

        tracing::info!(
            image_id = %image_id,
            public_id = %public_id,
            distance_m,
            status = %classification.status,
            "Upload verified"
        );

        Ok(VerificationResult {
            image_id,
            storage_url: self.storage.public_url(public_id),
            status: classification.status,
            reason: classification.reason,
            distance_m: Some(distance_m),
        })
    }
}

fn round_to_decimeter(meters: f64) -> f64 {
    (meters * 10.0).round() / 10.0
}
