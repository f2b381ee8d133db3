use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use parchi_core::models::{
    CompleteUploadRequest, PresignUploadRequest, PresignUploadResponse, VerificationResult,
};
use std::sync::Arc;
use validator::Validate;

/// Issue signed credentials for a direct upload to the media provider
#[utoipa::path(
    post,
    path = "/api/uploads/presign",
    tag = "uploads",
    request_body = PresignUploadRequest,
    responses(
        (status = 200, description = "Upload credentials issued", body = PresignUploadResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Credentials could not be signed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        local_upload_id = %request.local_upload_id,
        operation = "presign_upload"
    )
)]
pub async fn presign_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PresignUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(parchi_core::AppError::from)?;

    let issued = state.issuer.issue(&request.local_upload_id)?;

    Ok(Json(PresignUploadResponse::from(issued)))
}

/// Verify an upload by comparing claimed and embedded capture coordinates
#[utoipa::path(
    post,
    path = "/api/uploads/complete",
    tag = "uploads",
    request_body = CompleteUploadRequest,
    responses(
        (status = 200, description = "Upload verified", body = VerificationResult),
        (status = 400, description = "Invalid request, or rejected: no EXIF GPS in the file", body = ErrorResponse),
        (status = 404, description = "No uploaded asset for publicId", body = ErrorResponse),
        (status = 503, description = "Media storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        public_id = %request.public_id,
        operation = "complete_upload"
    )
)]
pub async fn complete_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CompleteUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let result = state.evaluator.evaluate(&request).await?;

    Ok(Json(result))
}
