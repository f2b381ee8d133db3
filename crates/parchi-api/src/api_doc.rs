//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use parchi_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parchi API",
        version = "0.1.0",
        description = "Signed direct uploads and capture-location verification for geotagged photos."
    ),
    paths(
        handlers::uploads::presign_upload,
        handlers::uploads::complete_upload,
    ),
    components(schemas(
        models::PresignUploadRequest,
        models::PresignUploadResponse,
        models::UploadCredential,
        models::CompleteUploadRequest,
        models::VerificationResult,
        models::VerificationStatus,
        ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Direct upload credentials and verification")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
