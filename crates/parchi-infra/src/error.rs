//! HTTP error response body
//!
//! The `IntoResponse` implementation for `parchi_core::AppError` lives in the API crate
//! (orphan rule); this is only the serialized shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned for every failed request.
///
/// `status` is `"rejected"` when the upload was refused for a reason the user can fix by
/// retaking the photo, `"error"` otherwise. `reason` is a stable machine-readable code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub reason: String,
    pub message: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}
