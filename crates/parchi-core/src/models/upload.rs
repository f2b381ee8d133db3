use crate::constants::MAX_LOCAL_UPLOAD_ID_LEN;

/// `validator` length bounds are `u64`.
const MAX_LOCAL_UPLOAD_ID_LEN_U64: u64 = MAX_LOCAL_UPLOAD_ID_LEN as u64;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A single direct-upload authorization handed to one client. Sessions are logged at
/// issuance and not stored; the provider enforces expiry through the signed timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSession {
    pub upload_id: Uuid,
    pub local_upload_id: String,
    pub destination_public_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UploadSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Credential bundle the client presents to the media provider.
///
/// `timestamp` is the issuance time in whole seconds since the epoch; the provider rejects
/// the signature once its validity window has passed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredential {
    /// Provider endpoint the client posts the file to
    pub upload_url: String,
    /// Public API key of the provider account
    pub api_key: String,
    /// Issuance time, seconds since epoch
    pub timestamp: i64,
    /// Signature over `uploadParams` and `timestamp`
    pub signature: String,
    /// Provider field names to values (includes `public_id` and `folder`)
    pub upload_params: BTreeMap<String, String>,
}

/// Issuer output: the credential plus the session it opened.
#[derive(Debug, Clone)]
pub struct IssuedUpload {
    pub session: UploadSession,
    pub credential: UploadCredential,
}

/// Request for upload credentials
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PresignUploadRequest {
    /// Client-side correlation token, echoed into logs only
    #[validate(length(
        min = 1,
        max = MAX_LOCAL_UPLOAD_ID_LEN_U64,
        message = "localUploadId must be non-empty and within the length limit"
    ))]
    pub local_upload_id: String,
}

/// Response containing the upload identifier and credentials
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignUploadResponse {
    pub upload_id: Uuid,
    pub upload: UploadCredential,
}

impl From<IssuedUpload> for PresignUploadResponse {
    fn from(issued: IssuedUpload) -> Self {
        Self {
            upload_id: issued.session.upload_id,
            upload: issued.credential,
        }
    }
}
