//! Credential issuance for direct client-to-provider uploads.

use crate::signing::UploadSigner;
use chrono::{DateTime, Duration, Utc};
use parchi_core::constants::{
    uploads_folder, MAX_LOCAL_UPLOAD_ID_LEN, MAX_UPLOAD_VALIDITY_SECS,
};
use parchi_core::models::{IssuedUpload, UploadCredential, UploadSession};
use parchi_core::{AppError, IdGenerator};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Issues one signed upload credential per call.
///
/// Holds no mutable state; every call draws a fresh identifier from the shared generator,
/// so concurrent callers (even with the same `local_upload_id`) get distinct destinations.
pub struct CredentialIssuer {
    signer: Arc<dyn UploadSigner>,
    ids: Arc<dyn IdGenerator>,
    upload_url: String,
    folder: String,
    validity: Duration,
}

impl CredentialIssuer {
    pub fn new(
        signer: Arc<dyn UploadSigner>,
        ids: Arc<dyn IdGenerator>,
        upload_url: impl Into<String>,
        tenant_prefix: &str,
        validity_secs: u64,
    ) -> Self {
        Self {
            signer,
            ids,
            upload_url: upload_url.into(),
            folder: uploads_folder(tenant_prefix),
            validity: Duration::seconds(validity_secs.min(MAX_UPLOAD_VALIDITY_SECS) as i64),
        }
    }

    /// Folder every issued destination lives under
    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn issue(&self, local_upload_id: &str) -> Result<IssuedUpload, AppError> {
        self.issue_at(local_upload_id, Utc::now())
    }

    pub fn issue_at(
        &self,
        local_upload_id: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedUpload, AppError> {
        validate_local_upload_id(local_upload_id)?;

        let upload_id = self.ids.next_id();
        let public_id = format!("{}/{}", self.folder, upload_id);
        let timestamp = now.timestamp();

        let mut signed = BTreeMap::new();
        signed.insert("folder".to_string(), self.folder.clone());
        signed.insert("public_id".to_string(), public_id.clone());
        signed.insert("timestamp".to_string(), timestamp.to_string());
        let signature = self.signer.sign(&signed)?;

        // The timestamp travels as its own credential field.
        signed.remove("timestamp");

        let session = UploadSession {
            upload_id,
            local_upload_id: local_upload_id.to_string(),
            destination_public_id: public_id,
            created_at: now,
            expires_at: now + self.validity,
        };

        tracing::info!(
            upload_id = %session.upload_id,
            local_upload_id = %session.local_upload_id,
            public_id = %session.destination_public_id,
            expires_at = %session.expires_at,
            "Upload credential issued"
        );

        Ok(IssuedUpload {
            session,
            credential: UploadCredential {
                upload_url: self.upload_url.clone(),
                api_key: self.signer.api_key().to_string(),
                timestamp,
                signature,
                upload_params: signed,
            },
        })
    }
}

fn validate_local_upload_id(local_upload_id: &str) -> Result<(), AppError> {
    if local_upload_id.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "localUploadId must not be empty".to_string(),
        ));
    }
    if local_upload_id.chars().count() > MAX_LOCAL_UPLOAD_ID_LEN {
        return Err(AppError::InvalidRequest(format!(
            "localUploadId must be at most {} characters",
            MAX_LOCAL_UPLOAD_ID_LEN
        )));
    }
    if local_upload_id.chars().any(char::is_control) {
        return Err(AppError::InvalidRequest(
            "localUploadId must not contain control characters".to_string(),
        ));
    }
    Ok(())
}
