//! Shared storage key validation.
//!
//! Key format: `{tenant_prefix}/uploads/{upload_id}`. All backends validate keys here
//! before touching the network or the filesystem.

use crate::traits::{StorageError, StorageResult};

const MAX_KEY_LEN: usize = 255;

/// Reject keys that could escape the storage root or confuse URL building.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.len() > MAX_KEY_LEN {
        return Err(StorageError::InvalidKey(
            "Storage key must be between 1 and 255 characters".to_string(),
        ));
    }

    if storage_key.starts_with('/') || storage_key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.');
    if !storage_key.chars().all(allowed) || storage_key.contains("//") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

/// True when `storage_key` names an object directly or indirectly below `folder`.
pub fn is_within_folder(storage_key: &str, folder: &str) -> bool {
    let folder = folder.trim_end_matches('/');
    storage_key
        .strip_prefix(folder)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty())
}
