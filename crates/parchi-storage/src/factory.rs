#[cfg(feature = "storage-http")]
use crate::HttpStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use parchi_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let settings = &config.storage;
    let max_object_size = settings.max_asset_size_bytes as u64;

    match config.storage_backend() {
        #[cfg(feature = "storage-http")]
        StorageBackend::Http => {
            let base_url = settings.delivery_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("STORAGE_DELIVERY_BASE_URL not configured".to_string())
            })?;

            let storage = HttpStorage::new(
                base_url,
                settings.delivery_format.clone(),
                Duration::from_secs(settings.timeout_secs),
                max_object_size,
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-http"))]
        StorageBackend::Http => Err(StorageError::ConfigError(
            "HTTP storage backend not available (storage-http feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = settings.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = settings.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url, max_object_size).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
