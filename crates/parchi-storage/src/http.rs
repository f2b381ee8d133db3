//! Read-back from the media provider's public delivery endpoint.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Storage backed by the provider's delivery URLs:
/// `{base_url}/{storage_key}[.{format}]`.
#[derive(Clone)]
pub struct HttpStorage {
    client: reqwest::Client,
    base_url: String,
    format: Option<String>,
    max_object_size: u64,
}

impl HttpStorage {
    /// Create a new HttpStorage instance
    ///
    /// # Arguments
    /// * `base_url` - Delivery prefix (e.g., "https://res.cloudinary.com/demo/image/upload")
    /// * `format` - Extension appended to keys when building URLs (e.g., "jpg")
    /// * `timeout` - Per-request timeout, connect through body
    /// * `max_object_size` - Largest object `download` will buffer, in bytes
    pub fn new(
        base_url: String,
        format: Option<String>,
        timeout: Duration,
        max_object_size: u64,
    ) -> StorageResult<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(StorageError::ConfigError(format!(
                "Delivery base URL must be http(s): {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("parchi-storage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpStorage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            format,
            max_object_size,
        })
    }

    fn url_for(&self, storage_key: &str) -> String {
        match &self.format {
            Some(format) => format!("{}/{}.{}", self.base_url, storage_key, format),
            None => format!("{}/{}", self.base_url, storage_key),
        }
    }

    fn map_status(status: StatusCode, storage_key: &str) -> StorageError {
        if status == StatusCode::NOT_FOUND {
            StorageError::NotFound(storage_key.to_string())
        } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            StorageError::Unavailable(format!("Delivery endpoint returned {}", status))
        } else {
            StorageError::DownloadFailed(format!("Delivery endpoint returned {}", status))
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Unavailable(format!("Delivery request timed out: {}", err))
    } else if err.is_connect() {
        StorageError::Unavailable(format!("Failed to connect to delivery endpoint: {}", err))
    } else {
        StorageError::DownloadFailed(err.to_string())
    }
}

#[async_trait]
impl Storage for HttpStorage {
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;
        let url = self.url_for(storage_key);
        let start = std::time::Instant::now();

        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                url = %url,
                key = %storage_key,
                status = %status,
                "Delivery endpoint returned an error status"
            );
            return Err(Self::map_status(status, storage_key));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_object_size {
                return Err(StorageError::TooLarge {
                    size: length,
                    limit: self.max_object_size,
                });
            }
        }

        let mut data = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(map_transport_error)? {
            let size = (data.len() + chunk.len()) as u64;
            if size > self.max_object_size {
                return Err(StorageError::TooLarge {
                    size,
                    limit: self.max_object_size,
                });
            }
            data.extend_from_slice(&chunk);
        }

        tracing::info!(
            url = %url,
            key = %storage_key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Delivery download successful"
        );

        Ok(data)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let response = self
            .client
            .head(self.url_for(storage_key))
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Self::map_status(status, storage_key)),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.url_for(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Http
    }
}
