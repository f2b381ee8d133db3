//! Startup configuration checks beyond what `Config::validate` enforces on its own.

use anyhow::Result;
use parchi_core::{Config, StorageBackend};

/// Validate configuration and warn about settings that are legal but risky.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();
    if config.is_production() && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    if config.is_production() && config.upload.upload_url.starts_with("http://") {
        tracing::warn!(
            upload_url = %config.upload.upload_url,
            "UPLOAD_URL is not https; clients will send photos in clear text"
        );
    }

    if config.storage_backend() == StorageBackend::Local && config.is_production() {
        tracing::warn!(
            "Local storage backend in production - verification only sees files on this host"
        );
    }

    let max_mb = config.storage.max_asset_size_bytes / 1024 / 1024;
    if max_mb > 100 {
        tracing::warn!(
            max_asset_size_mb = max_mb,
            "MAX_ASSET_SIZE_MB is very high - every verification buffers the whole file"
        );
    }

    Ok(())
}
