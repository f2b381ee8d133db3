//! Storage setup and initialization

use anyhow::Result;
use parchi_core::Config;
use parchi_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = ?storage.backend_type(),
        max_asset_size_bytes = config.storage.max_asset_size_bytes,
        timeout_secs = config.storage.timeout_secs,
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
