//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p parchi-api`.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use parchi_api::constants;
use parchi_api::setup::{routes, services};
use parchi_api::state::AppState;
use parchi_core::{Config, StorageBackend};
use parchi_storage::{LocalStorage, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "test-api-key-123";
pub const TEST_API_SECRET: &str = "test-upload-secret-do-not-leak";
pub const LOCAL_BASE_URL: &str = "http://localhost:3000/media";

/// API path prefix for tests (e.g. `/api/uploads/presign`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, direct handle on the storage, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Stand-in for the client's direct upload to the provider.
    pub async fn seed_upload(&self, public_id: &str, data: &[u8]) {
        self.storage
            .upload_with_key(public_id, data)
            .await
            .expect("Failed to seed upload");
    }
}

pub fn test_config(storage_path: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("UPLOAD_URL", "https://upload.example.com/v1_1/demo/auto/upload"),
        ("UPLOAD_API_KEY", TEST_API_KEY),
        ("UPLOAD_API_SECRET", TEST_API_SECRET),
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", storage_path),
        ("LOCAL_STORAGE_BASE_URL", LOCAL_BASE_URL),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

/// Setup test app with local storage in a temporary directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

pub async fn setup_test_app_with(extra: &[(&str, &str)]) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(&path, extra);

    let storage = Arc::new(
        LocalStorage::new(
            temp_dir.path(),
            LOCAL_BASE_URL.to_string(),
            config.storage.max_asset_size_bytes as u64,
        )
        .await
        .expect("Failed to create local storage"),
    );

    let state = services::initialize_services(&config, storage.clone());
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to setup routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        state,
        storage,
        _temp_dir: temp_dir,
    }
}

/// Storage backend that is always down.
pub struct UnavailableStorage;

#[async_trait]
impl Storage for UnavailableStorage {
    async fn download(&self, _storage_key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://cdn.example.com/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Http
    }
}

/// Test server whose storage backend is unreachable.
pub fn setup_unavailable_storage_app() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(&path, &[]);
    let state = services::initialize_services(&config, Arc::new(UnavailableStorage));
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    (
        TestServer::new(app).expect("Failed to create test server"),
        temp_dir,
    )
}
