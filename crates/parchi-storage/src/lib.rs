//! Parchi Storage Library
//!
//! This crate provides read access to assets that clients uploaded directly to the media
//! provider. It includes the `Storage` trait and implementations for the provider's HTTP
//! delivery endpoint and for the local filesystem.
//!
//! # Storage key format
//!
//! A storage key is the provider `public_id` the upload was signed for:
//! `{tenant_prefix}/uploads/{upload_id}`. Keys must not contain `..`, backslashes or a
//! leading `/`. Validation is centralized in the `keys` module so all backends agree.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-http")]
pub mod http;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-http")]
pub use http::HttpStorage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use parchi_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
