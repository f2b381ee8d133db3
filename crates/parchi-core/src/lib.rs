//! Parchi Core Library
//!
//! This crate provides core domain models, error types, configuration, and identifier
//! generation shared across all Parchi components.

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, SignatureAlgorithm, VerificationThresholds};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use ids::{IdGenerator, UuidV4Generator};
pub use storage_types::StorageBackend;
