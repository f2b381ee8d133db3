//! Data models for the application
//!
//! Each sub-module covers one of the two request/response phases.

pub mod upload;
pub mod verification;

// Re-export all models for convenient imports
pub use upload::{
    IssuedUpload, PresignUploadRequest, PresignUploadResponse, UploadCredential, UploadSession,
};
pub use verification::{
    CompleteUploadRequest, Coordinates, VerificationResult, VerificationStatus,
};
