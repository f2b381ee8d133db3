//! Error types module
//!
//! All request-level failures are unified under the `AppError` enum. Each variant describes
//! its own HTTP presentation through the `ErrorMetadata` trait, so the API layer renders
//! every error the same way (status, machine-readable reason, message, logging).

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for user-actionable rejections
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable reason code (e.g., "no_exif_gps")
    fn error_code(&self) -> &'static str;

    /// Outcome label carried in the response body: "rejected" for verification
    /// rejections the user can act on, "error" otherwise.
    fn outcome(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Metadata extraction failed: {0}")]
    MetadataExtractionFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Signing failure: {0}")]
    SigningFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(format!("Validation error: {}", err))
    }
}

/// Message shown to users whose photo carries no usable geotag.
pub const NO_EXIF_GPS_MESSAGE: &str = "Server failed to extract EXIF GPS from the uploaded file. \
Please ensure geotagging is enabled and retake the photo.";

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::InvalidRequest(_) => (
            400,
            "invalid_request",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::MetadataExtractionFailed(_) => (
            400,
            "no_exif_gps",
            false,
            Some("Enable geotagging in the camera settings and retake the photo"),
            false,
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            404,
            "not_found",
            false,
            Some("Verify the upload finished and the publicId is correct"),
            false,
            LogLevel::Debug,
        ),
        AppError::StorageUnavailable(_) => (
            503,
            "storage_unavailable",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::SigningFailure(_) => (
            500,
            "signing_failure",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "internal_error",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::MetadataExtractionFailed(_) => "MetadataExtractionFailed",
            AppError::NotFound(_) => "NotFound",
            AppError::StorageUnavailable(_) => "StorageUnavailable",
            AppError::SigningFailure(_) => "SigningFailure",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn outcome(&self) -> &'static str {
        match self {
            AppError::MetadataExtractionFailed(_) => "rejected",
            _ => "error",
        }
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidRequest(ref msg) => msg.clone(),
            AppError::MetadataExtractionFailed(_) => NO_EXIF_GPS_MESSAGE.to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::StorageUnavailable(_) => {
                "Media storage is temporarily unavailable".to_string()
            }
            AppError::SigningFailure(_) => "Failed to issue upload credentials".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
