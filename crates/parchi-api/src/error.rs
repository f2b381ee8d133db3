//! HTTP error response conversion
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>` and let `?` turn
//! `AppError` (or anything convertible into it) into a consistently rendered response.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parchi_core::{AppError, ErrorMetadata, LogLevel};
use parchi_storage::StorageError;
use serde::de::DeserializeOwned;

pub use parchi_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: axum's trait, parchi-core's type).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Missing fields, wrong types and malformed JSON all become `invalid_request`.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidRequest(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(app_error_from_storage(err))
    }
}

/// Storage failures by cause: a missing object is the caller's problem, an unreachable or
/// failing backend is ours (and retryable).
pub fn app_error_from_storage(err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(key) => {
            AppError::NotFound(format!("No uploaded asset found for publicId '{}'", key))
        }
        StorageError::InvalidKey(msg) => AppError::InvalidRequest(msg),
        StorageError::TooLarge { size, limit } => AppError::InvalidRequest(format!(
            "Uploaded asset is {} bytes, above the {} byte verification limit",
            size, limit
        )),
        StorageError::Unavailable(msg)
        | StorageError::DownloadFailed(msg)
        | StorageError::BackendError(msg) => AppError::StorageUnavailable(msg),
        StorageError::IoError(err) => AppError::StorageUnavailable(format!("IO error: {}", err)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

/// JSON body extractor that renders deserialization failures as `ErrorResponse`.
/// Use this instead of `Json<T>` for request bodies.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let reason = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, reason, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, reason, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, reason, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

/// Body for `error`; details are included only outside production and for
/// non-sensitive errors.
pub fn error_body(error: &AppError, is_production: bool) -> ErrorResponse {
    let expose_details = !is_production && !error.is_sensitive();
    ErrorResponse {
        status: error.outcome().to_string(),
        reason: error.error_code().to_string(),
        message: error.client_message(),
        recoverable: error.is_recoverable(),
        suggested_action: error.suggested_action().map(String::from),
        details: expose_details.then(|| error.detailed_message()),
        error_type: expose_details.then(|| error.error_type().to_string()),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, is_production_env()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parchi_core::error::NO_EXIF_GPS_MESSAGE;

    #[test]
    fn test_storage_not_found_maps_to_not_found() {
        let err = app_error_from_storage(StorageError::NotFound("parchi/uploads/x".to_string()));
        match err {
            AppError::NotFound(msg) => assert!(msg.contains("parchi/uploads/x")),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_storage_outage_maps_to_unavailable() {
        for err in [
            StorageError::Unavailable("timeout".to_string()),
            StorageError::DownloadFailed("502".to_string()),
            StorageError::BackendError("boom".to_string()),
        ] {
            assert!(matches!(
                app_error_from_storage(err),
                AppError::StorageUnavailable(_)
            ));
        }
    }

    #[test]
    fn test_storage_too_large_is_invalid_request() {
        let err = app_error_from_storage(StorageError::TooLarge { size: 10, limit: 5 });
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_rejected_body_shape() {
        let err = AppError::MetadataExtractionFailed("no GPS".to_string());
        let json = serde_json::to_value(error_body(&err, true)).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "no_exif_gps");
        assert_eq!(json["message"], NO_EXIF_GPS_MESSAGE);
        assert!(json.get("details").is_none());
        assert!(json.get("distance_m").is_none());
    }

    #[test]
    fn test_details_only_outside_production() {
        let err = AppError::InvalidRequest("publicId is required".to_string());
        let dev = error_body(&err, false);
        assert_eq!(dev.error_type.as_deref(), Some("InvalidRequest"));
        assert!(dev.details.is_some());

        let prod = error_body(&err, true);
        assert!(prod.details.is_none());
        assert!(prod.error_type.is_none());
    }

    #[test]
    fn test_sensitive_errors_hide_details() {
        let err = AppError::SigningFailure("secret rejected by hmac".to_string());
        let body = error_body(&err, false);
        assert_eq!(body.status, "error");
        assert!(body.details.is_none());
        assert!(!body.message.contains("secret"));
    }
}
