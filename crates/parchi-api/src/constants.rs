//! API constants

/// Prefix for all upload endpoints
pub const API_PREFIX: &str = "/api";

/// Path the OpenAPI document is served at (under `API_PREFIX`)
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

/// Request body limit. Both endpoints take a few hundred bytes of JSON; the files
/// themselves go straight to the media provider.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
