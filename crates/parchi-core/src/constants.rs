//! Application-wide constants.

/// Tenant prefix used for destination paths when `UPLOAD_TENANT_PREFIX` is not set.
pub const DEFAULT_TENANT_PREFIX: &str = "parchi";

/// Path segment under the tenant prefix that holds direct client uploads.
/// Destination layout: `{tenant_prefix}/uploads/{upload_id}`.
pub const UPLOADS_SEGMENT: &str = "uploads";

/// Upper bound for the client-supplied correlation token.
pub const MAX_LOCAL_UPLOAD_ID_LEN: usize = 128;

/// Upper bound for a storage reference (`publicId`) sent back by the client.
pub const MAX_PUBLIC_ID_LEN: usize = 255;

/// Longest accepted upload credential validity window (7 days).
pub const MAX_UPLOAD_VALIDITY_SECS: u64 = 7 * 24 * 3600;

/// Folder under which the given tenant's uploads are placed.
pub fn uploads_folder(tenant_prefix: &str) -> String {
    format!("{}/{}", tenant_prefix.trim_matches('/'), UPLOADS_SEGMENT)
}
