//! Upload signing.
//!
//! The provider secret lives only inside an [`UploadSigner`] implementation. Callers hand
//! over the parameters to sign and get back a hex digest; nothing else about the secret is
//! observable (it is redacted from `Debug` and never serialized).

mod provider;

pub use provider::ProviderSigner;

use parchi_core::{AppError, SignatureAlgorithm};
use std::collections::BTreeMap;
use subtle::ConstantTimeEq;

/// Parameters the provider sends alongside a signed upload but never includes in the
/// signature base.
const UNSIGNED_PARAMS: &[&str] = &["api_key", "cloud_name", "file", "resource_type", "signature"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("upload secret is not configured")]
    MissingSecret,

    #[error("no signable parameters supplied")]
    EmptyParams,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        AppError::SigningFailure(err.to_string())
    }
}

/// Signs direct-upload parameters on behalf of the client.
pub trait UploadSigner: Send + Sync {
    /// Public key sent to the client with every credential
    fn api_key(&self) -> &str;

    fn algorithm(&self) -> SignatureAlgorithm;

    /// Hex signature over the canonical form of `params`.
    fn sign(&self, params: &BTreeMap<String, String>) -> Result<String, SigningError>;

    /// Constant-time check of a signature previously produced by `sign`.
    fn verify(
        &self,
        params: &BTreeMap<String, String>,
        signature: &str,
    ) -> Result<bool, SigningError> {
        let expected = self.sign(params)?;
        Ok(expected
            .as_bytes()
            .ct_eq(signature.to_ascii_lowercase().as_bytes())
            .into())
    }
}

/// `key=value` pairs sorted by key and joined with `&`. Empty values and provider
/// transport fields are left out.
pub fn canonical_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(k, v)| !v.is_empty() && !UNSIGNED_PARAMS.contains(&k.as_str()))
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_canonical_string_is_sorted() {
        let p = params(&[
            ("timestamp", "1700000000"),
            ("folder", "parchi/uploads"),
            ("public_id", "parchi/uploads/abc"),
        ]);
        assert_eq!(
            canonical_string(&p),
            "folder=parchi/uploads&public_id=parchi/uploads/abc&timestamp=1700000000"
        );
    }

    #[test]
    fn test_canonical_string_skips_empty_and_transport_fields() {
        let p = params(&[
            ("api_key", "123"),
            ("folder", ""),
            ("public_id", "a"),
            ("resource_type", "image"),
        ]);
        assert_eq!(canonical_string(&p), "public_id=a");
    }

    #[test]
    fn test_signing_error_becomes_signing_failure() {
        let err: AppError = SigningError::MissingSecret.into();
        assert!(matches!(err, AppError::SigningFailure(_)));
    }
}
