use super::{canonical_string, SigningError, UploadSigner};
use hmac::{Hmac, Mac};
use parchi_core::config::UploadProviderConfig;
use parchi_core::SignatureAlgorithm;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Signer for the media provider's signed-upload scheme.
#[derive(Clone)]
pub struct ProviderSigner {
    api_key: String,
    secret: String,
    algorithm: SignatureAlgorithm,
}

impl ProviderSigner {
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        algorithm: SignatureAlgorithm,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            algorithm,
        }
    }

    pub fn from_config(config: &UploadProviderConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.signature_algorithm,
        )
    }
}

impl fmt::Debug for ProviderSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSigner")
            .field("api_key", &self.api_key)
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl UploadSigner for ProviderSigner {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    fn sign(&self, params: &BTreeMap<String, String>) -> Result<String, SigningError> {
        if self.secret.is_empty() {
            return Err(SigningError::MissingSecret);
        }

        let payload = canonical_string(params);
        if payload.is_empty() {
            return Err(SigningError::EmptyParams);
        }

        match self.algorithm {
            SignatureAlgorithm::Sha1 => Ok(digest_with_secret::<Sha1>(&payload, &self.secret)),
            SignatureAlgorithm::Sha256 => Ok(digest_with_secret::<Sha256>(&payload, &self.secret)),
            SignatureAlgorithm::HmacSha256 => {
                let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
                    .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
                mac.update(payload.as_bytes());
                Ok(hex::encode(mac.finalize().into_bytes()))
            }
        }
    }
}

/// Hex digest of the canonical payload immediately followed by the secret.
fn digest_with_secret<D: Digest>(payload: &str, secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(payload.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
