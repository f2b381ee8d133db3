//! Configuration module
//!
//! This module provides the configuration structures for the API: server settings, the
//! upload provider (credentials and signing), storage read-back, and the verification
//! distance policy. Everything is read from environment variables (with `.env` support).

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_TENANT_PREFIX, MAX_UPLOAD_VALIDITY_SECS};
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const UPLOAD_VALIDITY_SECS: u64 = 3600;
const STORAGE_TIMEOUT_SECS: u64 = 10;
const MAX_ASSET_SIZE_MB: usize = 25;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const MIN_UPLOAD_SECRET_LEN: usize = 16;

// Default verification bands (meters)
const VERIFIED_MAX_M: f64 = 100.0;
const LOW_CONFIDENCE_MAX_M: f64 = 1_000.0;
const UNVERIFIED_MAX_M: f64 = 5_000.0;

/// Base server configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
    pub http_concurrency_limit: usize,
}

/// How upload signatures are computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// Hex SHA-1 over the canonical parameter string followed by the secret
    /// (the media provider's default account setting).
    Sha1,
    /// Same construction with SHA-256, for accounts switched to SHA-256 signatures.
    Sha256,
    /// Hex HMAC-SHA256 over the canonical parameter string, keyed by the secret.
    HmacSha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            "hmac-sha256" | "hmac_sha256" => Ok(SignatureAlgorithm::HmacSha256),
            _ => Err(anyhow::anyhow!("Invalid signature algorithm: {}", s)),
        }
    }
}

/// Upload provider configuration. The secret never leaves the server; `Debug` redacts it.
#[derive(Clone)]
pub struct UploadProviderConfig {
    pub upload_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub signature_algorithm: SignatureAlgorithm,
    pub tenant_prefix: String,
    pub validity_secs: u64,
}

impl fmt::Debug for UploadProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadProviderConfig")
            .field("upload_url", &self.upload_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("signature_algorithm", &self.signature_algorithm)
            .field("tenant_prefix", &self.tenant_prefix)
            .field("validity_secs", &self.validity_secs)
            .finish()
    }
}

/// Storage read-back configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub delivery_base_url: Option<String>,
    pub delivery_format: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_asset_size_bytes: usize,
}

/// Upper distance bounds (meters, inclusive) of the verification bands.
/// Anything beyond `unverified_max_m` is flagged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerificationThresholds {
    pub verified_max_m: f64,
    pub low_confidence_max_m: f64,
    pub unverified_max_m: f64,
}

impl Default for VerificationThresholds {
    fn default() -> Self {
        Self {
            verified_max_m: VERIFIED_MAX_M,
            low_confidence_max_m: LOW_CONFIDENCE_MAX_M,
            unverified_max_m: UNVERIFIED_MAX_M,
        }
    }
}

impl VerificationThresholds {
    /// Bands must be finite, positive and strictly increasing.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let bounds = [
            self.verified_max_m,
            self.low_confidence_max_m,
            self.unverified_max_m,
        ];
        if bounds.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(anyhow::anyhow!(
                "Verification thresholds must be finite positive distances"
            ));
        }
        if !(self.verified_max_m < self.low_confidence_max_m
            && self.low_confidence_max_m < self.unverified_max_m)
        {
            return Err(anyhow::anyhow!(
                "Verification thresholds must be strictly increasing: VERIFY_VERIFIED_MAX_M < VERIFY_LOW_CONFIDENCE_MAX_M < VERIFY_UNVERIFIED_MAX_M"
            ));
        }
        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upload: UploadProviderConfig,
    pub storage: StorageConfig,
    pub thresholds: VerificationThresholds,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins,
            environment,
            log_format: var("LOG_FORMAT")
                .unwrap_or_else(|| "pretty".to_string())
                .to_lowercase(),
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
        };

        let cloud_name = var("UPLOAD_CLOUD_NAME");

        let upload_url = var("UPLOAD_URL")
            .or_else(|| {
                cloud_name
                    .as_ref()
                    .map(|name| format!("https://api.cloudinary.com/v1_1/{}/auto/upload", name))
            })
            .ok_or_else(|| anyhow::anyhow!("UPLOAD_URL or UPLOAD_CLOUD_NAME must be set"))?;

        let upload = UploadProviderConfig {
            upload_url,
            api_key: var("UPLOAD_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("UPLOAD_API_KEY must be set"))?,
            api_secret: var("UPLOAD_API_SECRET")
                .ok_or_else(|| anyhow::anyhow!("UPLOAD_API_SECRET must be set"))?,
            signature_algorithm: match var("UPLOAD_SIGNATURE_ALGORITHM") {
                Some(algorithm) => algorithm.parse()?,
                None => SignatureAlgorithm::Sha1,
            },
            tenant_prefix: var("UPLOAD_TENANT_PREFIX")
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TENANT_PREFIX.to_string()),
            validity_secs: var("UPLOAD_VALIDITY_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(UPLOAD_VALIDITY_SECS),
        };

        let storage = StorageConfig {
            backend: match var("STORAGE_BACKEND") {
                Some(backend) => backend.parse()?,
                None => StorageBackend::Http,
            },
            delivery_base_url: var("STORAGE_DELIVERY_BASE_URL").or_else(|| {
                cloud_name
                    .as_ref()
                    .map(|name| format!("https://res.cloudinary.com/{}/image/upload", name))
            }),
            delivery_format: match var("STORAGE_DELIVERY_FORMAT") {
                Some(format) if format.eq_ignore_ascii_case("none") => None,
                Some(format) => Some(format.trim_start_matches('.').to_lowercase()),
                None => Some("jpg".to_string()),
            },
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            timeout_secs: var("STORAGE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(STORAGE_TIMEOUT_SECS),
            max_asset_size_bytes: var("MAX_ASSET_SIZE_MB")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(MAX_ASSET_SIZE_MB)
                .checked_mul(1024 * 1024)
                .ok_or_else(|| anyhow::anyhow!("MAX_ASSET_SIZE_MB is too large"))?,
        };

        let defaults = VerificationThresholds::default();
        let parse_threshold = |key: &str, default: f64| -> Result<f64, anyhow::Error> {
            match var(key) {
                Some(raw) => raw
                    .parse::<f64>()
                    .map_err(|_| anyhow::anyhow!("{} must be a number of meters", key)),
                None => Ok(default),
            }
        };
        let thresholds = VerificationThresholds {
            verified_max_m: parse_threshold("VERIFY_VERIFIED_MAX_M", defaults.verified_max_m)?,
            low_confidence_max_m: parse_threshold(
                "VERIFY_LOW_CONFIDENCE_MAX_M",
                defaults.low_confidence_max_m,
            )?,
            unverified_max_m: parse_threshold(
                "VERIFY_UNVERIFIED_MAX_M",
                defaults.unverified_max_m,
            )?,
        };

        let config = Config {
            base,
            upload,
            storage,
            thresholds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !matches!(self.base.log_format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'pretty' or 'json'"));
        }

        if self.upload.api_secret.len() < MIN_UPLOAD_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "UPLOAD_API_SECRET must be at least {} characters long",
                MIN_UPLOAD_SECRET_LEN
            ));
        }

        if !self.upload.upload_url.starts_with("https://")
            && !self.upload.upload_url.starts_with("http://")
        {
            return Err(anyhow::anyhow!("UPLOAD_URL must be an http(s) URL"));
        }

        if self.upload.tenant_prefix.is_empty() || self.upload.tenant_prefix.contains("..") {
            return Err(anyhow::anyhow!(
                "UPLOAD_TENANT_PREFIX must be a non-empty path without '..'"
            ));
        }

        if self.upload.validity_secs == 0 {
            return Err(anyhow::anyhow!("UPLOAD_VALIDITY_SECS cannot be 0"));
        }

        if self.upload.validity_secs > MAX_UPLOAD_VALIDITY_SECS {
            return Err(anyhow::anyhow!(
                "UPLOAD_VALIDITY_SECS cannot exceed {} seconds",
                MAX_UPLOAD_VALIDITY_SECS
            ));
        }

        match self.storage.backend {
            StorageBackend::Http => {
                if self.storage.delivery_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "STORAGE_DELIVERY_BASE_URL or UPLOAD_CLOUD_NAME must be set when using the http storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.storage.timeout_secs == 0 {
            return Err(anyhow::anyhow!("STORAGE_TIMEOUT_SECS cannot be 0"));
        }

        if self.storage.max_asset_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_ASSET_SIZE_MB cannot be 0"));
        }

        self.thresholds.validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn tenant_prefix(&self) -> &str {
        &self.upload.tenant_prefix
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn thresholds(&self) -> VerificationThresholds {
        self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("UPLOAD_CLOUD_NAME", "demo"),
        ("UPLOAD_API_KEY", "1234567890"),
        ("UPLOAD_API_SECRET", "0123456789abcdef0123"),
    ];

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_lookup(lookup(MINIMAL)).unwrap();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.tenant_prefix(), "parchi");
        assert_eq!(
            config.upload.upload_url,
            "https://api.cloudinary.com/v1_1/demo/auto/upload"
        );
        assert_eq!(
            config.storage.delivery_base_url.as_deref(),
            Some("https://res.cloudinary.com/demo/image/upload")
        );
        assert_eq!(config.storage.delivery_format.as_deref(), Some("jpg"));
        assert_eq!(config.storage_backend(), StorageBackend::Http);
        assert_eq!(config.upload.signature_algorithm, SignatureAlgorithm::Sha1);
        assert_eq!(config.thresholds(), VerificationThresholds::default());
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("UPLOAD_CLOUD_NAME", "demo"),
            ("UPLOAD_API_KEY", "1234567890"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("UPLOAD_CLOUD_NAME", "demo"),
            ("UPLOAD_API_KEY", "1234567890"),
            ("UPLOAD_API_SECRET", "short"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("ENVIRONMENT", "production"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        pairs.push(("CORS_ORIGINS", "https://app.example.com"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_non_monotonic_thresholds_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("VERIFY_LOW_CONFIDENCE_MAX_M", "50"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("STORAGE_BACKEND", "local"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        pairs.push(("LOCAL_STORAGE_PATH", "/tmp/parchi"));
        pairs.push(("LOCAL_STORAGE_BASE_URL", "http://localhost:3000/media"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.storage_backend(), StorageBackend::Local);
    }

    #[test]
    fn test_oversized_asset_limit_is_rejected() {
        let huge = usize::MAX.to_string();
        let mut pairs: Vec<(&str, &str)> = MINIMAL.to_vec();
        pairs.push(("MAX_ASSET_SIZE_MB", huge.as_str()));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("MAX_ASSET_SIZE_MB"));

        let mut pairs = MINIMAL.to_vec();
        pairs.push(("MAX_ASSET_SIZE_MB", "5"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.storage.max_asset_size_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(lookup(MINIMAL)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("0123456789abcdef0123"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_signature_algorithm_parse() {
        assert_eq!(
            "HMAC-SHA256".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::HmacSha256
        );
        assert_eq!(
            " SHA1 ".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Sha1
        );
        assert_eq!(
            "sha256".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Sha256
        );
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }
}
