//! Service initialization and application state setup

use crate::services::{CredentialIssuer, VerificationEvaluator};
use crate::signing::{ProviderSigner, UploadSigner};
use crate::state::AppState;
use parchi_core::{Config, IdGenerator, UuidV4Generator};
use parchi_processing::{ClassificationPolicy, ExifGpsExtractor};
use parchi_storage::Storage;
use std::sync::Arc;

/// Wire signer, identifier generator, issuer and evaluator around the given storage.
pub fn initialize_services(config: &Config, storage: Arc<dyn Storage>) -> Arc<AppState> {
    let ids: Arc<dyn IdGenerator> = Arc::new(UuidV4Generator);
    let signer: Arc<dyn UploadSigner> = Arc::new(ProviderSigner::from_config(&config.upload));

    let issuer = CredentialIssuer::new(
        signer.clone(),
        ids.clone(),
        config.upload.upload_url.clone(),
        config.tenant_prefix(),
        config.upload.validity_secs,
    );

    let policy = ClassificationPolicy::new(config.thresholds());
    let evaluator = VerificationEvaluator::new(
        storage.clone(),
        Arc::new(ExifGpsExtractor::new()),
        policy,
        ids,
        config.tenant_prefix(),
    );

    tracing::info!(
        folder = %issuer.folder(),
        signature_algorithm = ?signer.algorithm(),
        verified_max_m = policy.thresholds().verified_max_m,
        low_confidence_max_m = policy.thresholds().low_confidence_max_m,
        unverified_max_m = policy.thresholds().unverified_max_m,
        "Upload services initialized"
    );

    Arc::new(AppState {
        storage,
        signer,
        issuer,
        evaluator,
    })
}
