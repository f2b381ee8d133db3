//! Application state shared by all handlers.
//!
//! Everything here is built once at startup and never mutated, so handlers share it
//! through `Arc<AppState>` without locks.

use crate::services::{CredentialIssuer, VerificationEvaluator};
use crate::signing::UploadSigner;
use parchi_storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub signer: Arc<dyn UploadSigner>,
    pub issuer: CredentialIssuer,
    pub evaluator: VerificationEvaluator,
}
