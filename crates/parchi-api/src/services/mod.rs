//! Domain services behind the upload endpoints

pub mod evaluator;
pub mod issuer;

pub use evaluator::VerificationEvaluator;
pub use issuer::CredentialIssuer;
