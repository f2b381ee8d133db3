//! Parchi API Library
//!
//! HTTP handlers, services and application setup for the upload verification service.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
pub mod signing;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
