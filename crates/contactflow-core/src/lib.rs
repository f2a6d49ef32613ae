/// Contactflow Core - Shared library for the Contactflow contact-form intake
///
/// This crate contains the submission model, configuration, persistence
/// gateway, OAuth2-backed mail client and notification dispatcher used by
/// the Contactflow API Lambda function.
pub mod constants;
pub mod email;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::IntakeError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
