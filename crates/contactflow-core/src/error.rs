/// Error types for the contact intake pipeline
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum IntakeError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("All fields are required")]
    MissingFields,

    #[error("Server configuration error: missing {}", .0.join(", "))]
    ServerMisconfigured(Vec<String>),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<mongodb::error::Error> for IntakeError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<lettre::error::Error> for IntakeError {
    fn from(err: lettre::error::Error) -> Self {
        Self::Transport(format!("Failed to build message: {}", err))
    }
}

impl From<lettre::address::AddressError> for IntakeError {
    fn from(err: lettre::address::AddressError) -> Self {
        Self::Transport(format!("Invalid email address: {}", err))
    }
}
