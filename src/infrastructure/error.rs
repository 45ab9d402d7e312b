//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Infrastructure errors wrap application errors and add transport-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{message}")]
    ClientInit { message: String },

    #[error("request failed: {message}")]
    Transport { message: String },

    #[error("Unexpected response code: {status} ({message})")]
    Api { status: u16, message: String },

    #[error("invalid response: {message}")]
    Decode { message: String },
}

impl InfraError {
    pub fn client_init(message: impl Into<String>) -> Self {
        Self::ClientInit {
            message: message.into(),
        }
    }
}

impl From<DomainError> for InfraError {
    fn from(e: DomainError) -> Self {
        Self::Application(ApplicationError::Domain(e))
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
