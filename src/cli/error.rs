//! CLI-level errors (wraps infrastructure and application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("Error loading configuration: {0}")]
    Config(#[source] ApplicationError),

    #[error("Error initializing client: {0}")]
    ClientInit(#[source] InfraError),

    #[error("Error bootstrapping: {0}")]
    Bootstrap(#[source] InfraError),

    #[error("{0}")]
    Render(#[source] ApplicationError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_)
            | CliError::Usage(_)
            | CliError::Config(_)
            | CliError::ClientInit(_)
            | CliError::Bootstrap(_)
            | CliError::Render(_) => exitcode::FAILURE,
        }
    }

    /// Whether a pointer to the help text should follow the message.
    pub fn wants_help_hint(&self) -> bool {
        matches!(self, CliError::InvalidArgs(_))
    }
}
