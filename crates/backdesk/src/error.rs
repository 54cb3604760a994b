//! CLI error type. Every command handler returns `Result<(), CliError>`;
//! `main` renders the message and picks the exit code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] backdesk_config::ConfigError),

    #[error("{0}")]
    Core(#[from] backdesk_core::CoreError),

    #[error("{0}")]
    Api(#[from] backdesk_api::Error),

    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("aborted")]
    Aborted,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: validation problems get 2, everything else 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 2,
            _ => 1,
        }
    }
}
