// ── Core error types ──
//
// User-facing errors from backdesk-core. Consumers never see HTTP
// status codes or JSON parse failures directly; the `From` impl
// translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Backend unreachable: {message}")]
    Unreachable { message: String },

    /// Bulk mutation rejected. `message` is the backend-provided text
    /// when one was available, else a generic description.
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Export failed: {message}")]
    ExportFailed { message: String },

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },
}

impl From<backdesk_api::Error> for CoreError {
    fn from(err: backdesk_api::Error) -> Self {
        match err {
            backdesk_api::Error::Authentication { message } => {
                Self::AuthenticationFailed { message }
            }
            backdesk_api::Error::Forbidden { message } => Self::PermissionDenied { message },
            backdesk_api::Error::Transport(e) => Self::Unreachable {
                message: e.to_string(),
            },
            backdesk_api::Error::Timeout { timeout_secs } => Self::Unreachable {
                message: format!("request timed out after {timeout_secs}s"),
            },
            backdesk_api::Error::Api { message, status } => Self::Api {
                message,
                status: Some(status),
            },
            other => Self::Api {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<csv::Error> for CoreError {
    fn from(err: csv::Error) -> Self {
        Self::ExportFailed {
            message: err.to_string(),
        }
    }
}
