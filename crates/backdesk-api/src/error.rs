use thiserror::Error;

/// Top-level error type for the `backdesk-api` crate.
///
/// Covers every failure mode of the CRM REST surface: authentication,
/// transport, structured API errors, and payload decoding.
/// `backdesk-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected or session revoked.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Authenticated but not allowed to perform the operation.
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the backend. `message` is the
    /// backend-provided text when the body carried one.
    #[error("API error (HTTP {status}): {message}")]
    Api { message: String, status: u16 },

    /// Rate limited. Includes retry-after in seconds when reported.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The backend-provided message, when one exists.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
