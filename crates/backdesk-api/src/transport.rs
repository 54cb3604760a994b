// Shared transport configuration for building reqwest::Client instances.
//
// Every ApiClient goes through this module so TLS, timeout, and default
// header handling stay in one place.

use std::path::PathBuf;
use std::time::Duration;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-hosted backends behind internal CAs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    ///
    /// Used by [`ApiClient`](crate::ApiClient) to inject the
    /// `Authorization: Bearer` header on every request.
    pub fn build_client_with_headers(
        &self,
        headers: reqwest::header::HeaderMap,
    ) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("backdesk/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|e| crate::error::Error::Api {
                    message: format!("failed to read CA cert: {e}"),
                    status: 0,
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem).map_err(|e| {
                    crate::error::Error::Api {
                        message: format!("invalid CA cert: {e}"),
                        status: 0,
                    }
                })?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder.build().map_err(crate::error::Error::Transport)
    }
}
