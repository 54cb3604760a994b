//! CLI configuration -- thin wrapper around `backdesk_config` shared
//! types, adding resolution that respects `GlobalOpts` flag overrides
//! (--server, --token, --insecure).

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use backdesk_api::{ApiClient, TlsMode, TransportConfig};
use backdesk_config::{Config, Profile, load_config, resolve_token};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command handler needs to talk to one backend.
pub struct Connection {
    pub api: Arc<ApiClient>,
    pub per_page: u32,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build an authenticated [`ApiClient`] from config + flag overrides.
pub fn connect(global: &GlobalOpts) -> Result<Connection, CliError> {
    let config = load_config(None)?;
    let profile_name = active_profile_name(global, &config);

    // A --server flag works without any config file; otherwise the
    // profile must exist.
    let (server, profile): (String, Option<&Profile>) = match &global.server {
        Some(server) => (server.clone(), config.profiles.get(&profile_name)),
        None => {
            let profile = config.profile(&profile_name)?;
            (profile.server.clone(), Some(profile))
        }
    };

    let url: Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;
    tracing::debug!(profile = %profile_name, %url, "resolved backend");

    let token = match &global.token {
        Some(token) => SecretString::from(token.clone()),
        None => resolve_token(&profile_name)?,
    };

    let insecure = global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false);
    let tls = if insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsMode::CustomCa(ca)
    } else {
        TlsMode::System
    };

    let transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(global.timeout),
    };

    let per_page = profile
        .and_then(|p| p.per_page)
        .or(config.defaults.per_page)
        .unwrap_or(backdesk_core::PageRequest::DEFAULT_PER_PAGE);

    let api = ApiClient::new(url, &token, &transport)?;
    Ok(Connection {
        api: Arc::new(api),
        per_page,
    })
}
