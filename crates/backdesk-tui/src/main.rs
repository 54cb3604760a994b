//! `backdesk-tui` -- terminal console for the Backdesk CRM back-office.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive snapshots from
//! `backdesk-core`'s table sessions. Screens are navigable via number
//! keys (1-3): Compliance, Customers, Rewards.
//!
//! Logs are written to a file to avoid corrupting the terminal UI.
//! Background bridge tasks stream table snapshots and recoverable
//! events into the TUI action loop.

mod action;
mod app;
mod bridge;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use backdesk_api::{ApiClient, TlsMode, TransportConfig};
use backdesk_core::{JsonFileSettings, Settings};

use crate::app::App;

/// Terminal console for the Backdesk CRM back-office.
#[derive(Parser, Debug)]
#[command(name = "backdesk-tui", version, about)]
struct Cli {
    /// Backend URL (e.g., https://crm.example.com)
    #[arg(short = 's', long, env = "BACKDESK_SERVER")]
    server: Option<String>,

    /// Backend profile from backdesk.toml
    #[arg(short = 'p', long, env = "BACKDESK_PROFILE")]
    profile: Option<String>,

    /// API token (falls back to the OS keyring)
    #[arg(long, env = "BACKDESK_TOKEN", hide_env = true)]
    token: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(short = 'k', long, env = "BACKDESK_INSECURE")]
    insecure: bool,

    /// Log file path (defaults to the platform log dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr -- that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application so logs flush on exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("backdesk_tui={log_level}")));

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| backdesk_config::log_dir().map(|d| d.join("backdesk-tui.log")))
        .unwrap_or_else(|| PathBuf::from("backdesk-tui.log"));
    let log_dir = log_path
        .parent()
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    let log_name = log_path
        .file_name()
        .map_or_else(|| std::ffi::OsString::from("backdesk-tui.log"), ToOwned::to_owned);

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Build an authenticated [`ApiClient`] from CLI flags and config.
fn build_api(cli: &Cli) -> Result<Arc<ApiClient>> {
    let config = backdesk_config::load_config(None)?;
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let profile = config.profiles.get(&profile_name);

    let server = cli
        .server
        .clone()
        .or_else(|| profile.map(|p| p.server.clone()))
        .ok_or_else(|| eyre!("no backend: pass --server or configure a profile"))?;
    let url: url::Url = server
        .parse()
        .map_err(|e| eyre!("invalid server URL {server}: {e}"))?;

    let token = match &cli.token {
        Some(token) => SecretString::from(token.clone()),
        None => backdesk_config::resolve_token(&profile_name)?,
    };

    let insecure = cli.insecure || profile.and_then(|p| p.insecure).unwrap_or(false);
    let transport = TransportConfig {
        tls: if insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(30),
    };

    Ok(Arc::new(ApiClient::new(url, &token, &transport)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal.
    tui::install_hooks()?;

    // Tracing to file -- hold the guard so logs flush on exit.
    let _log_guard = setup_tracing(&cli);

    let api = build_api(&cli)?;
    info!("starting backdesk-tui");

    let settings = backdesk_config::settings_path().map_or_else(Settings::in_memory, |path| {
        Settings::new(Arc::new(JsonFileSettings::open(path)))
    });

    let mut app = App::new(api, settings);
    app.run().await?;

    Ok(())
}
