//! `backdesk` -- CLI entry point.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        if !matches!(err, CliError::Aborted) {
            eprintln!("{} {err}", "error:".red().bold());
        }
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        // Config commands work without a backend connection.
        Command::Config(args) => commands::config_cmd::handle(args, &global),

        command => {
            let conn = config::connect(&global)?;
            match command {
                Command::Compliance(args) => {
                    commands::compliance::handle(&conn, args, &global).await
                }
                Command::Customers(args) => {
                    commands::customers::handle(&conn, args, &global).await
                }
                Command::Rewards(args) => commands::rewards::handle(&conn, args, &global).await,
                Command::Labels => commands::reference::labels(&conn, &global).await,
                Command::Announcements => {
                    commands::reference::announcements(&conn, &global).await
                }
                Command::Export(args) => commands::export_cmd::handle(&conn, args, &global).await,
                Command::Config(_) => Ok(()),
            }
        }
    }
}

/// Map -v flags onto a tracing filter. RUST_LOG wins when set.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("backdesk={default}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
