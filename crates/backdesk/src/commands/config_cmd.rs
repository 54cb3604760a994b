//! Config command handlers: path, show, set-token.

use dialoguer::Password;

use backdesk_config::{config_path, load_config, store_token};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = config_path().ok_or_else(|| CliError::Validation {
                field: "config".into(),
                reason: "no config directory on this platform".into(),
            })?;
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let config = load_config(None)?;
            let out = toml::to_string_pretty(&config).map_err(|e| CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let token = Password::new()
                .with_prompt(format!("API token for profile '{profile}'"))
                .interact()
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
            store_token(&profile, &token)?;
            output::print_output("token stored", global.quiet);
            Ok(())
        }
    }
}
