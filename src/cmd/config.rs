//! Configuration view and validation commands (`helixdesk config`).

use anyhow::{Context, Result};
use std::path::Path;

use super::super::ConfigCommands;
use helixdesk::config::HelixToml;

pub fn cmd_config(
    config_path: &Path,
    effective: &HelixToml,
    command: Option<ConfigCommands>,
) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("HelixDesk Configuration");
            println!("=======================");
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No config file at {} (using defaults)", config_path.display());
            }
            println!();
            println!("Effective values (with env/CLI overrides):");
            println!();
            let rendered = toml::to_string_pretty(effective)
                .context("Failed to render configuration")?;
            println!("{}", rendered);
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = effective.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("Config already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            HelixToml::default().save(config_path)?;

            println!("Created {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] host, port, data_file, cors");
            println!("  - [logging] level, json, dir");
            println!("  - [client] api_base_url, storage_dir");
            println!();
        }
    }

    Ok(())
}
