use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use helixdesk::config::{CONFIG_FILE, HELIX_DIR, HelixToml};
use helixdesk::logging;

mod cmd;

#[derive(Parser)]
#[command(name = "helixdesk")]
#[command(version, about = "Business productivity dashboard backend")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to helixdesk.toml (defaults to .helixdesk/helixdesk.toml)
    #[arg(long, global = true, env = "HELIXDESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the REST API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// JSON data file
        #[arg(long)]
        data_file: Option<PathBuf>,

        /// Don't answer cross-origin requests
        #[arg(long)]
        no_cors: bool,
    },
    /// Create the data file
    Init {
        /// JSON data file
        #[arg(long)]
        data_file: Option<PathBuf>,

        /// Fill it with demo customers and a three-column board
        #[arg(long)]
        seed: bool,

        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default helixdesk.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Path::new(HELIX_DIR).join(CONFIG_FILE));
    let mut config = match &cli.command {
        Commands::Config { .. } if !config_path.exists() => HelixToml::default(),
        _ => HelixToml::resolve(cli.config.as_deref())?,
    };
    config.apply_env()?;

    let _log_guard = logging::init_tracing(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            data_file,
            no_cors,
        } => {
            cmd::cmd_serve(
                &config,
                cmd::serve::ServeOverrides {
                    port,
                    host,
                    data_file,
                    no_cors,
                },
            )
            .await?;
        }
        Commands::Init {
            data_file,
            seed,
            force,
        } => {
            let data_file = data_file.unwrap_or_else(|| config.server.data_file.clone());
            cmd::cmd_init(&data_file, seed, force)?;
        }
        Commands::Config { command } => {
            cmd::cmd_config(&config_path, &config, command)?;
        }
    }

    Ok(())
}
