//! API server command (`helixdesk serve`).

use anyhow::Result;
use std::path::PathBuf;

use helixdesk::backend::server::{ServerConfig, start_server};
use helixdesk::config::HelixToml;

/// Flag values that override the config file.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub data_file: Option<PathBuf>,
    pub no_cors: bool,
}

pub fn server_config(config: &HelixToml, overrides: ServeOverrides) -> ServerConfig {
    let mut server = config.server.to_server_config();
    if let Some(port) = overrides.port {
        server.port = port;
    }
    if let Some(host) = overrides.host {
        server.host = host;
    }
    if let Some(data_file) = overrides.data_file {
        server.data_file = data_file;
    }
    if overrides.no_cors {
        server.cors = false;
    }
    server
}

pub async fn cmd_serve(config: &HelixToml, overrides: ServeOverrides) -> Result<()> {
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }
    start_server(server_config(config, overrides)).await
}
