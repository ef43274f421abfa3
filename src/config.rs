//! Configuration for HelixDesk, read from `.helixdesk/helixdesk.toml`.
//!
//! Values are layered: file → environment → CLI flags. The file is
//! optional; every key falls back to a default.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3001
//! data_file = ".helixdesk/db.json"
//! cors = true
//!
//! [logging]
//! level = "info"
//! json = false
//! dir = ".helixdesk/logs"
//!
//! [client]
//! api_base_url = "http://localhost:3001/api"
//! storage_dir = "/home/me/.local/share/helixdesk"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::server::ServerConfig;

/// Directory holding the config file, data file and logs by default.
pub const HELIX_DIR: &str = ".helixdesk";

/// Config file name inside [`HELIX_DIR`].
pub const CONFIG_FILE: &str = "helixdesk.toml";

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Permissive CORS so a browser front-end on another port can call in.
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_data_file() -> PathBuf {
    Path::new(HELIX_DIR).join("db.json")
}

fn default_cors() -> bool {
    true
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            cors: default_cors(),
        }
    }
}

impl ServerSection {
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            data_file: self.data_file.clone(),
            cors: self.cors,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Also write a daily-rolling log file here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            dir: None,
        }
    }
}

/// `[client]` section, used by the client stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSection {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_api_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("helixdesk"))
        .unwrap_or_else(|| Path::new(HELIX_DIR).join("storage"))
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_dir: default_storage_dir(),
        }
    }
}

/// Root of `helixdesk.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HelixToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub client: ClientSection,
}

impl HelixToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse helixdesk.toml")
    }

    /// Load `helixdesk.toml` from `dir`, or defaults if it doesn't exist.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicitly named file, or the default location.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_or_default(Path::new(HELIX_DIR)),
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize helixdesk.toml")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `HELIXDESK_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `HELIXDESK_*` overrides using `lookup` to read variables.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("HELIXDESK_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid HELIXDESK_PORT '{}'", port))?;
        }
        if let Some(host) = lookup("HELIXDESK_HOST") {
            self.server.host = host;
        }
        if let Some(path) = lookup("HELIXDESK_DATA_FILE") {
            self.server.data_file = PathBuf::from(path);
        }
        if let Some(json) = lookup("HELIXDESK_LOG_JSON") {
            self.logging.json = matches!(json.trim(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0: an ephemeral port will be chosen".to_string());
        }
        if self.server.host.trim().is_empty() {
            warnings.push("server.host is empty".to_string());
        }
        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            warnings.push(format!(
                "Invalid logging.level '{}': expected a level or filter directive",
                self.logging.level
            ));
        }
        if !self.client.api_base_url.starts_with("http://")
            && !self.client.api_base_url.starts_with("https://")
        {
            warnings.push(format!(
                "client.api_base_url '{}' should start with http:// or https://",
                self.client.api_base_url
            ));
        }

        warnings
    }
}
