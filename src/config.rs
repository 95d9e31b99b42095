//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::ah::models::{SortType, DEFAULT_TOLERANCE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.ah.nl";

/// Public anonymous client id used by the mobile app.
pub const DEFAULT_CLIENT_ID: &str = "appie";

/// Public anonymous client secret used by the mobile app.
pub const DEFAULT_CLIENT_SECRET: &str = "appie";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Anonymous client id
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Anonymous client secret
    #[serde(default = "default_client_secret")]
    pub client_secret: String,

    /// User-Agent override; the browser emulation's own agent is used otherwise
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Search: page size
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Search: sort order
    #[serde(default)]
    pub sort: Option<SortType>,

    /// Price search: tolerance around the target price
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

fn default_client_secret() -> String {
    DEFAULT_CLIENT_SECRET.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: default_client_id(),
            client_secret: default_client_secret(),
            user_agent: None,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            format: OutputFormat::Table,
            page_size: None,
            sort: None,
            tolerance: default_tolerance(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ah-client").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("AH_BASE_URL") {
            if !url.trim().is_empty() {
                self.base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(proxy) = std::env::var("AH_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(id) = std::env::var("AH_CLIENT_ID") {
            self.client_id = id;
        }

        if let Ok(secret) = std::env::var("AH_CLIENT_SECRET") {
            self.client_secret = secret;
        }

        if let Ok(timeout) = std::env::var("AH_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
