use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Local usage dashboard for Codex seats")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding one `<seat>.json` credential file per seat
    #[arg(short = 's', long)]
    pub seats_dir: Option<PathBuf>,

    /// Web server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind the web server to
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Configuration errors surfaced to API callers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No seats directory in config file, env or CLI
    #[error("SEATS_DIRECTORY is not set")]
    SeatsDirectoryNotSet,
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Directory containing per-seat auth JSON files
    #[serde(default)]
    pub seats_directory: Option<PathBuf>,

    /// Upstream usage API settings
    #[serde(default)]
    pub usage: UsageSettings,

    /// Web server settings
    #[serde(default)]
    pub web: WebSettings,
}

/// Upstream usage API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSettings {
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the usage endpoint, relative to `base_url`
    #[serde(default = "default_usage_path")]
    pub path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://chatgpt.com/backend-api".to_string()
}

fn default_usage_path() -> String {
    "wham/usage".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for UsageSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_usage_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UsageSettings {
    /// Full usage endpoint URL (`{base_url}/{path}`)
    pub fn url(&self) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        format!("{}/{}", base, path)
    }
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSettings {
    /// Bind address
    #[serde(default = "default_web_bind")]
    pub bind: String,

    /// Web server port
    #[serde(default = "default_web_port")]
    pub port: u16,

    /// Shared secret required on API requests (unset = open, local-only use)
    #[serde(default)]
    pub secret: Option<String>,
}

fn default_web_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    3000
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            bind: default_web_bind(),
            port: default_web_port(),
            secret: None,
        }
    }
}

/// Read an env var, trimmed, ignoring empty values
fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::load_file(p);
            }
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("seat-meter/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/seat-meter/config.toml")),
            dirs::home_dir().map(|p| p.join(".seat-meter.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply environment overrides (env takes precedence over the config file)
    pub fn merge_env(&mut self) {
        if let Some(dir) = env_trimmed("SEATS_DIRECTORY") {
            self.seats_directory = Some(PathBuf::from(dir));
        }
        if let Some(base_url) = env_trimmed("CODEX_USAGE_BASE_URL") {
            self.usage.base_url = base_url;
        }
        if let Some(path) = env_trimmed("CODEX_USAGE_PATH") {
            self.usage.path = path;
        }
        if let Some(secret) = env_trimmed("DASHBOARD_SECRET") {
            self.web.secret = Some(secret);
        }
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(dir) = &cli.seats_dir {
            self.seats_directory = Some(dir.clone());
        }
        if let Some(port) = cli.port {
            self.web.port = port;
        }
        if let Some(bind) = &cli.bind {
            self.web.bind = bind.clone();
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_TIMEOUT_SECS: u64 = 1;

        if self.usage.timeout_secs < MIN_TIMEOUT_SECS {
            self.usage.timeout_secs = MIN_TIMEOUT_SECS;
        }
        self.web.secret = self
            .web
            .secret
            .take()
            .map(|secret| secret.trim().to_string())
            .filter(|secret| !secret.is_empty());
    }

    /// Configured seats directory, or an error if none is set
    pub fn seats_directory(&self) -> Result<&Path, ConfigError> {
        self.seats_directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::SeatsDirectoryNotSet)
    }
}
