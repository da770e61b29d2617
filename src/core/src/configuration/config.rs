use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};

use super::types::{MonitorConfig, DEFAULT_PORT, EXCLUDED_PORT};
use crate::error_handling::types::ConfigError;

/// Command-line arguments.
///
/// Everything about *what* to monitor lives in the configuration file; the
/// command line only says where that file is and how to present output.
#[derive(Parser, Debug, Clone)]
#[command(name = "omon")]
#[command(version)]
#[command(about = "Passive monitor for anonymity-network stream traffic")]
pub struct Args {
    /// Path of the configuration file (`.json` or `.toml`)
    ///
    /// A default JSON file is written here if nothing exists yet.
    #[arg(long, short = 'c', env = "OMON_CONFIG", default_value = "omon.json")]
    pub config: PathBuf,

    /// Directory receiving the daily traffic log
    #[arg(long, env = "OMON_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,

    /// Disable ANSI colors on the console
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_color: bool,
}

impl MonitorConfig {
    /// Loads and validates a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML, everything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: MonitorConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))?
            }
            Some("json") | None => serde_json::from_str(&content)
                .map_err(|e| ConfigError::JsonError(e.to_string()))?,
            Some(other) => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        info!("Configuration loaded from {}", path.display());
        config.validate()
    }

    /// Rejects an empty cookie path list and removes the excluded port,
    /// falling back to the default port when none remain.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.cookie_paths.is_empty() {
            return Err(ConfigError::CookiePathsEmpty);
        }

        let before = self.ports.len();
        self.ports.retain(|p| p.trim() != EXCLUDED_PORT);
        if self.ports.len() != before {
            warn!("Ignoring port {} (browser-bundled daemon)", EXCLUDED_PORT);
        }
        if self.ports.is_empty() {
            warn!("No valid ports found; using default port {}", DEFAULT_PORT);
            self.ports.push(DEFAULT_PORT.to_string());
        }
        Ok(self)
    }

    /// Writes the default configuration as pretty JSON unless `path` exists.
    ///
    /// Returns `true` when a file was created.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        let data = serde_json::to_string_pretty(&MonitorConfig::default())
            .map_err(|e| ConfigError::JsonError(e.to_string()))?;
        fs::write(path, data)?;
        info!("Created default configuration file: {}", path.display());
        Ok(true)
    }
}
