//! Configuration file parsing and auth-token storage
//!
//! Configuration is an explicit struct handed to the data-access layer
//! at construction time; nothing reads ambient global state.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::warn;

use crate::data::DataSource;
use crate::error::DashError;
use crate::units::Thresholds;

/// Application configuration loaded from config.txt
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote backend
    pub base_url: String,
    /// Version segment prefixed to every request path, e.g. "v1"
    pub api_version: String,
    /// Remote request timeout in seconds
    pub timeout_secs: u64,
    /// Normal-range thresholds used for classification
    pub thresholds: Thresholds,
    /// Default reading source
    pub data_source: DataSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.glucodash.example".to_string(),
            api_version: "v1".to_string(),
            timeout_secs: 30,
            thresholds: Thresholds::default(),
            data_source: DataSource::Synthetic,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DashError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut config = AppConfig::default();
        let mut threshold_low = config.thresholds.low;
        let mut threshold_high = config.thresholds.high;

        for line in reader.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse "key value" or "key value # comment"
            let Some((key, rest)) = Self::parse_line(line) else {
                continue;
            };
            let value = rest.split('#').next().unwrap_or("").trim();
            if value.is_empty() {
                warn!("Ignoring config key with empty value: {}", key);
                continue;
            }

            match key {
                "base_url" => config.base_url = value.trim_end_matches('/').to_string(),
                "api_version" => config.api_version = value.to_string(),
                "timeout_secs" => {
                    config.timeout_secs = value
                        .parse()
                        .map_err(|_| DashError::Config(format!("bad timeout_secs: {}", value)))?;
                }
                "threshold_low" => {
                    threshold_low = value
                        .parse()
                        .map_err(|_| DashError::Config(format!("bad threshold_low: {}", value)))?;
                }
                "threshold_high" => {
                    threshold_high = value
                        .parse()
                        .map_err(|_| DashError::Config(format!("bad threshold_high: {}", value)))?;
                }
                "data_source" => {
                    config.data_source = DataSource::parse(value).ok_or_else(|| {
                        DashError::Config(format!("bad data_source: {}", value))
                    })?;
                }
                other => warn!("Unknown config key: {}", other),
            }
        }

        config.thresholds = Thresholds::new(threshold_low, threshold_high)?;
        Ok(config)
    }

    /// Parse a single config line, returning (key, value)
    fn parse_line(line: &str) -> Option<(&str, &str)> {
        let mut parts = line.splitn(2, |c: char| c.is_whitespace());
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();

        if key.is_empty() || value.is_empty() {
            return None;
        }

        Some((key, value))
    }

    /// Write a commented default config file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<(), DashError> {
        let mut file = File::create(path)?;
        writeln!(file, "# glucodash configuration")?;
        writeln!(file, "#")?;
        writeln!(file, "# base_url       https://api.example.com")?;
        writeln!(file, "# api_version    v1")?;
        writeln!(file, "# timeout_secs   30")?;
        writeln!(file, "# threshold_low  70")?;
        writeln!(file, "# threshold_high 180")?;
        writeln!(file, "data_source synthetic  # synthetic or remote")?;
        Ok(())
    }
}

/// OS-specific data directory for config and token files
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glucodash")
}

pub fn config_file_path() -> PathBuf {
    get_data_dir().join("config.txt")
}

pub fn token_file_path() -> PathBuf {
    get_data_dir().join("token")
}

/// Create the data directory if it doesn't exist
pub fn ensure_data_dir() -> Result<(), DashError> {
    fs::create_dir_all(get_data_dir())?;
    Ok(())
}

/// File-backed store for the bearer credential used by remote requests
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Store a token, replacing any existing one
    pub fn save(&self, token: &str) -> Result<(), DashError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())?;
        Ok(())
    }

    /// Read the stored token, if any
    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Remove the stored token; missing file is not an error
    pub fn clear(&self) -> Result<(), DashError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
