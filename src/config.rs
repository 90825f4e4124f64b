// Thu Oct 15 2026 - Alex

use crate::error::ErrorKind;
use crate::memory::{Address, AddressRange, MemoryError, RegionFilter};
use crate::utils::logging::level_from_str;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Invalid(_) => ErrorKind::Argument,
            Self::Io(_) | Self::Json(_) => ErrorKind::Config,
        }
    }
}

/// Defaults for every scan a [`PatternScanner`](crate::pattern::PatternScanner) runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub start: u64,
    pub end: u64,
    pub require_readable: bool,
    pub require_writable: bool,
    pub require_executable: bool,
    pub max_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let range = AddressRange::default();
        Self {
            start: range.start().as_u64(),
            end: range.end().as_u64(),
            require_readable: false,
            require_writable: false,
            require_executable: false,
            max_threads: num_cpus::get(),
        }
    }
}

impl ScanConfig {
    pub fn with_range(mut self, start: u64, end: u64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_max_threads(mut self, threads: usize) -> Self {
        self.max_threads = threads;
        self
    }

    pub fn range(&self) -> Result<AddressRange, MemoryError> {
        AddressRange::new(Address::new(self.start), Address::new(self.end))
    }

    pub fn filter(&self) -> RegionFilter {
        RegionFilter {
            readable: self.require_readable,
            writable: self.require_writable,
            executable: self.require_executable,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end <= self.start {
            return Err(ConfigError::Invalid(format!(
                "scan end 0x{:x} must be above start 0x{:x}",
                self.end, self.start
            )));
        }
        if self.max_threads == 0 {
            return Err(ConfigError::Invalid("max_threads must be greater than 0".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan.validate()?;
        if level_from_str(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)));
        }
        Ok(())
    }
}
