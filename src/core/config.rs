//! Service configuration.
//!
//! Settings are read from a JSON file, then overridden by `BIZPULSE_*`
//! environment variables, then by command-line flags in the binaries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info";

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE KIND
// ═══════════════════════════════════════════════════════════════════════════════

/// Which storage backend the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Ephemeral in-memory store
    #[default]
    Memory,
    /// JSON file under the data directory
    File,
}

impl StorageKind {
    /// Get backend name
    pub fn name(&self) -> &'static str {
        match self {
            StorageKind::Memory => "memory",
            StorageKind::File => "file",
        }
    }
}

impl std::str::FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageKind::Memory),
            "file" | "json" => Ok(StorageKind::File),
            _ => Err(ConfigError::Validation(format!("Unknown storage backend: {}", s))),
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,
    /// Directory for the file backend
    pub data_dir: PathBuf,
    /// JSON document loaded into the store at startup
    pub seed_file: Option<PathBuf>,
    /// Storage backend
    pub storage: StorageKind,
    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            data_dir: PathBuf::from(".bizpulse"),
            seed_file: None,
            storage: StorageKind::Memory,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl ServerConfig {
    /// Load from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `BIZPULSE_*` environment overrides on top of this config
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(addr) = std::env::var("BIZPULSE_BIND") {
            self.bind_addr = addr;
        }

        if let Ok(dir) = std::env::var("BIZPULSE_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Ok(seed) = std::env::var("BIZPULSE_SEED_FILE") {
            self.seed_file = Some(PathBuf::from(seed));
        }

        if let Ok(storage) = std::env::var("BIZPULSE_STORAGE") {
            self.storage = storage.parse()?;
        }

        if let Ok(filter) = std::env::var("BIZPULSE_LOG") {
            self.log_filter = filter;
        }

        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| ConfigError::Validation(format!("Invalid bind address {}: {}", self.bind_addr, e)))?;

        if self.storage == StorageKind::File && self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("File storage requires a data directory".into()));
        }

        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Validation("Log filter cannot be empty".into()));
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}
