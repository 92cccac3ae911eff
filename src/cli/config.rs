//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/patientledger",
//!   "backend": "file",
//!   "sync_writes": true,
//!   "ledger_file": "ledger.dat",
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;

/// Which ledger implementation serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Append-only journal under `data_dir`
    File,
    /// Process-local map; every invocation starts empty
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// fsync after every journal append (default: true)
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,

    /// Journal file name inside `data_dir`
    #[serde(default = "default_ledger_file")]
    pub ledger_file: String,

    /// Minimum log severity: trace, info, warn, error, fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_backend() -> Backend {
    Backend::File
}
fn default_sync_writes() -> bool {
    true
}
fn default_ledger_file() -> String {
    "ledger.dat".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        let file_name = Path::new(&self.ledger_file);
        if self.ledger_file.is_empty()
            || file_name.file_name().map(|n| n.len()) != Some(self.ledger_file.len())
        {
            return Err(CliError::config_error(format!(
                "Invalid ledger_file: '{}'. Must be a bare file name.",
                self.ledger_file
            )));
        }

        self.min_severity()?;
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_path().join(&self.ledger_file)
    }

    pub fn min_severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }
}
