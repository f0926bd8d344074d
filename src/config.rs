//! Registry configuration
//!
//! Loaded from `~/.config/idreg/config.json` (or the platform equivalent)
//! when present. Every field has a default, so a missing file or a partial
//! file is fine:
//!
//! ```json
//! { "database": "/var/lib/idreg/registry.idreg", "order": "name" }
//! ```

use crate::order::RecordOrder;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default registry file name
pub const DEFAULT_DATABASE: &str = "registry.idreg";

/// Configuration for the registry and the `idreg` CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path to the registry file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Order in which records become Merkle leaves
    #[serde(default)]
    pub order: RecordOrder,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            database: default_database(),
            order: RecordOrder::default(),
        }
    }
}

impl RegistryConfig {
    /// Default config file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("idreg").join("config.json"))
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load from `path` if given, else from the default location if that
    /// file exists, else return defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}
