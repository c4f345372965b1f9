use eyre::{eyre, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ErrorContext;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state kept in `config.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub shell_type: String,

    #[serde(default)]
    pub initialized: bool,

    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: VERSION.to_string(),
            shell_type: String::new(),
            initialized: false,
            settings: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load the config, falling back to defaults when absent or unreadable
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Config file not readable at {:?} ({}), using defaults", path, e);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("⚠️ Ignoring malformed config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| eyre!(ErrorContext::new("processing config data").to_serialize_error(e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                eyre!(ErrorContext::new("writing config file").with_file(parent).to_directory_create_error(e))
            })?;
        }
        fs::write(path, content).map_err(|e| {
            eyre!(ErrorContext::new("writing config file").with_file(path).to_file_operation_error(e))
        })?;
        debug!("Saved config to: {:?}", path);
        Ok(())
    }
}
