//! User configuration, read from `<config dir>/snippet-vault/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::DEFAULT_SLOT_KEY;

pub const APP_DIR: &str = "snippet-vault";

/// Overrides `data_dir` from the config file when set.
pub const DATA_DIR_ENV: &str = "SNIPPET_VAULT_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the snippet slot file
    pub data_dir: PathBuf,
    /// Slot key, which is also the slot file stem
    pub slot_key: String,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads the user config file, falling back to defaults when it is absent
    pub fn load() -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.slot_key.trim().is_empty() {
            anyhow::bail!("slot_key must not be empty");
        }
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}
