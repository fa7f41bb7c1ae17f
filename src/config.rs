//! Persistent settings at `<config_dir>/config.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths;

/// Top-level config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Custom step catalog replacing the built-in one
    #[serde(default)]
    pub catalog: Option<String>,

    /// Defaults for the interactive questions
    #[serde(default)]
    pub answers: AnswerDefaults,
}

/// Pre-filled answers; any field left out falls back to the built-in default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerDefaults {
    #[serde(default)]
    pub desktop: Option<bool>,
    #[serde(default)]
    pub wsl: Option<bool>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl BootstrapConfig {
    /// Load from an explicit path, or `<config_dir>/config.toml`
    ///
    /// A missing default file yields the default config. An explicit path
    /// must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load_or_default(&Self::default_path()?),
        }
    }

    fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))
    }

    /// `<config_dir>/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    /// Expanded path of the custom catalog, if one is configured
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog.as_deref().map(paths::expand)
    }
}
