//! Path resolution and the captured host environment
//!
//! # Environment Variables
//!
//! - `BOOTSTRAP_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/bootstrap`)
//! - `HOME`, `SHELL` - Read once into [`HostEnv`]
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `BOOTSTRAP_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/bootstrap` (if set)
//! 3. `~/.config/bootstrap`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "BOOTSTRAP_CONFIG_DIR";

/// Get the bootstrap config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("bootstrap");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("bootstrap");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Expand ~ and environment variables in a path string.
///
/// If any variable is unknown the input is returned unchanged.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

/// Home directory and login shell, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    pub home: PathBuf,
    pub shell: String,
}

impl HostEnv {
    /// Read `HOME` and `SHELL` from the process environment
    ///
    /// `HOME` falls back to the platform home directory; `SHELL` defaults to
    /// empty.
    pub fn capture() -> Result<Self> {
        let home = match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => dirs::home_dir().context("Could not determine home directory")?,
        };
        let shell = std::env::var("SHELL").unwrap_or_default();

        log::debug!("Host environment: home={} shell={shell}", home.display());
        Ok(Self { home, shell })
    }
}

// ============================================================================
// Tests
// ============================================================================
