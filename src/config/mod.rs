//! Configuration system for listquill.
//!
//! Settings are read from `~/.config/listquill/config.toml`. Every field has a
//! default, so a partial file only overrides what it names; a missing or
//! malformed file yields the defaults.
//!
//! # Example
//!
//! ```
//! use listquill::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.indent_size, 2);
//! assert_eq!(config.max_optimize_passes, 16);
//!
//! let custom = Config {
//!     indent_size: 4,
//!     ..Config::default()
//! };
//! assert!(!custom.create_backup);
//! ```

use crate::document::tree::DEFAULT_MAX_OPTIMIZE_PASSES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration for the listquill application.
///
/// # Fields
///
/// * `indent_size` - Spaces per nesting level in saved markup (default: 2)
/// * `create_backup` - Create .bak files before saving (default: false)
/// * `log_filter` - Default tracing filter when `RUST_LOG` is unset (default: "listquill=info")
/// * `max_optimize_passes` - Upper bound on optimize passes per command (default: 16)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spaces per nesting level in saved markup
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Create .bak files before saving
    #[serde(default)]
    pub create_backup: bool,

    /// Tracing filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Upper bound on optimize passes after each command
    #[serde(default = "default_max_optimize_passes")]
    pub max_optimize_passes: usize,
}

fn default_indent_size() -> usize {
    2
}

fn default_log_filter() -> String {
    "listquill=info".to_string()
}

fn default_max_optimize_passes() -> usize {
    DEFAULT_MAX_OPTIMIZE_PASSES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            create_backup: false,
            log_filter: default_log_filter(),
            max_optimize_passes: default_max_optimize_passes(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/listquill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("listquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring malformed config file");
                Self::default()
            }),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read config file");
                Self::default()
            }
        }
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("indent_size = 4").unwrap();
        assert_eq!(config.indent_size, 4);
        assert!(!config.create_backup);
        assert_eq!(config.log_filter, "listquill=info");
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }
}
