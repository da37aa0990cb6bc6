//! Plugin manager configuration.
//!
//! Settings are read from TOML, with environment overrides for the
//! plugin search path and log level.

use crate::core::{Error, Result};
use crate::monitoring::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Entry point group scanned for plugins.
pub const DEFAULT_GROUP: &str = "myproject.plugins";

/// Dotted prefix under which feature namespaces are published.
pub const DEFAULT_FEATURES_PREFIX: &str = "myproject.features";

/// Environment variable holding extra manifest directories.
pub const PLUGIN_PATH_ENV: &str = "MYPROJECT_PLUGIN_PATH";

/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "MYPROJECT_LOG_LEVEL";

/// Plugin discovery configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Entry point group to scan
    pub group: String,
    /// Prefix for published feature namespaces
    pub features_prefix: String,
    /// Directories holding distribution manifests, in search order
    pub search_paths: Vec<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.to_string(),
            features_prefix: DEFAULT_FEATURES_PREFIX.to_string(),
            search_paths: Vec::new(),
        }
    }
}

impl PluginConfig {
    /// Add a search path.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }
}

/// Top-level settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Plugin discovery settings
    pub plugins: PluginConfig,
    /// Logging settings
    pub logging: LoggerConfig,
}

impl Settings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    /// Apply environment overrides.
    ///
    /// Directories from `MYPROJECT_PLUGIN_PATH` are searched before the
    /// configured ones. An invalid `MYPROJECT_LOG_LEVEL` is reported after
    /// the search path override has been applied.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var_os(PLUGIN_PATH_ENV),
            std::env::var(LOG_LEVEL_ENV).ok(),
        )
    }

    /// Apply a plugin path list and a log level, in that order.
    pub fn apply_overrides(
        &mut self,
        plugin_path: Option<OsString>,
        log_level: Option<String>,
    ) -> Result<()> {
        if let Some(paths) = plugin_path {
            let mut search_paths: Vec<PathBuf> = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            search_paths.append(&mut self.plugins.search_paths);
            self.plugins.search_paths = search_paths;
        }

        if let Some(level) = log_level {
            self.logging.level = level.parse().map_err(Error::Config)?;
        }

        Ok(())
    }
}
