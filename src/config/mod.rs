//! Configuration module for filterpipe
//!
//! [`RuntimeConfig`] controls which plugins are loaded, how pipelines react
//! to failing nodes and how logging is set up. It is read from TOML or JSON,
//! chosen by file extension.
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.filterpipe/`
//! - **macOS**: `~/Library/Application Support/dev.filterpipe/`
//! - **Windows**: `%APPDATA%\dev.filterpipe\`
//!
//! # Files
//!
//! - `config.toml` - Runtime configuration
//! - `plugins/` - Default plugin directory
//!
//! # Example
//!
//! ```ignore
//! use filterpipe_rs::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::load_or_default("filterpipe.toml");
//! for dir in config.plugin_search_path() {
//!     println!("{}", dir.display());
//! }
//! ```

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.filterpipe";

/// Config filename inside the app data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Plugin directory name inside the app data directory
pub const PLUGIN_DIR: &str = "plugins";

/// Environment variable holding extra plugin directories (path-list syntax)
pub const PLUGIN_PATH_ENV: &str = "FILTERPIPE_PLUGIN_PATH";

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info,filterpipe_rs=debug";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Get the default plugin directory
pub fn default_plugin_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(PLUGIN_DIR))
}

// ==================== Format ====================

/// On-disk encoding of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

// ==================== Runtime Config ====================

/// Process-wide engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Version for future migration support
    pub version: u32,

    /// Directories scanned for plugin libraries, in order
    pub plugin_dirs: Vec<PathBuf>,

    /// Register the built-in `Core` plugin
    pub load_core_plugin: bool,

    /// Stop a pipeline at the first failing node
    pub halt_on_error: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,

    /// Directory for daily-rotated log files; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            plugin_dirs: default_plugin_dir().into_iter().collect(),
            load_core_plugin: true,
            halt_on_error: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
        }
    }
}

impl RuntimeConfig {
    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content, ConfigFormat::from_path(path))
            .map_err(|e| e.with_context(format!("Loading {}", path.display())))
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save a config file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(ConfigFormat::from_path(path))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                EngineError::Config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content).map_err(|e| {
            EngineError::Config(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| EngineError::Config(format!("Invalid TOML: {}", e))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| EngineError::Config(format!("Invalid JSON: {}", e))),
        }
    }

    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| EngineError::Serialization(e.to_string())),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Configured plugin directories followed by those in
    /// [`PLUGIN_PATH_ENV`].
    pub fn plugin_search_path(&self) -> Vec<PathBuf> {
        let extra = std::env::var_os(PLUGIN_PATH_ENV);
        self.search_path_with(extra.as_deref())
    }

    fn search_path_with(&self, extra: Option<&std::ffi::OsStr>) -> Vec<PathBuf> {
        let mut dirs = self.plugin_dirs.clone();
        if let Some(extra) = extra {
            for dir in std::env::split_paths(extra) {
                if !dir.as_os_str().is_empty() && !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
        }
        dirs
    }
}
