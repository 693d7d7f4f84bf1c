//! Error handling for the engine runtime
//!
//! [`EngineError`] covers infrastructure failures: configuration, plugin
//! loading and registry lookups. Diagnostics produced by filters while
//! validating or running use [`FilterError`](crate::filter::FilterError)
//! instead.

use crate::plugin::{FilterHandle, PluginError};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Main error type for runtime operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A shared library could not be opened or lacks an entry point
    #[error("Failed to load plugin library {path:?}: {message}")]
    PluginLoad { path: PathBuf, message: String },

    /// The create entry point returned null
    #[error("Plugin library {0:?} failed to construct its plugin")]
    PluginConstruction(PathBuf),

    #[error("Plugin {id} ('{name}') is already registered")]
    DuplicatePlugin { id: Uuid, name: String },

    #[error("Unknown filter {0}")]
    UnknownFilter(FilterHandle),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EngineError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| EngineError::from(e).with_context(f()))
    }
}
