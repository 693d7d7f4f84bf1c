//! The process runtime: configuration plus the filter registry.

use crate::config::RuntimeConfig;
use crate::error::{EngineError, Result};
use crate::filter::Filter;
use crate::filters;
use crate::pipeline::Pipeline;
use crate::plugin::{FilterHandle, FilterList, Plugin};
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

/// Built once per process and passed by reference wherever filters are
/// instantiated.
#[derive(Debug)]
pub struct Runtime {
    config: RuntimeConfig,
    filters: FilterList,
}

impl Runtime {
    /// Create a runtime. Registers the `Core` plugin when configured; no
    /// libraries are loaded until [`load_plugins`](Self::load_plugins).
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let mut list = FilterList::new();
        if config.load_core_plugin {
            list.add_plugin(filters::core_plugin()?)?;
        }
        Ok(Self {
            config,
            filters: list,
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterList {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterList {
        &mut self.filters
    }

    pub fn add_plugin(&mut self, plugin: Plugin) -> Result<Uuid> {
        self.filters.add_plugin(plugin)
    }

    /// Scan every directory of the plugin search path. Missing directories
    /// are skipped.
    pub fn load_plugins(&mut self) -> Vec<Uuid> {
        let mut loaded = Vec::new();
        for dir in self.plugin_dirs() {
            if !dir.is_dir() {
                info!("Plugin directory {:?} does not exist, skipping", dir);
                continue;
            }
            match self.filters.load_plugins_from_dir(&dir) {
                Ok(ids) => loaded.extend(ids),
                Err(e) => warn!("Failed to scan {:?}: {}", dir, e),
            }
        }
        info!("Loaded {} plugin(s) from disk", loaded.len());
        loaded
    }

    pub fn plugin_dirs(&self) -> Vec<PathBuf> {
        self.config.plugin_search_path()
    }

    pub fn create_filter(&self, handle: FilterHandle) -> Result<Box<dyn Filter>> {
        self.filters
            .create_filter(handle)
            .ok_or(EngineError::UnknownFilter(handle))
    }

    /// Empty pipeline using the configured error policy.
    pub fn pipeline(&self, name: impl Into<String>) -> Pipeline {
        Pipeline::new(name).with_halt_on_error(self.config.halt_on_error)
    }
}
