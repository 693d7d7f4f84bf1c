//! Plugins and the filter registry.
//!
//! A [`Plugin`] is a named set of filter factories under one UUID. The
//! [`FilterList`] aggregates plugins and instantiates filters by
//! [`FilterHandle`], the `(plugin UUID, filter UUID)` pair. Filter UUIDs are
//! unique inside one plugin; two plugins may reuse the same filter UUID.
//!
//! # Module Structure
//!
//! - [`abi`] - Entry point symbols and [`declare_plugin!`](crate::declare_plugin)
//! - [`loader`] - Shared library loading
//! - [`registry`] - `FilterList`

pub mod abi;
pub mod loader;
pub mod registry;

pub use registry::{FilterInfo, FilterList};

use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Creates a fresh filter instance.
pub type FilterFactory = fn() -> Box<dyn Filter>;

/// Errors raised while constructing a plugin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin '{plugin}' registers filter {filter} more than once")]
    DuplicateFilter { plugin: String, filter: Uuid },
}

/// Stable address of one filter implementation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterHandle {
    pub plugin_id: Uuid,
    pub filter_id: Uuid,
}

impl FilterHandle {
    pub fn new(plugin_id: Uuid, filter_id: Uuid) -> Self {
        Self {
            plugin_id,
            filter_id,
        }
    }
}

impl fmt::Debug for FilterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterHandle({} {})", self.plugin_id, self.filter_id)
    }
}

impl fmt::Display for FilterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.plugin_id, self.filter_id)
    }
}

/// One registered filter.
#[derive(Clone)]
pub struct FilterEntry {
    uuid: Uuid,
    name: String,
    human_name: String,
    tags: Vec<String>,
    factory: FilterFactory,
}

impl FilterEntry {
    fn new(factory: FilterFactory) -> Self {
        let sample = factory();
        Self {
            uuid: sample.uuid(),
            name: sample.name().to_string(),
            human_name: sample.human_name().to_string(),
            tags: sample.default_tags(),
            factory,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn human_name(&self) -> &str {
        &self.human_name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn create(&self) -> Box<dyn Filter> {
        (self.factory)()
    }
}

impl fmt::Debug for FilterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEntry")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .finish()
    }
}

/// A unit of filter implementations sharing one identity.
#[derive(Debug, Clone)]
pub struct Plugin {
    id: Uuid,
    name: String,
    description: String,
    vendor: String,
    filters: Vec<FilterEntry>,
}

impl Plugin {
    pub fn builder(id: Uuid, name: impl Into<String>) -> PluginBuilder {
        PluginBuilder {
            id,
            name: name.into(),
            description: String::new(),
            vendor: String::new(),
            filters: Vec::new(),
            duplicate: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Registered filters in registration order.
    pub fn filters(&self) -> &[FilterEntry] {
        &self.filters
    }

    pub fn filter(&self, uuid: Uuid) -> Option<&FilterEntry> {
        self.filters.iter().find(|entry| entry.uuid == uuid)
    }

    pub fn contains_filter(&self, uuid: Uuid) -> bool {
        self.filter(uuid).is_some()
    }

    pub fn create_filter(&self, uuid: Uuid) -> Option<Box<dyn Filter>> {
        self.filter(uuid).map(FilterEntry::create)
    }
}

/// Collects a plugin's filters; a duplicate filter UUID fails [`build`](Self::build).
pub struct PluginBuilder {
    id: Uuid,
    name: String,
    description: String,
    vendor: String,
    filters: Vec<FilterEntry>,
    duplicate: Option<Uuid>,
}

impl PluginBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn register(mut self, factory: FilterFactory) -> Self {
        let entry = FilterEntry::new(factory);
        if self.filters.iter().any(|e| e.uuid == entry.uuid) {
            self.duplicate.get_or_insert(entry.uuid);
        } else {
            self.filters.push(entry);
        }
        self
    }

    pub fn build(self) -> Result<Plugin, PluginError> {
        if let Some(filter) = self.duplicate {
            return Err(PluginError::DuplicateFilter {
                plugin: self.name,
                filter,
            });
        }
        Ok(Plugin {
            id: self.id,
            name: self.name,
            description: self.description,
            vendor: self.vendor,
            filters: self.filters,
        })
    }
}
