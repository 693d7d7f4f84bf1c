//! The filter registry.

use super::abi::{CreatePluginFn, DestroyPluginFn};
use super::loader::{self, ExternalPlugin, LibraryFilter};
use super::{FilterHandle, Plugin};
use crate::error::{EngineError, Result, ResultExt};
use crate::filter::Filter;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

enum LoadedPlugin {
    Builtin(Plugin),
    External(ExternalPlugin),
}

impl Deref for LoadedPlugin {
    type Target = Plugin;

    fn deref(&self) -> &Plugin {
        match self {
            LoadedPlugin::Builtin(plugin) => plugin,
            LoadedPlugin::External(plugin) => plugin,
        }
    }
}

/// Listing entry for one registered filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInfo {
    pub handle: FilterHandle,
    pub name: String,
    pub human_name: String,
    pub plugin_name: String,
    pub tags: Vec<String>,
}

/// All loaded plugins, addressed by [`FilterHandle`].
#[derive(Default)]
pub struct FilterList {
    plugins: Vec<LoadedPlugin>,
}

impl FilterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an in-process plugin.
    pub fn add_plugin(&mut self, plugin: Plugin) -> Result<Uuid> {
        self.ensure_new(&plugin)?;
        let id = plugin.id();
        info!(
            "Registered plugin '{}' ({}) with {} filter(s)",
            plugin.name(),
            id,
            plugin.filters().len()
        );
        self.plugins.push(LoadedPlugin::Builtin(plugin));
        Ok(id)
    }

    /// Register a plugin through its create/destroy entry points.
    ///
    /// # Safety
    ///
    /// Both functions must follow the contract in [`abi`](super::abi).
    pub unsafe fn add_from_entry_points(
        &mut self,
        create: CreatePluginFn,
        destroy: DestroyPluginFn,
    ) -> Result<Uuid> {
        let plugin =
            ExternalPlugin::from_entry_points(create, destroy, None, Path::new("<entry points>"))?;
        self.add_external(plugin)
    }

    /// Load one shared library.
    pub fn load_plugin(&mut self, path: &Path) -> Result<Uuid> {
        let plugin = loader::load_library(path)?;
        self.add_external(plugin)
    }

    /// Load every shared library directly inside `dir`. Libraries that fail
    /// to load are logged and skipped.
    pub fn load_plugins_from_dir(&mut self, dir: &Path) -> Result<Vec<Uuid>> {
        let candidates = loader::library_candidates(dir)
            .with_context(|| format!("Scanning plugin directory {:?}", dir))?;
        debug!("Found {} plugin candidate(s) in {:?}", candidates.len(), dir);

        let mut loaded = Vec::new();
        for path in candidates {
            match self.load_plugin(&path) {
                Ok(id) => loaded.push(id),
                Err(e) => warn!("Skipping {:?}: {}", path, e),
            }
        }
        Ok(loaded)
    }

    fn add_external(&mut self, plugin: ExternalPlugin) -> Result<Uuid> {
        self.ensure_new(&plugin)?;
        let id = plugin.id();
        info!(
            "Registered plugin '{}' ({}) from {:?} with {} filter(s)",
            plugin.name(),
            id,
            plugin.path(),
            plugin.filters().len()
        );
        self.plugins.push(LoadedPlugin::External(plugin));
        Ok(id)
    }

    fn ensure_new(&self, plugin: &Plugin) -> Result<()> {
        if self.contains(plugin.id()) {
            return Err(EngineError::DuplicatePlugin {
                id: plugin.id(),
                name: plugin.name().to_string(),
            });
        }
        Ok(())
    }

    /// Instantiate the filter behind `handle`.
    pub fn create_filter(&self, handle: FilterHandle) -> Option<Box<dyn Filter>> {
        let plugin = self.find(handle.plugin_id)?;
        let filter = plugin.create_filter(handle.filter_id)?;
        match plugin {
            LoadedPlugin::External(external) => match external.library() {
                Some(library) => Some(Box::new(LibraryFilter::new(filter, Arc::clone(library)))),
                None => Some(filter),
            },
            LoadedPlugin::Builtin(_) => Some(filter),
        }
    }

    /// Every handle whose filter UUID is `filter_id`, in load order.
    pub fn handles_for(&self, filter_id: Uuid) -> Vec<FilterHandle> {
        self.plugins
            .iter()
            .filter(|plugin| plugin.contains_filter(filter_id))
            .map(|plugin| FilterHandle::new(plugin.id(), filter_id))
            .collect()
    }

    pub fn filter_infos(&self) -> Vec<FilterInfo> {
        self.plugins
            .iter()
            .flat_map(|plugin| {
                plugin.filters().iter().map(|entry| FilterInfo {
                    handle: FilterHandle::new(plugin.id(), entry.uuid()),
                    name: entry.name().to_string(),
                    human_name: entry.human_name().to_string(),
                    plugin_name: plugin.name().to_string(),
                    tags: entry.tags().to_vec(),
                })
            })
            .collect()
    }

    fn find(&self, id: Uuid) -> Option<&LoadedPlugin> {
        self.plugins.iter().find(|plugin| plugin.id() == id)
    }

    pub fn plugin(&self, id: Uuid) -> Option<&Plugin> {
        self.find(id).map(|plugin| &**plugin)
    }

    pub fn plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().map(|plugin| &**plugin)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.find(id).is_some()
    }

    /// Number of plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for FilterList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins().map(|plugin| (plugin.id(), plugin.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{self, CreateDataGroupFilter, DeleteDataFilter};
    use crate::plugin::abi::{self, PluginSlot};
    use crate::plugin::PluginError;
    use tempfile::TempDir;

    const OTHER_ID: Uuid = Uuid::from_u128(0x51);

    fn other_plugin() -> Plugin {
        Plugin::builder(OTHER_ID, "Other")
            .register(|| Box::new(DeleteDataFilter))
            .build()
            .unwrap()
    }

    extern "C" fn create_other() -> *mut PluginSlot {
        abi::into_raw(Ok(other_plugin()))
    }

    extern "C" fn create_nothing() -> *mut PluginSlot {
        std::ptr::null_mut()
    }

    extern "C" fn create_broken() -> *mut PluginSlot {
        abi::into_raw(
            Plugin::builder(Uuid::from_u128(0x52), "Broken")
                .register(|| Box::new(CreateDataGroupFilter))
                .register(|| Box::new(CreateDataGroupFilter))
                .build(),
        )
    }

    unsafe extern "C" fn destroy(slot: *mut PluginSlot) -> bool {
        abi::free_raw(slot)
    }

    #[test]
    fn test_add_and_create() {
        let mut list = FilterList::new();
        let id = list.add_plugin(filters::core_plugin().unwrap()).unwrap();
        assert_eq!(id, filters::CORE_PLUGIN_ID);
        let handle = FilterHandle::new(id, DeleteDataFilter::UUID);
        assert_eq!(list.create_filter(handle).unwrap().uuid(), DeleteDataFilter::UUID);
        assert!(list
            .create_filter(FilterHandle::new(Uuid::nil(), DeleteDataFilter::UUID))
            .is_none());
    }

    #[test]
    fn test_duplicate_plugin_rejected() {
        let mut list = FilterList::new();
        list.add_plugin(other_plugin()).unwrap();
        let err = list.add_plugin(other_plugin()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicatePlugin { .. }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_same_filter_uuid_across_plugins() {
        let mut list = FilterList::new();
        list.add_plugin(filters::core_plugin().unwrap()).unwrap();
        unsafe { list.add_from_entry_points(create_other, destroy) }.unwrap();

        let handles = list.handles_for(DeleteDataFilter::UUID);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[1].plugin_id, OTHER_ID);
        assert!(list.create_filter(handles[1]).is_some());
    }

    #[test]
    fn test_broken_entry_points_not_added() {
        let mut list = FilterList::new();
        let err = unsafe { list.add_from_entry_points(create_broken, destroy) }.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Plugin(PluginError::DuplicateFilter { ref plugin, .. }) if plugin == "Broken"
        ));
        let err = unsafe { list.add_from_entry_points(create_nothing, destroy) }.unwrap_err();
        assert!(matches!(err, EngineError::PluginConstruction(_)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_filter_infos() {
        let mut list = FilterList::new();
        list.add_plugin(other_plugin()).unwrap();
        let infos = list.filter_infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].plugin_name, "Other");
        assert_eq!(infos[0].handle, FilterHandle::new(OTHER_ID, DeleteDataFilter::UUID));
    }

    #[test]
    fn test_dir_scan_skips_bad_libraries() {
        let dir = TempDir::new().unwrap();
        let path = dir
            .path()
            .join(format!("bogus.{}", std::env::consts::DLL_EXTENSION));
        std::fs::write(path, b"\x7fELF garbage").unwrap();
        let mut list = FilterList::new();
        let loaded = list.load_plugins_from_dir(dir.path()).unwrap();
        assert!(loaded.is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_dir_is_error() {
        let mut list = FilterList::new();
        assert!(list
            .load_plugins_from_dir(Path::new("/no/such/plugin/dir"))
            .is_err());
    }
}
