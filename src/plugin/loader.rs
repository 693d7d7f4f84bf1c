//! Shared library loading.

use crate::data::DataStructure;
use crate::error::{EngineError, Result};
use crate::filter::{CancelToken, ExecuteResult, Filter, MessageHandler, PreflightResult};
use crate::parameters::{Arguments, Parameters};
use crate::pipeline::PipelineNode;
use crate::plugin::abi::{
    CreatePluginFn, DestroyPluginFn, PluginSlot, CREATE_PLUGIN_SYMBOL, DESTROY_PLUGIN_SYMBOL,
};
use crate::plugin::Plugin;
use libloading::Library;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A plugin obtained through the create entry point. Dropping it calls the
/// matching destroy entry point, then releases the library.
pub struct ExternalPlugin {
    slot: NonNull<PluginSlot>,
    // Points at the `Ok` payload inside `slot`.
    plugin: NonNull<Plugin>,
    destroy: DestroyPluginFn,
    library: Option<Arc<Library>>,
    path: Option<PathBuf>,
}

// SAFETY: the pointee is an owned `Plugin`, which is `Send + Sync`; this
// wrapper is its only owner.
unsafe impl Send for ExternalPlugin {}
unsafe impl Sync for ExternalPlugin {}

impl ExternalPlugin {
    /// Build from a pair of entry points. `origin` names the source in
    /// errors. A constructor error is returned as [`EngineError::Plugin`]
    /// after its slot has been handed back to `destroy`.
    ///
    /// # Safety
    ///
    /// `create` and `destroy` must follow the contract in [`abi`](super::abi)
    /// and stay valid for as long as `library` (if any) is loaded.
    pub unsafe fn from_entry_points(
        create: CreatePluginFn,
        destroy: DestroyPluginFn,
        library: Option<Arc<Library>>,
        origin: &Path,
    ) -> Result<Self> {
        let mut slot = NonNull::new(create())
            .ok_or_else(|| EngineError::PluginConstruction(origin.to_path_buf()))?;
        let plugin = match slot.as_mut() {
            Ok(plugin) => NonNull::from(plugin),
            Err(e) => {
                let error = e.clone();
                destroy(slot.as_ptr());
                return Err(EngineError::Plugin(error));
            }
        };
        Ok(Self {
            slot,
            plugin,
            destroy,
            library,
            path: None,
        })
    }

    /// Library file this plugin came from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn library(&self) -> Option<&Arc<Library>> {
        self.library.as_ref()
    }
}

impl Deref for ExternalPlugin {
    type Target = Plugin;

    fn deref(&self) -> &Plugin {
        // SAFETY: `plugin` lives inside `slot`, which stays valid until `drop`.
        unsafe { self.plugin.as_ref() }
    }
}

impl Drop for ExternalPlugin {
    fn drop(&mut self) {
        // SAFETY: `slot` came from the paired create function and is freed once.
        let freed = unsafe { (self.destroy)(self.slot.as_ptr()) };
        if !freed {
            warn!("Plugin destroy entry point reported failure");
        }
    }
}

/// Load one shared library and construct its plugin.
pub fn load_library(path: &Path) -> Result<ExternalPlugin> {
    let load_error = |message: String| EngineError::PluginLoad {
        path: path.to_path_buf(),
        message,
    };

    // SAFETY: loading runs the library's initialisers; plugin directories
    // are trusted by configuration.
    let library = unsafe { Library::new(path) }.map_err(|e| load_error(e.to_string()))?;
    let library = Arc::new(library);

    // SAFETY: the symbol types are fixed by the plugin ABI.
    let (create, destroy) = unsafe {
        let create = *library
            .get::<CreatePluginFn>(CREATE_PLUGIN_SYMBOL)
            .map_err(|e| load_error(e.to_string()))?;
        let destroy = *library
            .get::<DestroyPluginFn>(DESTROY_PLUGIN_SYMBOL)
            .map_err(|e| load_error(e.to_string()))?;
        (create, destroy)
    };

    // SAFETY: both entry points come from `library`, which the plugin keeps alive.
    let mut plugin =
        unsafe { ExternalPlugin::from_entry_points(create, destroy, Some(library), path) }?;
    plugin.path = Some(path.to_path_buf());
    debug!("Loaded plugin '{}' from {:?}", plugin.name(), path);
    Ok(plugin)
}

/// Shared library files directly inside `dir`, sorted by name.
pub fn library_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_library = path
            .extension()
            .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION);
        if path.is_file() && is_library {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// A filter whose code lives in a loaded library. Keeps the library mapped
/// for as long as the filter exists.
pub(crate) struct LibraryFilter {
    // Declared first so it is dropped before the library.
    inner: Box<dyn Filter>,
    _library: Arc<Library>,
}

impl LibraryFilter {
    pub(crate) fn new(inner: Box<dyn Filter>, library: Arc<Library>) -> Self {
        Self {
            inner,
            _library: library,
        }
    }
}

impl Filter for LibraryFilter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn human_name(&self) -> &str {
        self.inner.human_name()
    }

    fn uuid(&self) -> Uuid {
        self.inner.uuid()
    }

    fn default_tags(&self) -> Vec<String> {
        self.inner.default_tags()
    }

    fn parameters(&self) -> Parameters {
        self.inner.parameters()
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(Self::new(self.inner.clone_box(), Arc::clone(&self._library)))
    }

    fn preflight_impl(
        &self,
        data: &DataStructure,
        args: &Arguments,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> PreflightResult {
        self.inner.preflight_impl(data, args, messages, cancel)
    }

    fn execute_impl(
        &self,
        data: &mut DataStructure,
        args: &Arguments,
        node: Option<&PipelineNode>,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> ExecuteResult {
        self.inner.execute_impl(data, args, node, messages, cancel)
    }
}
