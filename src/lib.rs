//! # filterpipe-rs: Plugin-Driven Data Filter Engine
//!
//! An engine for composable data-processing filters operating on a shared,
//! hierarchical in-memory data store. Filters are discovered from plugins,
//! validate their arguments against the current store without changing it
//! (*preflight*), and then apply their structural changes and algorithm
//! (*execute*).
//!
//! ## Architecture
//!
//! - **Data**: [`DataStructure`] holds groups, attribute matrices, geometries
//!   and typed arrays addressed by [`DataPath`]
//! - **Parameters**: Typed, defaulted, optionally linked parameter
//!   declarations and the [`Arguments`] supplied for them
//! - **Actions**: Deferred structural mutations, previewed during preflight
//!   and committed during execute
//! - **Filters**: The [`Filter`] contract with cancellation and progress
//!   messages
//! - **Plugins**: [`FilterList`] keyed by `(plugin UUID, filter UUID)`, fed
//!   by the built-in `Core` plugin and shared libraries
//! - **Pipeline**: Ordered filter runs with per-node reports
//!
//! ## Configuration
//!
//! The runtime configuration lives in the platform-appropriate data
//! directory under `dev.filterpipe`:
//!
//! - **Linux**: `~/.local/share/dev.filterpipe/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.filterpipe/config.toml`
//! - **Windows**: `%APPDATA%\dev.filterpipe\config.toml`
//!
//! ## Example
//!
//! ```ignore
//! use filterpipe_rs::{
//!     filters::{CreateDataGroupFilter, CORE_PLUGIN_ID},
//!     Arguments, DataPath, DataStructure, Runtime, RuntimeConfig,
//! };
//! use filterpipe_rs::plugin::FilterHandle;
//!
//! let runtime = Runtime::new(RuntimeConfig::default())?;
//! let mut pipeline = runtime.pipeline("example");
//! pipeline.push_handle(
//!     runtime.filters(),
//!     FilterHandle::new(CORE_PLUGIN_ID, CreateDataGroupFilter::UUID),
//!     Arguments::new().with(CreateDataGroupFilter::DATA_OBJECT_PATH, DataPath::new(["Group"])),
//! )?;
//!
//! let mut data = DataStructure::new();
//! let report = pipeline.execute(&mut data, &Default::default(), &Default::default());
//! assert!(report.is_ok());
//! ```

pub mod actions;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod filters;
pub mod parameters;
pub mod pipeline;
pub mod plugin;
pub mod runtime;
pub mod types;

// Re-export commonly used types
pub use actions::{ActionMode, DataAction, OutputActions};
pub use config::RuntimeConfig;
pub use data::{DataArray, DataPath, DataStructure};
pub use error::{EngineError, Result};
pub use filter::{CancelToken, ExecuteResult, Filter, MessageHandler, PreflightResult};
pub use parameters::{Arguments, Parameters};
pub use pipeline::{Pipeline, PipelineReport};
pub use plugin::{FilterHandle, FilterList, Plugin};
pub use runtime::Runtime;
pub use types::DataType;
