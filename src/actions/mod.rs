//! Staged structural mutations.
//!
//! Filters never create or remove objects directly during preflight. They
//! describe the change as [`DataAction`]s collected in [`OutputActions`];
//! the engine applies them in [`ActionMode::Preview`] against a preview copy
//! during preflight and in [`ActionMode::Commit`] against the live store
//! during execute.

pub mod action;
pub mod output;

pub use action::{ActionMode, DataAction};
pub use output::OutputActions;
