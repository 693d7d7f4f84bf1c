//! Built-in filters of the `Core` plugin.
//!
//! Most of these wrap one [`DataAction`](crate::actions::DataAction) each and
//! do all their work through preflight output actions. `FillArray` is the one
//! filter with an algorithmic body.
//!
//! # Module Structure
//!
//! - [`create`] - Group, attribute matrix, array and image geometry creation
//! - [`modify`] - Delete, rename, move and copy
//! - [`fill`] - `FillArray`

pub mod create;
pub mod fill;
pub mod modify;

pub use create::{
    CreateAttributeMatrixFilter, CreateDataArrayFilter, CreateDataGroupFilter,
    CreateImageGeometryFilter,
};
pub use fill::FillArrayFilter;
pub use modify::{CopyDataObjectFilter, DeleteDataFilter, MoveDataFilter, RenameDataObjectFilter};

use crate::actions::{DataAction, OutputActions};
use crate::filter::{FilterError, Outcome, PreflightResult};
use crate::plugin::{Plugin, PluginError};
use uuid::Uuid;

pub const CORE_PLUGIN_ID: Uuid = Uuid::from_u128(0x05cc_618b_781f_4ac0_b9ac_43f2_6ce1_854f);
pub const CORE_PLUGIN_NAME: &str = "Core";

/// Build the `Core` plugin.
pub fn core_plugin() -> Result<Plugin, PluginError> {
    Plugin::builder(CORE_PLUGIN_ID, CORE_PLUGIN_NAME)
        .description("Structural filters and array fill")
        .vendor("filterpipe")
        .register(|| Box::new(CreateDataGroupFilter))
        .register(|| Box::new(CreateAttributeMatrixFilter))
        .register(|| Box::new(CreateDataArrayFilter))
        .register(|| Box::new(CreateImageGeometryFilter))
        .register(|| Box::new(DeleteDataFilter))
        .register(|| Box::new(RenameDataObjectFilter))
        .register(|| Box::new(MoveDataFilter))
        .register(|| Box::new(CopyDataObjectFilter))
        .register(|| Box::new(FillArrayFilter))
        .build()
}

/// Preflight result carrying exactly one regular action.
fn single_action(action: DataAction) -> PreflightResult {
    let mut actions = OutputActions::new();
    actions.push(action);
    PreflightResult::new(Outcome::ok(actions))
}

fn rejected(error: FilterError) -> PreflightResult {
    PreflightResult::new(Outcome::error(error))
}

/// Shape extents from an integer vector argument. Values were validated as
/// positive by the parameter.
fn to_shape(values: &[i64]) -> Vec<usize> {
    values.iter().map(|&v| v.max(0) as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_core_plugin_builds() {
        let plugin = core_plugin().unwrap();
        assert_eq!(plugin.id(), CORE_PLUGIN_ID);
        assert_eq!(plugin.filters().len(), 9);
        let names: HashSet<&str> = plugin.filters().iter().map(|f| f.name()).collect();
        assert!(names.contains("FillArray"));
        assert!(names.contains("CreateDataArray"));
    }

    #[test]
    fn test_filter_parameters_have_defaults() {
        let plugin = core_plugin().unwrap();
        for entry in plugin.filters() {
            let filter = entry.create();
            let params = filter.parameters();
            for param in params.iter() {
                assert_eq!(param.default_value().kind(), param.value_kind(), "{}", param.name());
            }
        }
    }
}
