//! Structural mutation descriptors.

use crate::data::{
    byte_count, element_count, shape_product, DataArray, DataPath, DataStructure, GeometrySpec,
    Payload, StructureError, StructureResult,
};
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an action is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionMode {
    /// Structural effect only; arrays are created without element storage.
    Preview,
    /// Real allocation and mutation.
    Commit,
}

/// One staged structural change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataAction {
    CreateArray {
        path: DataPath,
        data_type: DataType,
        tuple_shape: Vec<usize>,
        component_shape: Vec<usize>,
        /// Initial value for every element, parsed per `data_type`.
        fill_value: String,
    },
    CreateGroup {
        path: DataPath,
    },
    CreateAttributeMatrix {
        path: DataPath,
        tuple_shape: Vec<usize>,
    },
    CreateGeometry {
        path: DataPath,
        spec: GeometrySpec,
    },
    /// Move `source` (keeping its name) under `new_parent`. The empty path
    /// moves it to the top level.
    Move {
        source: DataPath,
        new_parent: DataPath,
    },
    Rename {
        path: DataPath,
        new_name: String,
    },
    Delete {
        path: DataPath,
    },
    /// Deep copy of `source` created at `destination`.
    Copy {
        source: DataPath,
        destination: DataPath,
    },
}

impl DataAction {
    /// Apply this action to `data`.
    pub fn apply(&self, data: &mut DataStructure, mode: ActionMode) -> StructureResult<()> {
        match self {
            DataAction::CreateArray {
                path,
                data_type,
                tuple_shape,
                component_shape,
                fill_value,
            } => {
                check_shape("tuple", tuple_shape)?;
                check_shape("component", component_shape)?;
                element_count(tuple_shape, component_shape)
                    .and_then(|len| byte_count(*data_type, len))
                    .map_err(StructureError::Invalid)?;
                let array = match mode {
                    ActionMode::Preview => {
                        data_type.check_value(fill_value).map_err(StructureError::Invalid)?;
                        DataArray::empty(*data_type, tuple_shape.clone(), component_shape.clone())
                    }
                    ActionMode::Commit => DataArray::filled(
                        *data_type,
                        tuple_shape.clone(),
                        component_shape.clone(),
                        fill_value,
                    )
                    .map_err(StructureError::Invalid)?,
                };
                data.insert_at(path, Payload::Array(array))?;
            }
            DataAction::CreateGroup { path } => {
                data.insert_at(path, Payload::Group)?;
            }
            DataAction::CreateAttributeMatrix { path, tuple_shape } => {
                check_shape("tuple", tuple_shape)?;
                data.insert_at(
                    path,
                    Payload::AttributeMatrix {
                        tuple_shape: tuple_shape.clone(),
                    },
                )?;
            }
            DataAction::CreateGeometry { path, spec } => {
                data.create_geometry(path, spec, mode == ActionMode::Commit)?;
            }
            DataAction::Move { source, new_parent } => {
                let id = data.resolve(source)?;
                let parent = if new_parent.is_empty() {
                    None
                } else {
                    Some(data.resolve(new_parent)?)
                };
                data.reparent(id, parent)?;
            }
            DataAction::Rename { path, new_name } => {
                let id = data.resolve(path)?;
                data.rename(id, new_name)?;
            }
            DataAction::Delete { path } => {
                let id = data.resolve(path)?;
                data.remove(id)?;
            }
            DataAction::Copy {
                source,
                destination,
            } => {
                let id = data.resolve(source)?;
                let parent = data.resolve_parent(destination)?;
                let name = destination.target_name().ok_or(StructureError::EmptyPath)?;
                data.deep_copy(id, parent, name)?;
            }
        }
        Ok(())
    }

    /// Short human-readable summary used in diagnostics.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

fn check_shape(label: &str, shape: &[usize]) -> StructureResult<()> {
    match shape_product(shape) {
        Some(0) => Err(StructureError::Invalid(format!(
            "The {} shape {:?} describes no elements",
            label, shape
        ))),
        None => Err(StructureError::Invalid(format!(
            "The {} shape {:?} overflows the element count",
            label, shape
        ))),
        Some(_) => Ok(()),
    }
}

impl fmt::Display for DataAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAction::CreateArray {
                path,
                data_type,
                tuple_shape,
                component_shape,
                ..
            } => write!(
                f,
                "CreateArray {} {} {:?}x{:?}",
                path, data_type, tuple_shape, component_shape
            ),
            DataAction::CreateGroup { path } => write!(f, "CreateGroup {}", path),
            DataAction::CreateAttributeMatrix { path, tuple_shape } => {
                write!(f, "CreateAttributeMatrix {} {:?}", path, tuple_shape)
            }
            DataAction::CreateGeometry { path, spec } => {
                write!(f, "CreateGeometry {} ({})", path, spec.kind())
            }
            DataAction::Move { source, new_parent } => {
                write!(f, "Move {} -> {}/", source, new_parent)
            }
            DataAction::Rename { path, new_name } => write!(f, "Rename {} -> {}", path, new_name),
            DataAction::Delete { path } => write!(f, "Delete {}", path),
            DataAction::Copy {
                source,
                destination,
            } => write!(f, "Copy {} -> {}", source, destination),
        }
    }
}
