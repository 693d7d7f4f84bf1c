//! Nodes of the data store.

use crate::data::array::{saturating_product, DataArray};
use crate::data::geometry::{Geometry, GeometryKind};
use crate::data::id::DataId;
use serde::{Deserialize, Serialize};

/// Coarse object category, used by selection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Group,
    AttributeMatrix,
    DataArray,
    Geometry,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Group => write!(f, "Group"),
            ObjectKind::AttributeMatrix => write!(f, "AttributeMatrix"),
            ObjectKind::DataArray => write!(f, "DataArray"),
            ObjectKind::Geometry => write!(f, "Geometry"),
        }
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Pure container.
    Group,
    /// Container whose arrays all share `tuple_shape`'s tuple count.
    AttributeMatrix { tuple_shape: Vec<usize> },
    Array(DataArray),
    Geometry(Geometry),
}

impl Payload {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Payload::Group => ObjectKind::Group,
            Payload::AttributeMatrix { .. } => ObjectKind::AttributeMatrix,
            Payload::Array(_) => ObjectKind::DataArray,
            Payload::Geometry(_) => ObjectKind::Geometry,
        }
    }

    /// Groups, attribute matrices and geometries may own children.
    pub fn is_container(&self) -> bool {
        !matches!(self, Payload::Array(_))
    }
}

/// A single node in the data store.
#[derive(Debug, Clone, PartialEq)]
pub struct DataObject {
    pub(crate) id: DataId,
    pub(crate) name: String,
    /// Owning parent (`None` for roots).
    pub(crate) parent: Option<DataId>,
    /// Owned children, in insertion order.
    pub(crate) children: Vec<DataId>,
    pub(crate) payload: Payload,
}

impl DataObject {
    pub fn id(&self) -> DataId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<DataId> {
        self.parent
    }

    pub fn children(&self) -> &[DataId] {
        &self.children
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn kind(&self) -> ObjectKind {
        self.payload.kind()
    }

    pub fn as_array(&self) -> Option<&DataArray> {
        match &self.payload {
            Payload::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut DataArray> {
        match &mut self.payload {
            Payload::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match &self.payload {
            Payload::Geometry(geometry) => Some(geometry),
            _ => None,
        }
    }

    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        self.as_geometry().map(Geometry::kind)
    }

    /// Tuple count contract of an attribute matrix.
    pub fn attribute_matrix_tuples(&self) -> Option<usize> {
        match &self.payload {
            Payload::AttributeMatrix { tuple_shape } => Some(saturating_product(tuple_shape)),
            _ => None,
        }
    }
}
