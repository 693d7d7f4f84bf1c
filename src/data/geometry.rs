//! Geometry payloads.
//!
//! A geometry owns its coordinate/connectivity arrays as tree children and
//! *refers* to the attribute matrices that hold per-vertex and per-element
//! data. Those matrices are usually children of the geometry too, but the
//! association itself is a plain [`DataId`] that survives only as long as
//! the referenced object does.

use crate::data::array::{
    byte_count, element_count, saturating_product, shape_product, DataArray,
};
use crate::data::id::DataId;
use crate::data::object::{DataObject, Payload};
use crate::data::path::{is_valid_name, DataPath};
use crate::data::structure::{DataStructure, StructureError, StructureResult};
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const SHARED_VERTEX_LIST: &str = "SharedVertexList";
pub const X_BOUNDS: &str = "xBounds";
pub const Y_BOUNDS: &str = "yBounds";
pub const Z_BOUNDS: &str = "zBounds";

/// Geometry flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Image,
    RectGrid,
    Vertex,
    Edge,
    Triangle,
    Quad,
    Tetrahedral,
    Hexahedral,
}

impl GeometryKind {
    pub fn all() -> &'static [GeometryKind] {
        &[
            GeometryKind::Image,
            GeometryKind::RectGrid,
            GeometryKind::Vertex,
            GeometryKind::Edge,
            GeometryKind::Triangle,
            GeometryKind::Quad,
            GeometryKind::Tetrahedral,
            GeometryKind::Hexahedral,
        ]
    }

    /// Vertices per element for mesh geometries.
    pub fn vertices_per_element(&self) -> Option<usize> {
        match self {
            GeometryKind::Edge => Some(2),
            GeometryKind::Triangle => Some(3),
            GeometryKind::Quad | GeometryKind::Tetrahedral => Some(4),
            GeometryKind::Hexahedral => Some(8),
            _ => None,
        }
    }

    /// Name of the connectivity array for mesh geometries.
    pub fn element_list_name(&self) -> Option<&'static str> {
        match self {
            GeometryKind::Edge => Some("SharedEdgeList"),
            GeometryKind::Triangle | GeometryKind::Quad => Some("SharedFaceList"),
            GeometryKind::Tetrahedral => Some("SharedTetList"),
            GeometryKind::Hexahedral => Some("SharedHexList"),
            _ => None,
        }
    }

    /// Grid geometries are described by dimensions rather than vertex lists.
    pub fn is_grid(&self) -> bool {
        matches!(self, GeometryKind::Image | GeometryKind::RectGrid)
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GeometryKind::Image => "Image",
            GeometryKind::RectGrid => "RectGrid",
            GeometryKind::Vertex => "Vertex",
            GeometryKind::Edge => "Edge",
            GeometryKind::Triangle => "Triangle",
            GeometryKind::Quad => "Quad",
            GeometryKind::Tetrahedral => "Tetrahedral",
            GeometryKind::Hexahedral => "Hexahedral",
        };
        write!(f, "{}", name)
    }
}

/// Geometry node payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    kind: GeometryKind,
    /// Cell counts along x, y, z (grid geometries only).
    dimensions: [usize; 3],
    origin: [f32; 3],
    spacing: [f32; 3],
    /// Owned coordinate array (vertex and mesh geometries).
    pub(crate) vertices: Option<DataId>,
    /// Owned connectivity array (mesh geometries).
    pub(crate) elements: Option<DataId>,
    /// Owned bounds arrays (rectilinear grids).
    pub(crate) bounds: Option<[DataId; 3]>,
    /// Associated per-vertex attribute matrix.
    pub(crate) vertex_data: Option<DataId>,
    /// Associated per-cell / per-element attribute matrix.
    pub(crate) element_data: Option<DataId>,
}

impl Geometry {
    fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            dimensions: [0; 3],
            origin: [0.0; 3],
            spacing: [1.0; 3],
            vertices: None,
            elements: None,
            bounds: None,
            vertex_data: None,
            element_data: None,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    pub fn origin(&self) -> [f32; 3] {
        self.origin
    }

    pub fn spacing(&self) -> [f32; 3] {
        self.spacing
    }

    pub fn vertex_data(&self) -> Option<DataId> {
        self.vertex_data
    }

    pub fn element_data(&self) -> Option<DataId> {
        self.element_data
    }

    pub fn vertices(&self) -> Option<DataId> {
        self.vertices
    }

    pub fn elements(&self) -> Option<DataId> {
        self.elements
    }

    /// Number of cells of a grid geometry.
    pub fn cell_count(&self) -> usize {
        saturating_product(&self.dimensions)
    }

    /// Point `element_data` at another attribute matrix.
    pub fn set_element_data(&mut self, matrix: Option<DataId>) {
        self.element_data = matrix;
    }

    pub(crate) fn remap(&mut self, mapping: &HashMap<DataId, DataId>) {
        let map = |id: &mut Option<DataId>| {
            if let Some(old) = id {
                if let Some(new) = mapping.get(old) {
                    *id = Some(*new);
                }
            }
        };
        map(&mut self.vertices);
        map(&mut self.elements);
        map(&mut self.vertex_data);
        map(&mut self.element_data);
        if let Some(bounds) = &mut self.bounds {
            for id in bounds.iter_mut() {
                if let Some(new) = mapping.get(id) {
                    *id = *new;
                }
            }
        }
    }

    /// Expected tuple count of the element-data matrix.
    fn expected_element_tuples(&self, ds: &DataStructure) -> Option<usize> {
        if self.kind.is_grid() {
            return Some(self.cell_count());
        }
        self.elements
            .and_then(|id| ds.get(id))
            .and_then(DataObject::as_array)
            .map(DataArray::tuple_count)
    }

    fn expected_vertex_tuples(&self, ds: &DataStructure) -> Option<usize> {
        self.vertices
            .and_then(|id| ds.get(id))
            .and_then(DataObject::as_array)
            .map(DataArray::tuple_count)
    }

    /// Append every broken association of this geometry to `issues`.
    pub(crate) fn validate(&self, ds: &DataStructure, own_id: DataId, issues: &mut Vec<StructureError>) {
        let geometry_path = ds.path_of(own_id).unwrap_or_default();

        let owned = [self.vertices, self.elements]
            .into_iter()
            .flatten()
            .chain(self.bounds.into_iter().flatten());
        for id in owned {
            if ds.get(id).and_then(DataObject::as_array).is_none() {
                issues.push(StructureError::DanglingReference {
                    geometry: geometry_path.clone(),
                    id,
                });
            }
        }

        let associations = [
            (self.vertex_data, self.expected_vertex_tuples(ds)),
            (self.element_data, self.expected_element_tuples(ds)),
        ];
        for (matrix, expected) in associations {
            let Some(matrix_id) = matrix else {
                continue;
            };
            let Some(actual) = ds.get(matrix_id).and_then(DataObject::attribute_matrix_tuples)
            else {
                issues.push(StructureError::DanglingReference {
                    geometry: geometry_path.clone(),
                    id: matrix_id,
                });
                continue;
            };
            if let Some(expected) = expected {
                if expected != actual {
                    issues.push(StructureError::TupleMismatch {
                        matrix: ds.path_of(matrix_id).unwrap_or_default(),
                        object: geometry_path.clone(),
                        expected,
                        actual,
                    });
                }
            }
        }
    }
}

/// Creation parameters for each geometry flavour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometrySpec {
    Image {
        dimensions: [usize; 3],
        origin: [f32; 3],
        spacing: [f32; 3],
        cell_data_name: String,
    },
    RectGrid {
        dimensions: [usize; 3],
        cell_data_name: String,
    },
    Vertex {
        vertex_count: usize,
        vertex_data_name: String,
    },
    Mesh {
        kind: GeometryKind,
        vertex_count: usize,
        element_count: usize,
        vertex_data_name: String,
        element_data_name: String,
    },
}

impl GeometrySpec {
    pub fn kind(&self) -> GeometryKind {
        match self {
            GeometrySpec::Image { .. } => GeometryKind::Image,
            GeometrySpec::RectGrid { .. } => GeometryKind::RectGrid,
            GeometrySpec::Vertex { .. } => GeometryKind::Vertex,
            GeometrySpec::Mesh { kind, .. } => *kind,
        }
    }

    /// Validate this description on its own, before touching any store.
    pub fn check(&self) -> Result<(), String> {
        match self {
            GeometrySpec::Image {
                dimensions,
                origin,
                spacing,
                cell_data_name,
            } => {
                check_dimensions(dimensions)?;
                if origin.iter().chain(spacing).any(|v| !v.is_finite()) {
                    return Err(format!(
                        "Origin {:?} and spacing {:?} must be finite",
                        origin, spacing
                    ));
                }
                if spacing.iter().any(|s| *s <= 0.0) {
                    return Err(format!("Spacing must be positive, got {:?}", spacing));
                }
                check_name(cell_data_name)
            }
            GeometrySpec::RectGrid {
                dimensions,
                cell_data_name,
            } => {
                check_dimensions(dimensions)?;
                check_name(cell_data_name)
            }
            GeometrySpec::Vertex {
                vertex_data_name, ..
            } => {
                check_name(vertex_data_name)?;
                if vertex_data_name == SHARED_VERTEX_LIST {
                    return Err(format!("'{}' is reserved", SHARED_VERTEX_LIST));
                }
                Ok(())
            }
            GeometrySpec::Mesh {
                kind,
                vertex_data_name,
                element_data_name,
                ..
            } => {
                let Some(element_list) = kind.element_list_name() else {
                    return Err(format!("{} is not a mesh geometry", kind));
                };
                check_name(vertex_data_name)?;
                check_name(element_data_name)?;
                let names = [
                    SHARED_VERTEX_LIST,
                    element_list,
                    vertex_data_name.as_str(),
                    element_data_name.as_str(),
                ];
                for (i, a) in names.iter().enumerate() {
                    if names[i + 1..].contains(a) {
                        return Err(format!("Geometry child name '{}' is used twice", a));
                    }
                }
                Ok(())
            }
        }
    }
}

fn check_dimensions(dimensions: &[usize; 3]) -> Result<(), String> {
    if dimensions.iter().any(|d| *d == 0) {
        return Err(format!("All dimensions must be non-zero, got {:?}", dimensions));
    }
    // Rectilinear bounds hold one more value than cells per axis.
    if shape_product(dimensions).is_none() || dimensions.iter().any(|d| *d == usize::MAX) {
        return Err(format!("Dimensions {:?} overflow the cell count", dimensions));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<(), String> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(format!("'{}' is not a valid object name", name))
    }
}

/// Array of the right shape, allocated only when `allocate` is set.
fn make_array(
    data_type: DataType,
    tuples: usize,
    components: usize,
    allocate: bool,
) -> StructureResult<Payload> {
    element_count(&[tuples], &[components])
        .and_then(|len| byte_count(data_type, len))
        .map_err(StructureError::Invalid)?;
    let array = if allocate {
        DataArray::filled(data_type, vec![tuples], vec![components], "0")
            .map_err(StructureError::Invalid)?
    } else {
        DataArray::empty(data_type, vec![tuples], vec![components])
    };
    Ok(Payload::Array(array))
}

impl DataStructure {
    /// Create a geometry with its owned arrays and associated attribute
    /// matrices. On failure nothing is left behind.
    pub fn create_geometry(
        &mut self,
        path: &DataPath,
        spec: &GeometrySpec,
        allocate: bool,
    ) -> StructureResult<DataId> {
        spec.check().map_err(StructureError::Invalid)?;
        let geometry_id = self.insert_at(path, Payload::Geometry(Geometry::new(spec.kind())))?;
        match self.populate_geometry(geometry_id, spec, allocate) {
            Ok(geometry) => {
                if let Some(object) = self.get_mut(geometry_id) {
                    object.payload = Payload::Geometry(geometry);
                }
                Ok(geometry_id)
            }
            Err(e) => {
                let _ = self.remove(geometry_id);
                Err(e)
            }
        }
    }

    fn populate_geometry(
        &mut self,
        id: DataId,
        spec: &GeometrySpec,
        allocate: bool,
    ) -> StructureResult<Geometry> {
        let mut geometry = Geometry::new(spec.kind());
        match spec {
            GeometrySpec::Image {
                dimensions,
                origin,
                spacing,
                cell_data_name,
            } => {
                geometry.dimensions = *dimensions;
                geometry.origin = *origin;
                geometry.spacing = *spacing;
                let shape = vec![dimensions[2], dimensions[1], dimensions[0]];
                geometry.element_data = Some(self.insert(
                    Some(id),
                    cell_data_name,
                    Payload::AttributeMatrix { tuple_shape: shape },
                )?);
            }
            GeometrySpec::RectGrid {
                dimensions,
                cell_data_name,
            } => {
                geometry.dimensions = *dimensions;
                let mut bounds = [id; 3];
                for (axis, name) in [X_BOUNDS, Y_BOUNDS, Z_BOUNDS].iter().enumerate() {
                    bounds[axis] = self.insert(
                        Some(id),
                        name,
                        make_array(DataType::Float32, dimensions[axis] + 1, 1, allocate)?,
                    )?;
                }
                geometry.bounds = Some(bounds);
                let shape = vec![dimensions[2], dimensions[1], dimensions[0]];
                geometry.element_data = Some(self.insert(
                    Some(id),
                    cell_data_name,
                    Payload::AttributeMatrix { tuple_shape: shape },
                )?);
            }
            GeometrySpec::Vertex {
                vertex_count,
                vertex_data_name,
            } => {
                geometry.vertices = Some(self.insert(
                    Some(id),
                    SHARED_VERTEX_LIST,
                    make_array(DataType::Float32, *vertex_count, 3, allocate)?,
                )?);
                geometry.vertex_data = Some(self.insert(
                    Some(id),
                    vertex_data_name,
                    Payload::AttributeMatrix {
                        tuple_shape: vec![*vertex_count],
                    },
                )?);
            }
            GeometrySpec::Mesh {
                kind,
                vertex_count,
                element_count,
                vertex_data_name,
                element_data_name,
            } => {
                let per_element = kind.vertices_per_element().unwrap_or(0);
                let element_list = kind.element_list_name().unwrap_or("SharedElementList");
                geometry.vertices = Some(self.insert(
                    Some(id),
                    SHARED_VERTEX_LIST,
                    make_array(DataType::Float32, *vertex_count, 3, allocate)?,
                )?);
                geometry.elements = Some(self.insert(
                    Some(id),
                    element_list,
                    make_array(DataType::UInt64, *element_count, per_element, allocate)?,
                )?);
                geometry.vertex_data = Some(self.insert(
                    Some(id),
                    vertex_data_name,
                    Payload::AttributeMatrix {
                        tuple_shape: vec![*vertex_count],
                    },
                )?);
                geometry.element_data = Some(self.insert(
                    Some(id),
                    element_data_name,
                    Payload::AttributeMatrix {
                        tuple_shape: vec![*element_count],
                    },
                )?);
            }
        }
        Ok(geometry)
    }
}
