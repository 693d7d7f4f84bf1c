//! Hierarchical typed data store.
//!
//! Objects are stored flat in a map keyed by [`DataId`], with parent/child
//! links forming a forest. Every object has at most one owning parent;
//! geometry → attribute-matrix associations are plain ids and are not tree
//! edges.
//!
//! ```text
//! Image                  (Geometry, image)
//! +-- CellData           (AttributeMatrix, 10 tuples)
//! |   +-- Phases         (DataArray int32 [10] x [1])
//! |   +-- Mask           (DataArray boolean [10] x [1])
//! FeatureData            (AttributeMatrix, 10 tuples)
//! +-- Omega3s            (DataArray float32 [10] x [1])
//! ```
//!
//! Structural changes go through [`DataAction`](crate::actions::DataAction)s;
//! the mutating methods here are the primitives those actions use.

use crate::data::array::{byte_count, element_count, shape_product, DataArray};
use crate::data::geometry::Geometry;
use crate::data::id::DataId;
use crate::data::object::{DataObject, ObjectKind, Payload};
use crate::data::path::{is_valid_name, DataPath};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Structural failures of store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    #[error("'{0}' is not a valid object name")]
    InvalidName(String),

    #[error("The empty path does not address an object")]
    EmptyPath,

    #[error("Object '{0}' does not exist")]
    NotFound(DataPath),

    #[error("Object '{0}' cannot contain child objects")]
    NotAContainer(DataPath),

    #[error("An object already exists at '{0}'")]
    AlreadyExists(DataPath),

    #[error("Attribute matrix '{0}' can only contain data arrays")]
    AttributeMatrixChild(DataPath),

    #[error("Attribute matrix '{matrix}' holds {expected} tuples but '{object}' has {actual}")]
    TupleMismatch {
        matrix: DataPath,
        object: DataPath,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot move '{source_path}' into itself or its descendant '{destination}'")]
    Cycle {
        source_path: DataPath,
        destination: DataPath,
    },

    #[error("Geometry '{geometry}' references {id} which no longer exists")]
    DanglingReference { geometry: DataPath, id: DataId },

    #[error("Unknown object {0}")]
    UnknownId(DataId),

    #[error("{0}")]
    Invalid(String),
}

pub type StructureResult<T> = std::result::Result<T, StructureError>;

/// Flat-storage object forest.
///
/// - `DataId`s come from a monotonic counter and are never reused.
/// - Children keep insertion order, so traversal is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStructure {
    objects: BTreeMap<DataId, DataObject>,
    roots: Vec<DataId>,
    next_id: u64,
}

impl DataStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove every object. Used between independent runs.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.roots.clear();
        self.next_id = 0;
    }

    // ── Lookup ──

    #[inline]
    pub fn get(&self, id: DataId) -> Option<&DataObject> {
        self.objects.get(&id)
    }

    /// Mutable object access. Tree links are not reachable through it.
    #[inline]
    pub fn get_mut(&mut self, id: DataId) -> Option<&mut DataObject> {
        self.objects.get_mut(&id)
    }

    /// Iterate over all objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &DataObject> {
        self.objects.values()
    }

    /// Top-level objects.
    pub fn roots(&self) -> &[DataId] {
        &self.roots
    }

    /// Children of `parent`, or the roots when `parent` is `None`.
    pub fn children_of(&self, parent: Option<DataId>) -> &[DataId] {
        match parent {
            Some(id) => self
                .objects
                .get(&id)
                .map(|o| o.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    pub fn child_by_name(&self, parent: Option<DataId>, name: &str) -> Option<DataId> {
        self.children_of(parent)
            .iter()
            .copied()
            .find(|id| self.objects.get(id).is_some_and(|o| o.name == name))
    }

    /// Walk `path` from the roots.
    pub fn resolve(&self, path: &DataPath) -> StructureResult<DataId> {
        if path.is_empty() {
            return Err(StructureError::EmptyPath);
        }
        let mut current: Option<DataId> = None;
        for (depth, segment) in path.segments().iter().enumerate() {
            if let Some(id) = current {
                let object = self.objects.get(&id).ok_or(StructureError::UnknownId(id))?;
                if !object.payload.is_container() {
                    return Err(StructureError::NotAContainer(DataPath::new(
                        path.segments()[..depth].iter().cloned(),
                    )));
                }
            }
            current = Some(
                self.child_by_name(current, segment)
                    .ok_or_else(|| StructureError::NotFound(path.clone()))?,
            );
        }
        current.ok_or(StructureError::EmptyPath)
    }

    /// Resolve the container `path` would be created in (`None` = root level).
    pub fn resolve_parent(&self, path: &DataPath) -> StructureResult<Option<DataId>> {
        let parent = path.parent().ok_or(StructureError::EmptyPath)?;
        if parent.is_empty() {
            return Ok(None);
        }
        let id = self.resolve(&parent)?;
        let object = self.objects.get(&id).ok_or(StructureError::UnknownId(id))?;
        if !object.payload.is_container() {
            return Err(StructureError::NotAContainer(parent));
        }
        Ok(Some(id))
    }

    pub fn contains(&self, path: &DataPath) -> bool {
        self.resolve(path).is_ok()
    }

    pub fn object(&self, path: &DataPath) -> Option<&DataObject> {
        self.resolve(path).ok().and_then(|id| self.objects.get(&id))
    }

    pub fn array(&self, path: &DataPath) -> Option<&DataArray> {
        self.object(path).and_then(DataObject::as_array)
    }

    pub fn array_mut(&mut self, path: &DataPath) -> Option<&mut DataArray> {
        let id = self.resolve(path).ok()?;
        self.objects.get_mut(&id).and_then(DataObject::as_array_mut)
    }

    pub fn geometry(&self, path: &DataPath) -> Option<&Geometry> {
        self.object(path).and_then(DataObject::as_geometry)
    }

    /// Full path of an object.
    pub fn path_of(&self, id: DataId) -> Option<DataPath> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let object = self.objects.get(&cur)?;
            names.push(object.name.clone());
            current = object.parent;
        }
        names.reverse();
        Some(DataPath::new(names))
    }

    /// Depth-first list of every object path, children in insertion order.
    pub fn paths(&self) -> Vec<DataPath> {
        let mut out = Vec::with_capacity(self.objects.len());
        for &root in &self.roots {
            self.collect_paths(root, DataPath::root(), &mut out);
        }
        out
    }

    fn collect_paths(&self, id: DataId, prefix: DataPath, out: &mut Vec<DataPath>) {
        let Some(object) = self.objects.get(&id) else {
            return;
        };
        let path = prefix.child(object.name.clone());
        out.push(path.clone());
        for &child in &object.children {
            self.collect_paths(child, path.clone(), out);
        }
    }

    /// True if `ancestor` is `id` or one of its owners.
    pub fn is_ancestor(&self, ancestor: DataId, id: DataId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.objects.get(&cur).and_then(|o| o.parent);
        }
        false
    }

    // ── Mutation primitives ──

    /// Add a new object under `parent` (`None` = root level).
    pub fn insert(
        &mut self,
        parent: Option<DataId>,
        name: &str,
        payload: Payload,
    ) -> StructureResult<DataId> {
        if !is_valid_name(name) {
            return Err(StructureError::InvalidName(name.to_string()));
        }
        let new_path = self.child_path(parent, name)?;
        if self.child_by_name(parent, name).is_some() {
            return Err(StructureError::AlreadyExists(new_path));
        }
        self.check_container_accepts(parent, array_tuples(&payload), &new_path)?;

        let id = DataId(self.next_id);
        self.next_id += 1;
        self.objects.insert(
            id,
            DataObject {
                id,
                name: name.to_string(),
                parent,
                children: Vec::new(),
                payload,
            },
        );
        self.link(parent, id);
        Ok(id)
    }

    /// Add a new object at `path`; the parent must already exist.
    pub fn insert_at(&mut self, path: &DataPath, payload: Payload) -> StructureResult<DataId> {
        let parent = self.resolve_parent(path)?;
        let name = path.target_name().ok_or(StructureError::EmptyPath)?;
        self.insert(parent, name, payload)
    }

    /// Remove an object and everything it owns. Returns the removed ids.
    pub fn remove(&mut self, id: DataId) -> StructureResult<Vec<DataId>> {
        if !self.objects.contains_key(&id) {
            return Err(StructureError::UnknownId(id));
        }
        let mut removed = Vec::new();
        self.collect_subtree(id, &mut removed);
        self.unlink(id);
        for rid in &removed {
            self.objects.remove(rid);
        }
        Ok(removed)
    }

    /// Give an object a new name, keeping sibling names unique.
    pub fn rename(&mut self, id: DataId, new_name: &str) -> StructureResult<()> {
        if !is_valid_name(new_name) {
            return Err(StructureError::InvalidName(new_name.to_string()));
        }
        let object = self.objects.get(&id).ok_or(StructureError::UnknownId(id))?;
        if object.name == new_name {
            return Ok(());
        }
        let parent = object.parent;
        if self.child_by_name(parent, new_name).is_some() {
            return Err(StructureError::AlreadyExists(
                self.child_path(parent, new_name)?,
            ));
        }
        if let Some(object) = self.objects.get_mut(&id) {
            object.name = new_name.to_string();
        }
        Ok(())
    }

    /// Move an object (and its subtree) under `new_parent`.
    pub fn reparent(&mut self, id: DataId, new_parent: Option<DataId>) -> StructureResult<()> {
        let object = self.objects.get(&id).ok_or(StructureError::UnknownId(id))?;
        let name = object.name.clone();
        let tuples = array_tuples(&object.payload);
        if object.parent == new_parent {
            return Ok(());
        }
        if let Some(target) = new_parent {
            if self.is_ancestor(id, target) {
                return Err(StructureError::Cycle {
                    source_path: self.path_of(id).unwrap_or_default(),
                    destination: self.path_of(target).unwrap_or_default(),
                });
            }
        }
        let new_path = self.child_path(new_parent, &name)?;
        if self.child_by_name(new_parent, &name).is_some() {
            return Err(StructureError::AlreadyExists(new_path));
        }
        self.check_container_accepts(new_parent, tuples, &new_path)?;

        self.unlink(id);
        if let Some(object) = self.objects.get_mut(&id) {
            object.parent = new_parent;
        }
        self.link(new_parent, id);
        Ok(())
    }

    /// Deep-copy `id` under `new_parent` with `new_name`. Geometry references
    /// that point inside the copied subtree are remapped to the copies.
    pub fn deep_copy(
        &mut self,
        id: DataId,
        new_parent: Option<DataId>,
        new_name: &str,
    ) -> StructureResult<DataId> {
        if let Some(target) = new_parent {
            if self.is_ancestor(id, target) {
                return Err(StructureError::Cycle {
                    source_path: self.path_of(id).unwrap_or_default(),
                    destination: self.path_of(target).unwrap_or_default(),
                });
            }
        }
        let mut mapping = HashMap::new();
        let copy = self.copy_recursive(id, new_parent, new_name, &mut mapping)?;
        for new_id in mapping.values() {
            if let Some(Payload::Geometry(geometry)) =
                self.objects.get_mut(new_id).map(|o| &mut o.payload)
            {
                geometry.remap(&mapping);
            }
        }
        Ok(copy)
    }

    fn copy_recursive(
        &mut self,
        id: DataId,
        parent: Option<DataId>,
        name: &str,
        mapping: &mut HashMap<DataId, DataId>,
    ) -> StructureResult<DataId> {
        let object = self.objects.get(&id).ok_or(StructureError::UnknownId(id))?;
        let payload = object.payload.clone();
        let children: Vec<(DataId, String)> = object
            .children
            .iter()
            .filter_map(|c| self.objects.get(c).map(|o| (*c, o.name.clone())))
            .collect();
        let new_id = match self.insert(parent, name, payload) {
            Ok(new_id) => new_id,
            Err(e) => {
                // Undo the partial copy so the caller sees a single failure.
                if let Some(&root_copy) = mapping.values().min() {
                    let _ = self.remove(root_copy);
                }
                return Err(e);
            }
        };
        mapping.insert(id, new_id);
        for (child, child_name) in children {
            self.copy_recursive(child, Some(new_id), &child_name, mapping)?;
        }
        Ok(new_id)
    }

    /// Change an attribute matrix's tuple shape, resizing every array it owns.
    /// Nothing changes when the new shape does not fit one of the arrays.
    pub fn resize_attribute_matrix(
        &mut self,
        id: DataId,
        tuple_shape: Vec<usize>,
    ) -> StructureResult<()> {
        let object = self.objects.get(&id).ok_or(StructureError::UnknownId(id))?;
        if object.attribute_matrix_tuples().is_none() {
            return Err(StructureError::Invalid(format!(
                "{} is not an attribute matrix",
                id
            )));
        }
        if shape_product(&tuple_shape).is_none() {
            return Err(StructureError::Invalid(format!(
                "The tuple shape {:?} overflows the element count",
                tuple_shape
            )));
        }
        let children = object.children.clone();
        for child in &children {
            if let Some(array) = self.objects.get(child).and_then(DataObject::as_array) {
                element_count(&tuple_shape, array.component_shape())
                    .and_then(|len| byte_count(array.data_type(), len))
                    .map_err(StructureError::Invalid)?;
            }
        }

        if let Some(object) = self.objects.get_mut(&id) {
            object.payload = Payload::AttributeMatrix {
                tuple_shape: tuple_shape.clone(),
            };
        }
        for child in children {
            if let Some(array) = self.objects.get_mut(&child).and_then(DataObject::as_array_mut) {
                array
                    .resize_tuples(tuple_shape.clone())
                    .map_err(StructureError::Invalid)?;
            }
        }
        Ok(())
    }

    /// Same object graph with every array replaced by a shape-only placeholder.
    pub fn preview_copy(&self) -> DataStructure {
        let objects = self
            .objects
            .iter()
            .map(|(id, object)| {
                let payload = match &object.payload {
                    Payload::Array(array) => Payload::Array(array.to_placeholder()),
                    other => other.clone(),
                };
                (
                    *id,
                    DataObject {
                        payload,
                        ..object.clone()
                    },
                )
            })
            .collect();
        DataStructure {
            objects,
            roots: self.roots.clone(),
            next_id: self.next_id,
        }
    }

    // ── Invariant checks ──

    /// Check the invariants that filter bodies could have broken:
    /// every attribute matrix's arrays share its tuple count, and every
    /// geometry's associated matrices exist with consistent tuple counts.
    pub fn validate_structure(&self) -> Vec<StructureError> {
        let mut issues = Vec::new();
        for object in self.objects.values() {
            match &object.payload {
                Payload::AttributeMatrix { .. } => {
                    let expected = object.attribute_matrix_tuples().unwrap_or(0);
                    for child in &object.children {
                        let Some(array) = self.objects.get(child).and_then(DataObject::as_array)
                        else {
                            continue;
                        };
                        if array.tuple_count() != expected {
                            issues.push(StructureError::TupleMismatch {
                                matrix: self.path_of(object.id).unwrap_or_default(),
                                object: self.path_of(*child).unwrap_or_default(),
                                expected,
                                actual: array.tuple_count(),
                            });
                        }
                    }
                }
                Payload::Geometry(geometry) => {
                    geometry.validate(self, object.id, &mut issues);
                }
                _ => {}
            }
        }
        issues
    }

    // ── Internal helpers ──

    fn child_path(&self, parent: Option<DataId>, name: &str) -> StructureResult<DataPath> {
        let base = match parent {
            Some(id) => self.path_of(id).ok_or(StructureError::UnknownId(id))?,
            None => DataPath::root(),
        };
        if is_valid_name(name) {
            Ok(base.child(name))
        } else {
            Err(StructureError::InvalidName(name.to_string()))
        }
    }

    fn check_container_accepts(
        &self,
        parent: Option<DataId>,
        array_tuples: Option<usize>,
        new_path: &DataPath,
    ) -> StructureResult<()> {
        let Some(parent_id) = parent else {
            return Ok(());
        };
        let parent_object = self
            .objects
            .get(&parent_id)
            .ok_or(StructureError::UnknownId(parent_id))?;
        let parent_path = self.path_of(parent_id).unwrap_or_default();
        if !parent_object.payload.is_container() {
            return Err(StructureError::NotAContainer(parent_path));
        }
        if let Some(expected) = parent_object.attribute_matrix_tuples() {
            let Some(actual) = array_tuples else {
                return Err(StructureError::AttributeMatrixChild(parent_path));
            };
            if actual != expected {
                return Err(StructureError::TupleMismatch {
                    matrix: parent_path,
                    object: new_path.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    fn link(&mut self, parent: Option<DataId>, id: DataId) {
        match parent {
            Some(pid) => {
                if let Some(p) = self.objects.get_mut(&pid) {
                    p.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
    }

    fn unlink(&mut self, id: DataId) {
        let parent = self.objects.get(&id).and_then(|o| o.parent);
        match parent {
            Some(pid) => {
                if let Some(p) = self.objects.get_mut(&pid) {
                    p.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    fn collect_subtree(&self, id: DataId, out: &mut Vec<DataId>) {
        out.push(id);
        if let Some(object) = self.objects.get(&id) {
            for &child in &object.children {
                self.collect_subtree(child, out);
            }
        }
    }

    /// Objects of one kind, in id order.
    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &DataObject> {
        self.objects.values().filter(move |o| o.kind() == kind)
    }
}

/// Tuple count of an array payload; `None` for anything else.
fn array_tuples(payload: &Payload) -> Option<usize> {
    match payload {
        Payload::Array(array) => Some(array.tuple_count()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn array(tuples: usize) -> Payload {
        Payload::Array(DataArray::filled(DataType::Float32, vec![tuples], vec![1], "0").unwrap())
    }

    fn matrix(tuples: usize) -> Payload {
        Payload::AttributeMatrix {
            tuple_shape: vec![tuples],
        }
    }

    #[test]
    fn test_insert_and_resolve() {
        let mut ds = DataStructure::new();
        let group = ds.insert(None, "Group", Payload::Group).unwrap();
        let child = ds.insert(Some(group), "Values", array(4)).unwrap();

        let path = DataPath::new(["Group", "Values"]);
        assert_eq!(ds.resolve(&path).unwrap(), child);
        assert_eq!(ds.path_of(child).unwrap(), path);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.roots(), &[group]);
    }

    #[test]
    fn test_resolve_failures() {
        let mut ds = DataStructure::new();
        let group = ds.insert(None, "Group", Payload::Group).unwrap();
        ds.insert(Some(group), "Values", array(4)).unwrap();

        assert_eq!(
            ds.resolve(&DataPath::new(["Group", "Missing"])),
            Err(StructureError::NotFound(DataPath::new(["Group", "Missing"])))
        );
        assert_eq!(
            ds.resolve(&DataPath::new(["Group", "Values", "Deeper"])),
            Err(StructureError::NotAContainer(DataPath::new(["Group", "Values"])))
        );
        assert_eq!(ds.resolve(&DataPath::root()), Err(StructureError::EmptyPath));
    }

    #[test]
    fn test_sibling_names_unique() {
        let mut ds = DataStructure::new();
        ds.insert(None, "A", Payload::Group).unwrap();
        assert!(matches!(
            ds.insert(None, "A", Payload::Group),
            Err(StructureError::AlreadyExists(_))
        ));
        assert!(matches!(
            ds.insert(None, "", Payload::Group),
            Err(StructureError::InvalidName(_))
        ));
    }

    #[test]
    fn test_attribute_matrix_tuple_contract() {
        let mut ds = DataStructure::new();
        let am = ds.insert(None, "FeatureData", matrix(10)).unwrap();
        assert!(ds.insert(Some(am), "Good", array(10)).is_ok());
        assert!(matches!(
            ds.insert(Some(am), "Bad", array(7)),
            Err(StructureError::TupleMismatch { expected: 10, actual: 7, .. })
        ));
        assert!(matches!(
            ds.insert(Some(am), "Nested", Payload::Group),
            Err(StructureError::AttributeMatrixChild(_))
        ));
    }

    #[test]
    fn test_arrays_cannot_own_children() {
        let mut ds = DataStructure::new();
        let values = ds.insert(None, "Values", array(3)).unwrap();
        assert!(matches!(
            ds.insert(Some(values), "Child", Payload::Group),
            Err(StructureError::NotAContainer(_))
        ));
    }

    #[test]
    fn test_remove_subtree() {
        let mut ds = DataStructure::new();
        let a = ds.insert(None, "A", Payload::Group).unwrap();
        let b = ds.insert(Some(a), "B", Payload::Group).unwrap();
        let c = ds.insert(Some(b), "C", array(2)).unwrap();
        let removed = ds.remove(b).unwrap();
        assert_eq!(removed, vec![b, c]);
        assert!(ds.get(c).is_none());
        assert!(ds.get(a).unwrap().children().is_empty());
    }

    #[test]
    fn test_rename() {
        let mut ds = DataStructure::new();
        let a = ds.insert(None, "A", Payload::Group).unwrap();
        ds.insert(None, "B", Payload::Group).unwrap();
        assert!(ds.rename(a, "B").is_err());
        ds.rename(a, "C").unwrap();
        assert!(ds.contains(&DataPath::new(["C"])));
        assert!(!ds.contains(&DataPath::new(["A"])));
    }

    #[test]
    fn test_reparent_rejects_cycles() {
        let mut ds = DataStructure::new();
        let a = ds.insert(None, "A", Payload::Group).unwrap();
        let b = ds.insert(Some(a), "B", Payload::Group).unwrap();
        assert!(matches!(ds.reparent(a, Some(b)), Err(StructureError::Cycle { .. })));
        assert!(matches!(ds.reparent(a, Some(a)), Err(StructureError::Cycle { .. })));

        ds.reparent(b, None).unwrap();
        assert_eq!(ds.roots(), &[a, b]);
        assert_eq!(ds.get(b).unwrap().parent(), None);
    }

    #[test]
    fn test_deep_copy() {
        let mut ds = DataStructure::new();
        let am = ds.insert(None, "CellData", matrix(3)).unwrap();
        ds.insert(Some(am), "Phases", array(3)).unwrap();
        let copy = ds.deep_copy(am, None, "CellDataCopy").unwrap();
        assert_eq!(ds.get(copy).unwrap().children().len(), 1);
        assert!(ds.contains(&DataPath::new(["CellDataCopy", "Phases"])));
        assert!(ds.contains(&DataPath::new(["CellData", "Phases"])));
    }

    #[test]
    fn test_preview_copy_drops_storage() {
        let mut ds = DataStructure::new();
        ds.insert(None, "Values", array(5)).unwrap();
        let preview = ds.preview_copy();
        let values = preview.array(&DataPath::new(["Values"])).unwrap();
        assert!(!values.is_allocated());
        assert_eq!(values.tuple_count(), 5);
        assert_eq!(preview.paths(), ds.paths());
    }

    #[test]
    fn test_validate_structure_detects_resized_array() {
        let mut ds = DataStructure::new();
        let am = ds.insert(None, "CellData", matrix(4)).unwrap();
        ds.insert(Some(am), "Phases", array(4)).unwrap();
        assert!(ds.validate_structure().is_empty());

        ds.array_mut(&DataPath::new(["CellData", "Phases"]))
            .unwrap()
            .resize_tuples(vec![6])
            .unwrap();
        let issues = ds.validate_structure();
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], StructureError::TupleMismatch { expected: 4, actual: 6, .. }));
    }

    #[test]
    fn test_resize_attribute_matrix() {
        let mut ds = DataStructure::new();
        let am = ds.insert(None, "CellData", matrix(4)).unwrap();
        ds.insert(Some(am), "Phases", array(4)).unwrap();
        ds.resize_attribute_matrix(am, vec![2, 3]).unwrap();
        assert_eq!(
            ds.array(&DataPath::new(["CellData", "Phases"])).unwrap().tuple_count(),
            6
        );
        assert!(ds.validate_structure().is_empty());
    }

    #[test]
    fn test_resize_attribute_matrix_rejects_overflow() {
        let mut ds = DataStructure::new();
        let am = ds.insert(None, "CellData", matrix(4)).unwrap();
        ds.insert(Some(am), "Phases", array(4)).unwrap();
        let before = ds.clone();

        assert!(ds.resize_attribute_matrix(am, vec![1 << 32, 1 << 32]).is_err());
        // Fits the shape product but not a float32 allocation.
        assert!(ds.resize_attribute_matrix(am, vec![usize::MAX / 2]).is_err());
        assert_eq!(ds, before);
    }

    #[test]
    fn test_clear() {
        let mut ds = DataStructure::new();
        ds.insert(None, "A", Payload::Group).unwrap();
        ds.clear();
        assert!(ds.is_empty());
        assert_eq!(ds, DataStructure::new());
    }
}
