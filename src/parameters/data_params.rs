//! Parameters whose validation needs the data store.

use crate::data::{DataArray, DataObject, DataPath, DataStructure, GeometryKind, ObjectKind};
use crate::filter::{codes, FilterError};
use crate::parameters::parameter::{impl_parameter, unexpected_kind, DataParameter, ParameterInfo};
use crate::parameters::value::ArgValue;
use crate::types::DataType;

fn invalid(info: &ParameterInfo, code: i32, message: String) -> FilterError {
    FilterError::validation(code, format!("{}: {}", info.human_name, message))
}

fn expect_path<'a>(info: &ParameterInfo, value: &'a ArgValue) -> &'a DataPath {
    match value {
        ArgValue::Path(path) => path,
        other => unexpected_kind(&info.name, other),
    }
}

/// Resolve `path` to an existing object.
fn existing<'a>(
    info: &ParameterInfo,
    data: &'a DataStructure,
    path: &DataPath,
) -> Result<&'a DataObject, FilterError> {
    if path.is_empty() {
        return Err(invalid(info, codes::PATH_NOT_FOUND, "No object selected".to_string()));
    }
    data.resolve(path)
        .ok()
        .and_then(|id| data.get(id))
        .ok_or_else(|| {
            invalid(
                info,
                codes::PATH_NOT_FOUND,
                format!("Object '{}' does not exist", path),
            )
        })
}

/// The path must be free and its parent must be able to hold a new object.
fn creatable(info: &ParameterInfo, data: &DataStructure, path: &DataPath) -> Result<(), FilterError> {
    let Some(name) = path.target_name() else {
        return Err(invalid(info, codes::PATH_NOT_FOUND, "No path given".to_string()));
    };
    if data.contains(path) {
        return Err(invalid(
            info,
            codes::PATH_EXISTS,
            format!("Object '{}' already exists", path),
        ));
    }
    if let Err(e) = data.resolve_parent(path) {
        return Err(invalid(
            info,
            codes::PATH_NOT_FOUND,
            format!("Cannot create '{}' here: {}", name, e),
        ));
    }
    Ok(())
}

fn check_array(
    info: &ParameterInfo,
    path: &DataPath,
    object: &DataObject,
    allowed_types: &[DataType],
    component_shapes: &[Vec<usize>],
) -> Result<usize, FilterError> {
    let Some(array) = object.as_array() else {
        return Err(invalid(
            info,
            codes::WRONG_OBJECT_KIND,
            format!("'{}' is a {}, not a DataArray", path, object.kind()),
        ));
    };
    check_array_type(info, path, array, allowed_types)?;
    if !component_shapes.is_empty()
        && !component_shapes
            .iter()
            .any(|shape| shape.as_slice() == array.component_shape())
    {
        return Err(invalid(
            info,
            codes::WRONG_COMPONENT_SHAPE,
            format!(
                "'{}' has component shape {:?}, expected one of {:?}",
                path,
                array.component_shape(),
                component_shapes
            ),
        ));
    }
    Ok(array.tuple_count())
}

fn check_array_type(
    info: &ParameterInfo,
    path: &DataPath,
    array: &DataArray,
    allowed_types: &[DataType],
) -> Result<(), FilterError> {
    if !allowed_types.is_empty() && !allowed_types.contains(&array.data_type()) {
        let names: Vec<String> = allowed_types.iter().map(DataType::to_string).collect();
        return Err(invalid(
            info,
            codes::WRONG_DATA_TYPE,
            format!(
                "'{}' is {}, expected one of [{}]",
                path,
                array.data_type(),
                names.join(", ")
            ),
        ));
    }
    Ok(())
}

// ─── ArraySelection ──────────────────────────────────────────────────────────

/// Path to an existing data array.
pub struct ArraySelectionParameter {
    info: ParameterInfo,
    default: DataPath,
    allowed_types: Vec<DataType>,
    component_shapes: Vec<Vec<usize>>,
    allow_empty: bool,
}

impl ArraySelectionParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataPath,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            allowed_types: Vec::new(),
            component_shapes: Vec::new(),
            allow_empty: false,
        }
    }

    /// Restrict element types. Empty means any.
    pub fn with_types(mut self, types: impl IntoIterator<Item = DataType>) -> Self {
        self.allowed_types = types.into_iter().collect();
        self
    }

    /// Require one of the given component shapes.
    pub fn with_component_shapes(mut self, shapes: Vec<Vec<usize>>) -> Self {
        self.component_shapes = shapes;
        self
    }

    /// Accept the empty path as "nothing selected".
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }
}

impl_parameter!(ArraySelectionParameter, Path, Data, |p| ArgValue::Path(p.default.clone()));

impl DataParameter for ArraySelectionParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        let path = expect_path(&self.info, value);
        if path.is_empty() && self.allow_empty {
            return Ok(());
        }
        let object = existing(&self.info, data, path)?;
        check_array(&self.info, path, object, &self.allowed_types, &self.component_shapes)?;
        Ok(())
    }
}

// ─── MultiArraySelection ─────────────────────────────────────────────────────

/// Several existing arrays that must all share one tuple count.
pub struct MultiArraySelectionParameter {
    info: ParameterInfo,
    default: Vec<DataPath>,
    allowed_types: Vec<DataType>,
    allow_empty: bool,
}

impl MultiArraySelectionParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: Vec<DataPath>,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            allowed_types: Vec::new(),
            allow_empty: false,
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = DataType>) -> Self {
        self.allowed_types = types.into_iter().collect();
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }
}

impl_parameter!(MultiArraySelectionParameter, PathVec, Data, |p| ArgValue::PathVec(p.default.clone()));

impl DataParameter for MultiArraySelectionParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        let ArgValue::PathVec(paths) = value else {
            unexpected_kind(&self.info.name, value)
        };
        if paths.is_empty() && !self.allow_empty {
            return Err(invalid(
                &self.info,
                codes::EMPTY_VALUE,
                "At least one array must be selected".to_string(),
            ));
        }
        let mut first: Option<(&DataPath, usize)> = None;
        for path in paths {
            let object = existing(&self.info, data, path)?;
            let tuples = check_array(&self.info, path, object, &self.allowed_types, &[])?;
            match first {
                None => first = Some((path, tuples)),
                Some((first_path, expected)) if expected != tuples => {
                    return Err(invalid(
                        &self.info,
                        codes::TUPLE_COUNT_MISMATCH,
                        format!(
                            "'{}' has {} tuples but '{}' has {}",
                            path, tuples, first_path, expected
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

// ─── ArrayCreation ───────────────────────────────────────────────────────────

/// Path of an array that the filter will create.
pub struct ArrayCreationParameter {
    info: ParameterInfo,
    default: DataPath,
}

impl ArrayCreationParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataPath,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
        }
    }
}

impl_parameter!(ArrayCreationParameter, Path, Data, |p| ArgValue::Path(p.default.clone()));

impl DataParameter for ArrayCreationParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        creatable(&self.info, data, expect_path(&self.info, value))
    }
}

// ─── DataGroupSelection ──────────────────────────────────────────────────────

/// Existing container of one of the allowed kinds.
pub struct DataGroupSelectionParameter {
    info: ParameterInfo,
    default: DataPath,
    allowed_kinds: Vec<ObjectKind>,
}

impl DataGroupSelectionParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataPath,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            allowed_kinds: vec![
                ObjectKind::Group,
                ObjectKind::AttributeMatrix,
                ObjectKind::Geometry,
            ],
        }
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ObjectKind>) -> Self {
        self.allowed_kinds = kinds.into_iter().collect();
        assert!(
            !self.allowed_kinds.contains(&ObjectKind::DataArray),
            "data arrays are not containers"
        );
        self
    }
}

impl_parameter!(DataGroupSelectionParameter, Path, Data, |p| ArgValue::Path(p.default.clone()));

impl DataParameter for DataGroupSelectionParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        let path = expect_path(&self.info, value);
        let object = existing(&self.info, data, path)?;
        if !self.allowed_kinds.contains(&object.kind()) {
            return Err(invalid(
                &self.info,
                codes::WRONG_OBJECT_KIND,
                format!("'{}' is a {}, which is not allowed here", path, object.kind()),
            ));
        }
        Ok(())
    }
}

// ─── DataGroupCreation ───────────────────────────────────────────────────────

/// Path of a container that the filter will create.
pub struct DataGroupCreationParameter {
    info: ParameterInfo,
    default: DataPath,
}

impl DataGroupCreationParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataPath,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
        }
    }
}

impl_parameter!(DataGroupCreationParameter, Path, Data, |p| ArgValue::Path(p.default.clone()));

impl DataParameter for DataGroupCreationParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        creatable(&self.info, data, expect_path(&self.info, value))
    }
}

// ─── GeometrySelection ───────────────────────────────────────────────────────

pub struct GeometrySelectionParameter {
    info: ParameterInfo,
    default: DataPath,
    allowed_kinds: Vec<GeometryKind>,
}

impl GeometrySelectionParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataPath,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
            allowed_kinds: Vec::new(),
        }
    }

    /// Restrict geometry kinds. Empty means any.
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = GeometryKind>) -> Self {
        self.allowed_kinds = kinds.into_iter().collect();
        self
    }
}

impl_parameter!(GeometrySelectionParameter, Path, Data, |p| ArgValue::Path(p.default.clone()));

impl DataParameter for GeometrySelectionParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        let path = expect_path(&self.info, value);
        let object = existing(&self.info, data, path)?;
        let Some(kind) = object.geometry_kind() else {
            return Err(invalid(
                &self.info,
                codes::WRONG_OBJECT_KIND,
                format!("'{}' is a {}, not a Geometry", path, object.kind()),
            ));
        };
        if !self.allowed_kinds.is_empty() && !self.allowed_kinds.contains(&kind) {
            return Err(invalid(
                &self.info,
                codes::WRONG_OBJECT_KIND,
                format!("'{}' is a {} geometry, which is not allowed here", path, kind),
            ));
        }
        Ok(())
    }
}

// ─── DataPathSelection ───────────────────────────────────────────────────────

/// Any existing object.
pub struct DataPathSelectionParameter {
    info: ParameterInfo,
    default: DataPath,
}

impl DataPathSelectionParameter {
    pub fn new(
        name: impl Into<String>,
        human_name: impl Into<String>,
        help_text: impl Into<String>,
        default: DataPath,
    ) -> Self {
        Self {
            info: ParameterInfo::new(name, human_name, help_text),
            default,
        }
    }
}

impl_parameter!(DataPathSelectionParameter, Path, Data, |p| ArgValue::Path(p.default.clone()));

impl DataParameter for DataPathSelectionParameter {
    fn validate(&self, data: &DataStructure, value: &ArgValue) -> Result<(), FilterError> {
        existing(&self.info, data, expect_path(&self.info, value)).map(|_| ())
    }
}
