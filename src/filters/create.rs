//! Creation filters.

use super::{rejected, single_action, to_shape};
use crate::actions::{DataAction, OutputActions};
use crate::data::{
    byte_count, element_count, shape_product, DataPath, DataStructure, GeometrySpec, Payload,
};
use crate::filter::{
    codes, CancelToken, Filter, FilterError, MessageHandler, Outcome, PreflightResult,
    PreflightValue, Warning,
};
use crate::parameters::{
    ArrayCreationParameter, Arguments, DataGroupCreationParameter, FloatVectorParameter,
    IntVectorParameter, NumericTypeParameter, Parameters, StringParameter,
};
use crate::types::DataType;
use uuid::Uuid;

// ─── CreateDataGroup ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDataGroupFilter;

impl CreateDataGroupFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a01);
    pub const DATA_OBJECT_PATH: &'static str = "DataObjectPath";
}

impl Filter for CreateDataGroupFilter {
    fn name(&self) -> &str {
        "CreateDataGroup"
    }

    fn human_name(&self) -> &str {
        "Create Data Group"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Generation".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataGroupCreationParameter::new(
            Self::DATA_OBJECT_PATH,
            "Data Group",
            "Path of the group to create",
            DataPath::new(["DataGroup"]),
        ));
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        single_action(DataAction::CreateGroup {
            path: args.value(Self::DATA_OBJECT_PATH),
        })
    }
}

// ─── CreateAttributeMatrix ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateAttributeMatrixFilter;

impl CreateAttributeMatrixFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a02);
    pub const DATA_OBJECT_PATH: &'static str = "DataObjectPath";
    pub const TUPLE_DIMENSIONS: &'static str = "TupleDimensions";
}

impl Filter for CreateAttributeMatrixFilter {
    fn name(&self) -> &str {
        "CreateAttributeMatrix"
    }

    fn human_name(&self) -> &str {
        "Create Attribute Matrix"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Generation".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataGroupCreationParameter::new(
            Self::DATA_OBJECT_PATH,
            "Attribute Matrix",
            "Path of the attribute matrix to create",
            DataPath::new(["AttributeMatrix"]),
        ));
        params.insert(
            IntVectorParameter::variable(
                Self::TUPLE_DIMENSIONS,
                "Tuple Dimensions",
                "Tuple shape every child array must match, slowest axis first",
                vec![1],
            )
            .with_min(1),
        );
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        let tuple_shape = to_shape(&args.value::<Vec<i64>>(Self::TUPLE_DIMENSIONS));
        let Some(tuples) = shape_product(&tuple_shape) else {
            return rejected(FilterError::validation(
                codes::INVALID_VALUE,
                format!("Tuple dimensions {:?} overflow the tuple count", tuple_shape),
            ));
        };
        single_action(DataAction::CreateAttributeMatrix {
            path: args.value(Self::DATA_OBJECT_PATH),
            tuple_shape,
        })
        .with_value(PreflightValue::new("Tuple Count", tuples))
    }
}

// ─── CreateDataArray ─────────────────────────────────────────────────────────

/// Create a numeric array filled with one value. Inside an attribute matrix
/// the matrix's tuple shape is used and `TupleDimensions` is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDataArrayFilter;

impl CreateDataArrayFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a03);
    pub const NUMERIC_TYPE: &'static str = "NumericType";
    pub const COMPONENT_DIMENSIONS: &'static str = "ComponentDimensions";
    pub const TUPLE_DIMENSIONS: &'static str = "TupleDimensions";
    pub const INITIALIZATION_VALUE: &'static str = "InitializationValue";
    pub const OUTPUT_ARRAY_PATH: &'static str = "OutputArrayPath";
}

impl Filter for CreateDataArrayFilter {
    fn name(&self) -> &str {
        "CreateDataArray"
    }

    fn human_name(&self) -> &str {
        "Create Data Array"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Generation".into(), "Array".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(NumericTypeParameter::new(
            Self::NUMERIC_TYPE,
            "Numeric Type",
            "Element type of the new array",
            DataType::Float32,
        ));
        params.insert(
            IntVectorParameter::variable(
                Self::COMPONENT_DIMENSIONS,
                "Component Dimensions",
                "Component shape of each tuple",
                vec![1],
            )
            .with_min(1),
        );
        params.insert(
            IntVectorParameter::variable(
                Self::TUPLE_DIMENSIONS,
                "Tuple Dimensions",
                "Tuple shape, ignored inside an attribute matrix",
                vec![1],
            )
            .with_min(1),
        );
        params.insert(
            StringParameter::new(
                Self::INITIALIZATION_VALUE,
                "Initialization Value",
                "Value every element starts with",
                "0",
            )
            .non_empty(),
        );
        params.insert(ArrayCreationParameter::new(
            Self::OUTPUT_ARRAY_PATH,
            "Created Array",
            "Path of the new array",
            DataPath::new(["Data"]),
        ));
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        let data_type: DataType = args.value(Self::NUMERIC_TYPE);
        let fill_value: String = args.value(Self::INITIALIZATION_VALUE);
        let path: DataPath = args.value(Self::OUTPUT_ARRAY_PATH);

        if let Err(message) = data_type.check_value(&fill_value) {
            return rejected(FilterError::validation(codes::INVALID_VALUE, message));
        }

        let parent_shape = path
            .parent()
            .and_then(|parent| data.object(&parent))
            .and_then(|object| match object.payload() {
                Payload::AttributeMatrix { tuple_shape } => Some(tuple_shape.clone()),
                _ => None,
            });
        let requested = to_shape(&args.value::<Vec<i64>>(Self::TUPLE_DIMENSIONS));
        let ignored = parent_shape
            .as_ref()
            .filter(|shape| **shape != requested)
            .map(|shape| {
                Warning::new(
                    codes::ARGUMENT_IGNORED,
                    format!(
                        "{} {:?} ignored, the parent attribute matrix has tuple shape {:?}",
                        Self::TUPLE_DIMENSIONS,
                        requested,
                        shape
                    ),
                )
            });
        let tuple_shape = parent_shape.unwrap_or(requested);
        let component_shape = to_shape(&args.value::<Vec<i64>>(Self::COMPONENT_DIMENSIONS));
        let sizes = element_count(&tuple_shape, &component_shape)
            .and_then(|elements| byte_count(data_type, elements).map(|bytes| (elements, bytes)));
        let (elements, bytes) = match sizes {
            Ok(sizes) => sizes,
            Err(message) => {
                return rejected(FilterError::validation(codes::INVALID_VALUE, message))
            }
        };

        let mut actions: OutputActions = [DataAction::CreateArray {
            path,
            data_type,
            tuple_shape,
            component_shape,
            fill_value,
        }]
        .into_iter()
        .collect();
        actions.warnings.extend(ignored);
        PreflightResult::new(Outcome::ok(actions))
            .with_value(PreflightValue::new("Total Elements", elements))
        .with_value(PreflightValue::new("Size (bytes)", bytes))
    }
}

// ─── CreateImageGeometry ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateImageGeometryFilter;

impl CreateImageGeometryFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a04);
    pub const GEOMETRY_PATH: &'static str = "GeometryPath";
    pub const DIMENSIONS: &'static str = "Dimensions";
    pub const ORIGIN: &'static str = "Origin";
    pub const SPACING: &'static str = "Spacing";
    pub const CELL_DATA_NAME: &'static str = "CellDataName";
}

impl Filter for CreateImageGeometryFilter {
    fn name(&self) -> &str {
        "CreateImageGeometry"
    }

    fn human_name(&self) -> &str {
        "Create Image Geometry"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Generation".into(), "Geometry".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataGroupCreationParameter::new(
            Self::GEOMETRY_PATH,
            "Image Geometry",
            "Path of the new geometry",
            DataPath::new(["Image Geometry"]),
        ));
        params.insert(
            IntVectorParameter::new(
                Self::DIMENSIONS,
                "Dimensions",
                "Cell counts along X, Y and Z",
                vec![1, 1, 1],
                ["X", "Y", "Z"],
            )
            .with_min(1),
        );
        params.insert(FloatVectorParameter::new(
            Self::ORIGIN,
            "Origin",
            "Position of the first cell corner",
            vec![0.0, 0.0, 0.0],
            ["X", "Y", "Z"],
        ));
        params.insert(FloatVectorParameter::new(
            Self::SPACING,
            "Spacing",
            "Cell size along each axis",
            vec![1.0, 1.0, 1.0],
            ["X", "Y", "Z"],
        ));
        params.insert(
            StringParameter::new(
                Self::CELL_DATA_NAME,
                "Cell Data Name",
                "Name of the cell attribute matrix",
                "Cell Data",
            )
            .non_empty(),
        );
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        let dims = to_shape(&args.value::<Vec<i64>>(Self::DIMENSIONS));
        let origin = args.value::<Vec<f64>>(Self::ORIGIN);
        let spacing = args.value::<Vec<f64>>(Self::SPACING);
        let spec = GeometrySpec::Image {
            dimensions: [dims[0], dims[1], dims[2]],
            origin: [origin[0] as f32, origin[1] as f32, origin[2] as f32],
            spacing: [spacing[0] as f32, spacing[1] as f32, spacing[2] as f32],
            cell_data_name: args.value(Self::CELL_DATA_NAME),
        };
        if let Err(message) = spec.check() {
            return rejected(FilterError::validation(codes::INVALID_VALUE, message));
        }

        single_action(DataAction::CreateGeometry {
            path: args.value(Self::GEOMETRY_PATH),
            spec,
        })
        .with_value(PreflightValue::new(
            "Cell Count",
            shape_product(&dims).unwrap_or_default(),
        ))
    }
}
