//! FillArray: set every tuple of an array to one value, optionally masked.

use crate::actions::OutputActions;
use crate::data::{DataArray, DataPath, DataStructure};
use crate::filter::{
    codes, CancelToken, ExecuteResult, Filter, FilterError, MessageHandler, Outcome,
    PreflightResult, PreflightValue,
};
use crate::parameters::{
    Arguments, ArraySelectionParameter, BoolParameter, Parameters, StringParameter,
};
use crate::pipeline::PipelineNode;
use crate::types::DataType;
use tracing::debug;
use uuid::Uuid;

/// Tuples written between two cancellation checks.
const CHUNK_TUPLES: usize = 4096;

#[derive(Debug, Clone, Copy, Default)]
pub struct FillArrayFilter;

impl FillArrayFilter {
    pub const UUID: Uuid = Uuid::from_u128(0xe7d2_f9ba_7f3c_4f0a_a84d_2b5c_9f3e_1a09);
    pub const ARRAY_PATH: &'static str = "ArrayPath";
    pub const VALUE: &'static str = "Value";
    pub const USE_MASK: &'static str = "UseMask";
    pub const MASK_ARRAY_PATH: &'static str = "MaskArrayPath";
}

fn failed(message: String) -> ExecuteResult {
    ExecuteResult::from(Outcome::<()>::error(FilterError::execution(
        codes::EXECUTION_FAILED,
        message,
    )))
}

fn mask_values(array: &DataArray) -> Option<Vec<bool>> {
    match array.data_type() {
        DataType::Boolean => array.as_slice::<bool>().map(<[bool]>::to_vec),
        DataType::UInt8 => array
            .as_slice::<u8>()
            .map(|values| values.iter().map(|&v| v != 0).collect()),
        _ => None,
    }
}

impl Filter for FillArrayFilter {
    fn name(&self) -> &str {
        "FillArray"
    }

    fn human_name(&self) -> &str {
        "Fill Array"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn default_tags(&self) -> Vec<String> {
        vec!["Core".into(), "Processing".into(), "Mask".into()]
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(ArraySelectionParameter::new(
            Self::ARRAY_PATH,
            "Array to Fill",
            "",
            DataPath::root(),
        ));
        params.insert(
            StringParameter::new(
                Self::VALUE,
                "Fill Value",
                "Written to every component of each selected tuple",
                "0",
            )
            .non_empty(),
        );
        params.insert_linkable(BoolParameter::new(
            Self::USE_MASK,
            "Use Mask",
            "Only fill tuples whose mask value is true",
            false,
        ));
        params.insert(
            ArraySelectionParameter::new(
                Self::MASK_ARRAY_PATH,
                "Mask Array",
                "Boolean or uint8 array with the same tuple count",
                DataPath::root(),
            )
            .with_types([DataType::Boolean, DataType::UInt8])
            .with_component_shapes(vec![vec![1]]),
        );
        params.link_parameters(Self::USE_MASK, Self::MASK_ARRAY_PATH, true);
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
        let path: DataPath = args.value(Self::ARRAY_PATH);
        let value: String = args.value(Self::VALUE);
        let Some(array) = data.array(&path) else {
            return PreflightResult::new(Outcome::error(FilterError::validation(
                codes::WRONG_OBJECT_KIND,
                format!("'{}' is not a data array", path),
            )));
        };
        if let Err(message) = array.data_type().check_value(&value) {
            return PreflightResult::new(Outcome::error(FilterError::validation(
                codes::INVALID_VALUE,
                message,
            )));
        }

        if args.value(Self::USE_MASK) {
            let mask_path: DataPath = args.value(Self::MASK_ARRAY_PATH);
            if let Some(mask) = data.array(&mask_path) {
                if mask.tuple_count() != array.tuple_count() {
                    return PreflightResult::new(Outcome::error(FilterError::validation(
                        codes::TUPLE_COUNT_MISMATCH,
                        format!(
                            "Mask '{}' has {} tuples but '{}' has {}",
                            mask_path,
                            mask.tuple_count(),
                            path,
                            array.tuple_count()
                        ),
                    )));
                }
            }
        }

        PreflightResult::new(Outcome::ok(OutputActions::new()))
            .with_value(PreflightValue::new("Tuples", array.tuple_count()))
    }

    fn execute_impl(
        &self,
        data: &mut DataStructure,
        args: &Arguments,
        _node: Option<&PipelineNode>,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> ExecuteResult {
        let path: DataPath = args.value(Self::ARRAY_PATH);
        let value: String = args.value(Self::VALUE);

        let mask = if args.value(Self::USE_MASK) {
            let mask_path: DataPath = args.value(Self::MASK_ARRAY_PATH);
            match data.array(&mask_path).and_then(mask_values) {
                Some(mask) => Some(mask),
                None => return failed(format!("Mask '{}' has no readable values", mask_path)),
            }
        } else {
            None
        };

        let Some(array) = data.array_mut(&path) else {
            return failed(format!("Array '{}' disappeared before execute", path));
        };

        let total = array.tuple_count();
        let mut filled = 0;
        let mut start = 0;
        while start < total {
            if cancel.is_cancelled() {
                debug!("FillArray cancelled after {} of {} tuples", start, total);
                return ExecuteResult::from(Outcome::<()>::cancelled());
            }
            let end = (start + CHUNK_TUPLES).min(total);
            match array.fill_tuples(start..end, &value, mask.as_deref()) {
                Ok(count) => filled += count,
                Err(message) => return failed(message),
            }
            start = end;
            messages.progress(
                (end as u128 * 100 / total as u128) as u8,
                format!("Filled {} of {} tuples", end, total),
            );
        }

        ExecuteResult::ok().with_value(PreflightValue::new("Filled Tuples", filled))
    }
}
