//! Test data builders and small filters for exercising the engine

use filterpipe_rs::actions::{DataAction, OutputActions};
use filterpipe_rs::data::{DataArray, Payload};
use filterpipe_rs::filter::{
    codes, CancelToken, ExecuteResult, FilterError, MessageHandler, Outcome, PreflightResult,
};
use filterpipe_rs::parameters::{
    ArraySelectionParameter, BoolParameter, IntegerParameter, StringParameter,
};
use filterpipe_rs::pipeline::PipelineNode;
use filterpipe_rs::{Arguments, DataPath, DataStructure, DataType, Filter, Parameters};
use uuid::Uuid;

/// Builder for populating a [`DataStructure`]
#[derive(Default)]
pub struct StoreBuilder {
    data: DataStructure,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, path: &str) -> Self {
        self.data
            .insert_at(&super::path(path), Payload::Group)
            .unwrap();
        self
    }

    pub fn matrix(mut self, path: &str, tuples: usize) -> Self {
        self.data
            .insert_at(
                &super::path(path),
                Payload::AttributeMatrix {
                    tuple_shape: vec![tuples],
                },
            )
            .unwrap();
        self
    }

    pub fn array(mut self, path: &str, data_type: DataType, tuples: usize, fill: &str) -> Self {
        let array = DataArray::filled(data_type, vec![tuples], vec![1], fill).unwrap();
        self.data
            .insert_at(&super::path(path), Payload::Array(array))
            .unwrap();
        self
    }

    pub fn build(self) -> DataStructure {
        self.data
    }
}

// ─── Test Filters ────────────────────────────────────────────────────────────

/// `UseMask` gates `MaskArrayPath`; does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskedFilter;

impl MaskedFilter {
    pub const UUID: Uuid = Uuid::from_u128(0x7e57_0000_0000_4000_8000_0000_0000_0001);
    pub const USE_MASK: &'static str = "UseMask";
    pub const MASK_ARRAY_PATH: &'static str = "MaskArrayPath";
}

impl Filter for MaskedFilter {
    fn name(&self) -> &str {
        "Masked"
    }

    fn human_name(&self) -> &str {
        "Masked Test Filter"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert_linkable(BoolParameter::new(Self::USE_MASK, "Use Mask", "", false));
        params.insert(
            ArraySelectionParameter::new(
                Self::MASK_ARRAY_PATH,
                "Mask",
                "",
                DataPath::root(),
            )
            .with_types([DataType::Boolean]),
        );
        params.link_parameters(Self::USE_MASK, Self::MASK_ARRAY_PATH, true);
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        _args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        PreflightResult::new(Outcome::ok(OutputActions::new()))
    }
}

/// Creates `Scratch` as a regular action and renames it to `Final` as a
/// deferred one. The body records that `Scratch` existed when it ran.
#[derive(Debug, Clone, Copy, Default)]
pub struct StagedRenameFilter;

impl StagedRenameFilter {
    pub const UUID: Uuid = Uuid::from_u128(0x7e57_0000_0000_4000_8000_0000_0000_0002);
    pub const LABEL: &'static str = "Label";
}

impl Filter for StagedRenameFilter {
    fn name(&self) -> &str {
        "StagedRename"
    }

    fn human_name(&self) -> &str {
        "Staged Rename"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(StringParameter::new(Self::LABEL, "Label", "", "unused"));
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        _args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        let mut actions = OutputActions::new();
        actions.push(DataAction::CreateGroup {
            path: DataPath::new(["Scratch"]),
        });
        actions.push_deferred(DataAction::Rename {
            path: DataPath::new(["Scratch"]),
            new_name: "Final".to_string(),
        });
        PreflightResult::new(Outcome::ok(actions))
    }

    fn execute_impl(
        &self,
        data: &mut DataStructure,
        _args: &Arguments,
        _node: Option<&PipelineNode>,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> ExecuteResult {
        let seen = data.contains(&DataPath::new(["Scratch"]));
        ExecuteResult::ok().with_value(filterpipe_rs::filter::PreflightValue::new(
            "Scratch Visible",
            seen,
        ))
    }
}

/// Creates `Marker` and then cancels its own token during preflight, as a
/// caller on another thread would.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfCancellingFilter;

impl SelfCancellingFilter {
    pub const UUID: Uuid = Uuid::from_u128(0x7e57_0000_0000_4000_8000_0000_0000_0003);
}

impl Filter for SelfCancellingFilter {
    fn name(&self) -> &str {
        "SelfCancelling"
    }

    fn human_name(&self) -> &str {
        "Self Cancelling"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn parameters(&self) -> Parameters {
        Parameters::new()
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        _args: &Arguments,
        _messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> PreflightResult {
        cancel.cancel();
        let mut actions = OutputActions::new();
        actions.push(DataAction::CreateGroup {
            path: DataPath::new(["Marker"]),
        });
        PreflightResult::new(Outcome::ok(actions))
    }
}

/// Passes preflight and fails execute when `Fail` is true.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlakyFilter;

impl FlakyFilter {
    pub const UUID: Uuid = Uuid::from_u128(0x7e57_0000_0000_4000_8000_0000_0000_0004);
    pub const FAIL: &'static str = "Fail";
    pub const ATTEMPTS: &'static str = "Attempts";
}

impl Filter for FlakyFilter {
    fn name(&self) -> &str {
        "Flaky"
    }

    fn human_name(&self) -> &str {
        "Flaky"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(BoolParameter::new(Self::FAIL, "Fail", "", false));
        params.insert(
            IntegerParameter::new(Self::ATTEMPTS, "Attempts", "", 1).with_range(1, 10),
        );
        params
    }

    fn clone_box(&self) -> Box<dyn Filter> {
        Box::new(*self)
    }

    fn preflight_impl(
        &self,
        _data: &DataStructure,
        _args: &Arguments,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> PreflightResult {
        PreflightResult::new(Outcome::ok(OutputActions::new()))
    }

    fn execute_impl(
        &self,
        _data: &mut DataStructure,
        args: &Arguments,
        _node: Option<&PipelineNode>,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> ExecuteResult {
        if args.value(Self::FAIL) {
            return ExecuteResult::from(Outcome::<()>::error(FilterError::execution(
                codes::EXECUTION_FAILED,
                "Asked to fail",
            )));
        }
        ExecuteResult::ok()
    }
}
