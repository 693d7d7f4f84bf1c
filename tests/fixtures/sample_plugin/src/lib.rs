//! Plugin library used by `tests/plugin_loading_integration.rs`.
//!
//! Exposes one filter that creates a group and reports which library ran it.

use filterpipe_rs::actions::DataAction;
use filterpipe_rs::filter::{
    CancelToken, ExecuteResult, MessageHandler, Outcome, PreflightResult, PreflightValue,
};
use filterpipe_rs::parameters::DataGroupCreationParameter;
use filterpipe_rs::pipeline::PipelineNode;
use filterpipe_rs::plugin::{Plugin, PluginError};
use filterpipe_rs::{Arguments, DataPath, DataStructure, Filter, OutputActions, Parameters};
use uuid::Uuid;

pub const PLUGIN_ID: Uuid = Uuid::from_u128(0x5a3e_0000_0000_4000_8000_0000_0000_0001);

#[derive(Debug, Clone, Copy, Default)]
pub struct StampGroupFilter;

impl StampGroupFilter {
    pub const UUID: Uuid = Uuid::from_u128(0x5a3e_0000_0000_4000_8000_0000_0000_0101);
    pub const GROUP_PATH: &'static str = "GroupPath";
}

impl Filter for StampGroupFilter {
    fn name(&self) -> &str {
        "StampGroup"
    }

    fn human_name(&self) -> &str {
        "Stamp Group"
    }

    fn uuid(&self) -> Uuid {
        Self::UUID
    }

    fn parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert(DataGroupCreationParameter::new(
            Self::GROUP_PATH,
            "Group",
            "Path of the group to create",
            DataPath::new(["Stamped"]),
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
        let actions: OutputActions = [DataAction::CreateGroup {
            path: args.value(Self::GROUP_PATH),
        }]
        .into_iter()
        .collect();
        PreflightResult::new(Outcome::ok(actions))
    }

    fn execute_impl(
        &self,
        data: &mut DataStructure,
        args: &Arguments,
        _node: Option<&PipelineNode>,
        messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> ExecuteResult {
        let path: DataPath = args.value(Self::GROUP_PATH);
        messages.info(format!("Stamped {}", path));
        ExecuteResult::ok()
            .with_value(PreflightValue::new("Stamped By", "sample-plugin"))
            .with_value(PreflightValue::new("Group Exists", data.contains(&path)))
    }
}

fn build() -> Result<Plugin, PluginError> {
    let builder = Plugin::builder(PLUGIN_ID, "SamplePlugin")
        .description("Loaded from a shared library in tests")
        .vendor("filterpipe")
        .register(|| Box::new(StampGroupFilter));
    #[cfg(feature = "duplicate-filter")]
    let builder = builder.register(|| Box::new(StampGroupFilter));
    builder.build()
}

filterpipe_rs::declare_plugin!(build);
