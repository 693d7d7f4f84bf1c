//! The two-phase filter contract.
//!
//! A filter declares [`Parameters`], computes the structural changes it
//! intends to make during *preflight* (reading the store only), and runs its
//! algorithm during *execute*:
//!
//! ```text
//! execute:
//!   preflight (resolve + validate + preflight_impl + preview actions)
//!   -> cancel check
//!   -> commit regular actions
//!   -> cancel check
//!   -> execute_impl
//!   -> commit deferred actions
//!   -> structure validation
//! ```
//!
//! Nothing is rolled back when a later step fails: actions already committed
//! stay in the store.
//!
//! # Module Structure
//!
//! - [`result`] - Diagnostics, `Outcome`, preflight/execute results, `FilterState`
//! - [`message`] - `MessageHandler`
//! - [`cancel`] - `CancelToken`

pub mod cancel;
mod engine;
pub mod message;
pub mod result;

pub use cancel::CancelToken;
pub use message::{Message, MessageHandler, MessageKind};
pub use result::{
    codes, ExecuteResult, FilterError, FilterState, Outcome, PreflightResult, PreflightValue,
    Warning,
};

use crate::data::DataStructure;
use crate::parameters::{Arguments, Parameters};
use crate::pipeline::PipelineNode;
use serde_json::Value as Json;
use uuid::Uuid;

/// A composable data-transformation unit.
///
/// Implementors supply metadata, [`parameters`](Filter::parameters),
/// [`preflight_impl`](Filter::preflight_impl) and
/// [`execute_impl`](Filter::execute_impl). The provided
/// [`preflight`](Filter::preflight) and [`execute`](Filter::execute) drive
/// the full contract and should not be overridden.
pub trait Filter: Send + Sync {
    /// Stable machine name.
    fn name(&self) -> &str;

    fn human_name(&self) -> &str;

    fn uuid(&self) -> Uuid;

    fn default_tags(&self) -> Vec<String> {
        Vec::new()
    }

    fn parameters(&self) -> Parameters;

    fn clone_box(&self) -> Box<dyn Filter>;

    /// Compute the actions this filter would apply. `args` are resolved and
    /// validated; `data` must not be changed.
    fn preflight_impl(
        &self,
        data: &DataStructure,
        args: &Arguments,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> PreflightResult;

    /// Run the algorithm. Regular actions are already committed.
    fn execute_impl(
        &self,
        _data: &mut DataStructure,
        _args: &Arguments,
        _node: Option<&PipelineNode>,
        _messages: &MessageHandler,
        _cancel: &CancelToken,
    ) -> ExecuteResult {
        ExecuteResult::ok()
    }

    fn preflight(
        &self,
        data: &DataStructure,
        args: &Arguments,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> PreflightResult {
        engine::preflight(self, data, args, messages, cancel).0
    }

    fn execute(
        &self,
        data: &mut DataStructure,
        args: &Arguments,
        node: Option<&PipelineNode>,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> ExecuteResult {
        engine::execute(self, data, args, node, messages, cancel)
    }

    /// Encode `args` through this filter's parameters.
    fn to_json(&self, args: &Arguments) -> Json {
        self.parameters().to_json(args)
    }

    fn from_json(&self, json: &Json) -> Outcome<Arguments> {
        self.parameters().from_json(json)
    }
}

impl Clone for Box<dyn Filter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name())
            .field("uuid", &self.uuid())
            .finish()
    }
}
