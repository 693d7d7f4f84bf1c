//! One step of a pipeline: a filter plus its arguments.

use crate::filter::{Filter, FilterState};
use crate::parameters::Arguments;
use crate::pipeline::id::NodeId;
use crate::plugin::FilterHandle;
use serde_json::{json, Value as Json};
use tracing::trace;

pub struct PipelineNode {
    pub(crate) id: NodeId,
    /// Registry address the filter was created from, if any.
    pub(crate) handle: Option<FilterHandle>,
    pub(crate) filter: Box<dyn Filter>,
    pub(crate) arguments: Arguments,
    pub(crate) enabled: bool,
    pub(crate) state: FilterState,
}

impl PipelineNode {
    pub(crate) fn new(
        id: NodeId,
        handle: Option<FilterHandle>,
        filter: Box<dyn Filter>,
        arguments: Arguments,
    ) -> Self {
        Self {
            id,
            handle,
            filter,
            arguments,
            enabled: true,
            state: FilterState::Declared,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn handle(&self) -> Option<FilterHandle> {
        self.handle
    }

    pub fn filter(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut Arguments {
        &mut self.arguments
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Move to `next`. A new run may start from any state.
    pub(crate) fn transition(&mut self, next: FilterState) {
        let restart = next == FilterState::Preflighting;
        debug_assert!(
            restart || self.state.can_transition_to(next),
            "illegal transition {} -> {} for {}",
            self.state,
            next,
            self.id
        );
        trace!("{} '{}': {} -> {}", self.id, self.filter.name(), self.state, next);
        self.state = next;
    }

    /// Encoded form: filter identity, enabled flag and arguments.
    pub fn to_json(&self) -> Json {
        json!({
            "filter": self.filter.name(),
            "uuid": self.filter.uuid().to_string(),
            "handle": self.handle.map(|h| h.to_string()),
            "enabled": self.enabled,
            "args": self.filter.to_json(&self.arguments),
        })
    }
}

impl std::fmt::Debug for PipelineNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineNode")
            .field("id", &self.id)
            .field("filter", &self.filter.name())
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .finish()
    }
}
