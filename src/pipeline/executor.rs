//! Pipeline executor.
//!
//! Nodes run strictly in insertion order against one shared store. A failed
//! node halts the run unless `halt_on_error` is off; a cancelled node always
//! halts it.

use crate::actions::ActionMode;
use crate::data::DataStructure;
use crate::filter::{
    CancelToken, Filter, FilterError, FilterState, MessageHandler, PreflightValue, Warning,
};
use crate::parameters::Arguments;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::id::NodeId;
use crate::pipeline::node::PipelineNode;
use crate::plugin::{FilterHandle, FilterList};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value as Json};
use tracing::{debug, info, warn};

/// Outcome of one node in a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub node: NodeId,
    pub filter: String,
    pub state: FilterState,
    /// Disabled nodes are skipped and keep their previous state.
    pub skipped: bool,
    pub errors: Vec<FilterError>,
    pub warnings: Vec<Warning>,
    pub values: Vec<PreflightValue>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

impl NodeReport {
    fn skipped(node: &PipelineNode) -> Self {
        let now = Utc::now();
        Self {
            node: node.id,
            filter: node.filter.human_name().to_string(),
            state: node.state,
            skipped: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            values: Vec::new(),
            started: now,
            finished: now,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.errors.iter().any(FilterError::is_cancelled)
    }
}

/// Aggregated diagnostics of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub pipeline: String,
    /// Reports of the nodes that were reached, in order.
    pub nodes: Vec<NodeReport>,
    /// First node that failed.
    pub failed_node: Option<NodeId>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

impl PipelineReport {
    fn new(pipeline: &str) -> Self {
        let now = Utc::now();
        Self {
            pipeline: pipeline.to_string(),
            nodes: Vec::new(),
            failed_node: None,
            started: now,
            finished: now,
        }
    }

    /// True when no node failed.
    pub fn is_ok(&self) -> bool {
        self.failed_node.is_none()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeReport> {
        self.nodes.iter().find(|report| report.node == id)
    }

    pub fn errors(&self) -> impl Iterator<Item = &FilterError> {
        self.nodes.iter().flat_map(|report| report.errors.iter())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warning> {
        self.nodes.iter().flat_map(|report| report.warnings.iter())
    }

    /// Record `report`; returns true when the run must stop.
    fn record(&mut self, report: NodeReport, halt_on_error: bool) -> bool {
        let failed = !report.is_ok();
        let cancelled = report.is_cancelled();
        if failed && self.failed_node.is_none() {
            self.failed_node = Some(report.node);
        }
        self.nodes.push(report);
        failed && (halt_on_error || cancelled)
    }

    fn finish(mut self) -> Self {
        self.finished = Utc::now();
        self
    }
}

/// Ordered sequence of filter nodes.
pub struct Pipeline {
    name: String,
    nodes: Vec<PipelineNode>,
    halt_on_error: bool,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            halt_on_error: true,
        }
    }

    pub fn with_halt_on_error(mut self, halt_on_error: bool) -> Self {
        self.halt_on_error = halt_on_error;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn halt_on_error(&self) -> bool {
        self.halt_on_error
    }

    pub fn set_halt_on_error(&mut self, halt_on_error: bool) {
        self.halt_on_error = halt_on_error;
    }

    /// Append a filter instance.
    pub fn push_filter(&mut self, filter: Box<dyn Filter>, arguments: Arguments) -> NodeId {
        self.push(None, filter, arguments)
    }

    /// Append the filter registered under `handle`.
    pub fn push_handle(
        &mut self,
        filters: &FilterList,
        handle: FilterHandle,
        arguments: Arguments,
    ) -> PipelineResult<NodeId> {
        let filter = filters
            .create_filter(handle)
            .ok_or(PipelineError::UnknownFilter(handle))?;
        Ok(self.push(Some(handle), filter, arguments))
    }

    fn push(
        &mut self,
        handle: Option<FilterHandle>,
        filter: Box<dyn Filter>,
        arguments: Arguments,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        debug!("Pipeline '{}': adding {} '{}'", self.name, id, filter.name());
        self.nodes.push(PipelineNode::new(id, handle, filter, arguments));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&PipelineNode> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut PipelineNode> {
        self.nodes.get_mut(id.index())
    }

    pub fn nodes(&self) -> &[PipelineNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> PipelineResult<()> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(PipelineError::NodeOutOfRange { node: id, len })?;
        node.enabled = enabled;
        Ok(())
    }

    /// Preflight every enabled node. Each node sees the would-be result of
    /// the nodes before it; `data` itself is never modified.
    pub fn preflight(
        &mut self,
        data: &DataStructure,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> PipelineReport {
        info!("Preflighting pipeline '{}' ({} nodes)", self.name, self.nodes.len());
        let mut report = PipelineReport::new(&self.name);
        let mut preview = data.preview_copy();

        for node in &mut self.nodes {
            if !node.enabled {
                report.nodes.push(NodeReport::skipped(node));
                continue;
            }
            let started = Utc::now();
            node.transition(FilterState::Preflighting);
            let result = node
                .filter
                .preflight(&preview, &node.arguments, messages, cancel);

            let mut errors = result.errors().to_vec();
            if let Ok(actions) = &result.output_actions.result {
                if let Err(e) = actions.apply_all(&mut preview, ActionMode::Preview) {
                    errors.push(e);
                }
            }
            if cancel.is_cancelled() && errors.is_empty() {
                errors.push(FilterError::Cancelled);
            }
            let state = if errors.is_empty() {
                FilterState::PreflightSucceeded
            } else {
                FilterState::PreflightFailed
            };
            node.transition(state);

            let node_report = NodeReport {
                node: node.id,
                filter: node.filter.human_name().to_string(),
                state,
                skipped: false,
                errors,
                warnings: result.warnings().to_vec(),
                values: result.preflight_values,
                started,
                finished: Utc::now(),
            };
            if report.record(node_report, self.halt_on_error) {
                warn!("Pipeline '{}' preflight halted at {}", self.name, node.id);
                break;
            }
        }
        report.finish()
    }

    /// Execute every enabled node in order against `data`.
    pub fn execute(
        &mut self,
        data: &mut DataStructure,
        messages: &MessageHandler,
        cancel: &CancelToken,
    ) -> PipelineReport {
        info!("Executing pipeline '{}' ({} nodes)", self.name, self.nodes.len());
        let mut report = PipelineReport::new(&self.name);

        for index in 0..self.nodes.len() {
            if !self.nodes[index].enabled {
                debug!("Skipping disabled {}", self.nodes[index].id);
                report.nodes.push(NodeReport::skipped(&self.nodes[index]));
                continue;
            }
            let started = Utc::now();
            self.nodes[index].transition(FilterState::Preflighting);

            let node = &self.nodes[index];
            let result = node
                .filter
                .execute(data, &node.arguments, Some(node), messages, cancel);

            let node = &mut self.nodes[index];
            if result.state != FilterState::PreflightFailed {
                node.transition(FilterState::PreflightSucceeded);
                node.transition(FilterState::Executing);
            }
            node.transition(result.state);
            debug!("{} '{}' finished as {}", node.id, node.filter.name(), result.state);

            let node_report = NodeReport {
                node: node.id,
                filter: node.filter.human_name().to_string(),
                state: result.state,
                skipped: false,
                errors: result.errors().to_vec(),
                warnings: result.warnings().to_vec(),
                values: result.output_values,
                started,
                finished: Utc::now(),
            };
            if report.record(node_report, self.halt_on_error) {
                warn!("Pipeline '{}' halted at {}", self.name, node.id);
                break;
            }
        }

        let report = report.finish();
        info!(
            "Pipeline '{}' finished: {} node(s) run, {} error(s)",
            self.name,
            report.nodes.len(),
            report.errors().count()
        );
        report
    }

    /// Encoded pipeline: name and every node in order.
    pub fn to_json(&self) -> Json {
        json!({
            "name": self.name,
            "halt_on_error": self.halt_on_error,
            "nodes": self.nodes.iter().map(PipelineNode::to_json).collect::<Vec<_>>(),
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("nodes", &self.nodes)
            .field("halt_on_error", &self.halt_on_error)
            .finish()
    }
}
