//! Pipeline-specific error types.

use crate::pipeline::id::NodeId;
use crate::plugin::FilterHandle;
use thiserror::Error;

/// Errors raised while assembling a pipeline. Failures of the filters
/// themselves are reported in a [`PipelineReport`](super::PipelineReport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Node {node} does not exist (pipeline has {len} nodes)")]
    NodeOutOfRange { node: NodeId, len: usize },

    #[error("No filter registered for {0}")]
    UnknownFilter(FilterHandle),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
