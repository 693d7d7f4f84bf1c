//! Ordered filter pipelines.
//!
//! A [`Pipeline`] holds `(filter, arguments)` nodes and runs them one after
//! another against a shared [`DataStructure`](crate::data::DataStructure),
//! so later nodes observe the objects committed by earlier ones.
//!
//! ```text
//! [CreateDataGroup] ──► [CreateDataArray] ──► [FillArray] ──► ...
//! ```
//!
//! # Module Structure
//!
//! - [`executor`] - `Pipeline` and its reports
//! - [`node`] - `PipelineNode`
//! - [`id`] - `NodeId`
//! - [`error`] - `PipelineError`

pub mod error;
pub mod executor;
pub mod id;
pub mod node;

pub use error::{PipelineError, PipelineResult};
pub use executor::{NodeReport, Pipeline, PipelineReport};
pub use id::NodeId;
pub use node::PipelineNode;
