#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod graph;
pub mod newtypes;
pub mod request;
pub mod summary;

#[cfg(test)]
mod test_helpers;

pub use graph::{Detection, NodeWeight, PipelineGraph, TopoSort, detect, ingest, topological_order};
pub use newtypes::NodeId;
pub use request::{EdgeEntry, ErrorKind, IngestError, NodeEntry, PipelineRequest, parse_request};
pub use summary::{Analysis, ValidationResult, analyze, summarize, validate, validate_json};

/// Returns the current version of the pipedag-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
