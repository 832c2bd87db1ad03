//! Shared test helper functions for constructing test fixtures.
//!
//! This module is compiled only in test builds. Integration tests under
//! `crates/pipedag-core/tests/` define their own local helpers because they
//! link against the non-test library build where this module is absent.

use crate::graph::{PipelineGraph, ingest};
use crate::newtypes::NodeId;
use crate::request::{EdgeEntry, NodeEntry};

/// Creates a text [`NodeId`].
pub fn nid(s: &str) -> NodeId {
    NodeId::from(s)
}

/// Creates declared node entries for the given text ids.
pub fn nodes(ids: &[&str]) -> Vec<NodeEntry> {
    ids.iter().map(|&id| NodeEntry::new(id)).collect()
}

/// Creates edge entries from `(source, target)` text pairs.
pub fn edges(pairs: &[(&str, &str)]) -> Vec<EdgeEntry> {
    pairs.iter().map(|&(s, t)| EdgeEntry::new(s, t)).collect()
}

/// Converts string slices to owned strings, for comparing witness output.
pub fn names(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|&s| s.to_owned()).collect()
}

/// Ingests a graph from text node ids and text edge pairs.
pub fn graph_of(node_ids: &[&str], pairs: &[(&str, &str)]) -> PipelineGraph {
    ingest(&nodes(node_ids), &edges(pairs))
}
