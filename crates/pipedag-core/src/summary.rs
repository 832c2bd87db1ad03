/// Result assembly and the top-level validation entry points.
///
/// [`ValidationResult`] is the response contract consumed by the pipeline
/// editor. Its JSON field names (`num_nodes`, `num_edges`, `is_dag`) are
/// fixed by existing callers and must not change.
///
/// Control flow is always ingest → detect → summarize.
use serde::{Deserialize, Serialize};

use crate::graph::{Detection, PipelineGraph, detect};
use crate::newtypes::NodeId;
use crate::request::{EdgeEntry, IngestError, NodeEntry, PipelineRequest, parse_request};

/// Summary of one validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Distinct identifiers across declared nodes and edge endpoints.
    #[serde(rename = "num_nodes")]
    pub node_count: usize,
    /// Edge entries in the request, duplicates and self-loops included.
    #[serde(rename = "num_edges")]
    pub edge_count: usize,
    /// `true` iff the graph has no cycle.
    pub is_dag: bool,
}

/// A [`ValidationResult`] together with the details behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// The response contract.
    pub result: ValidationResult,
    /// Witness cycle (closed: first == last) when the graph is not a DAG.
    pub cycle: Option<Vec<NodeId>>,
    /// Identifiers that appeared only as edge endpoints, in first-seen order.
    pub implicit_nodes: Vec<NodeId>,
}

/// Packages graph counts and the detector's verdict.
pub fn summarize(graph: &PipelineGraph, detection: &Detection) -> ValidationResult {
    ValidationResult {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        is_dag: detection.is_dag,
    }
}

/// Validates declared nodes and edges.
///
/// ```
/// use pipedag_core::{EdgeEntry, NodeEntry, validate};
///
/// let result = validate(
///     &[NodeEntry::new("a"), NodeEntry::new("b")],
///     &[EdgeEntry::new("a", "b"), EdgeEntry::new("b", "a")],
/// );
/// assert_eq!(result.node_count, 2);
/// assert_eq!(result.edge_count, 2);
/// assert!(!result.is_dag);
/// ```
pub fn validate(nodes: &[NodeEntry], edges: &[EdgeEntry]) -> ValidationResult {
    let graph = crate::graph::ingest(nodes, edges);
    let detection = detect(&graph);
    summarize(&graph, &detection)
}

/// Parses a request document and validates it.
///
/// # Errors
///
/// Returns the [`IngestError`] from [`parse_request`] when the document is
/// not a well-formed request or contains a malformed edge.
pub fn validate_json(content: &str) -> Result<ValidationResult, IngestError> {
    let request = parse_request(content)?;
    Ok(validate(&request.nodes, &request.edges))
}

/// Validates a request and keeps the witness cycle and implicit nodes.
pub fn analyze(request: &PipelineRequest) -> Analysis {
    let graph = PipelineGraph::from_request(request);
    let detection = detect(&graph);
    Analysis {
        result: summarize(&graph, &detection),
        cycle: detection.witness_ids(&graph),
        implicit_nodes: graph.implicit_nodes().into_iter().cloned().collect(),
    }
}
