/// Graph ingestion: builds a `petgraph` directed multigraph from a request.
///
/// [`ingest`] runs two passes over the caller's lists:
/// 1. **Node pass** — inserts every declared node in order. A repeated
///    identifier collapses onto its first occurrence.
/// 2. **Edge pass** — for each edge in order, interns the source and then
///    the target (creating an *implicit* node for any endpoint that was never
///    declared), then inserts the edge. Parallel edges and self-loops are
///    kept as separate petgraph edges.
///
/// Nothing in either pass can fail: unknown endpoints, duplicates and
/// self-loops are all legitimate states of a pipeline that is still being
/// edited. Structural decode failures are reported earlier, by
/// [`crate::request`].
///
/// # Ordering
///
/// Node indices are assigned in first-observation order, and
/// [`PipelineGraph::successors`] yields targets in edge-input order. The
/// traversals in [`cycles`] depend on both for reproducible output.
pub mod cycles;

pub use cycles::{Detection, TopoSort, detect, topological_order};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::newtypes::NodeId;
use crate::request::{EdgeEntry, NodeEntry, PipelineRequest};

/// Weight stored on each petgraph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeWeight {
    /// Caller-supplied identifier.
    pub id: NodeId,
    /// `false` if the node was discovered only as an edge endpoint.
    pub declared: bool,
}

/// A directed multigraph over caller-defined node identifiers.
///
/// Owns its identifiers, so it is an immutable snapshot of the request it
/// was built from. Construct with [`ingest`] or
/// [`PipelineGraph::from_request`].
#[derive(Debug, Clone)]
pub struct PipelineGraph {
    graph: DiGraph<NodeWeight, ()>,
    id_to_index: HashMap<NodeId, NodeIndex>,
    /// Outgoing targets per node, in edge-input order.
    adjacency: Vec<Vec<NodeIndex>>,
    declared_count: usize,
}

impl PipelineGraph {
    /// Builds a graph from a decoded request.
    pub fn from_request(request: &PipelineRequest) -> Self {
        ingest(&request.nodes, &request.edges)
    }

    /// Returns the number of distinct nodes, declared and implicit.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges, parallel edges and self-loops included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the number of distinct identifiers in the declared node list.
    pub fn declared_node_count(&self) -> usize {
        self.declared_count
    }

    /// Returns the identifiers that appeared only as edge endpoints, in the
    /// order they were first seen.
    pub fn implicit_nodes(&self) -> Vec<&NodeId> {
        self.graph
            .node_weights()
            .filter(|w| !w.declared)
            .map(|w| &w.id)
            .collect()
    }

    /// Looks up the [`NodeIndex`] for an identifier.
    pub fn node_index(&self, id: &NodeId) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    /// Returns the identifier stored at `idx`, or `None` if out of range.
    pub fn node_id(&self, idx: NodeIndex) -> Option<&NodeId> {
        self.graph.node_weight(idx).map(|w| &w.id)
    }

    /// Returns all node indices in first-observation order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Returns the direct successors of `idx` in edge-input order.
    ///
    /// A target reached by `k` parallel edges appears `k` times.
    /// Empty for an index out of range.
    pub fn successors(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.adjacency
            .get(idx.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns a reference to the underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<NodeWeight, ()> {
        &self.graph
    }
}

/// Builds a [`PipelineGraph`] from declared nodes and edges.
///
/// Construction is O(N + E). See the module documentation for the two-pass
/// process and the ordering guarantees.
pub fn ingest(nodes: &[NodeEntry], edges: &[EdgeEntry]) -> PipelineGraph {
    let mut graph: DiGraph<NodeWeight, ()> = DiGraph::with_capacity(nodes.len(), edges.len());
    let mut id_to_index: HashMap<NodeId, NodeIndex> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        intern(&mut graph, &mut id_to_index, &node.id, true);
    }
    let declared_count = graph.node_count();

    let mut adjacency: Vec<Vec<NodeIndex>> = vec![Vec::new(); graph.node_count()];
    for edge in edges {
        let source = intern(&mut graph, &mut id_to_index, &edge.source, false);
        let target = intern(&mut graph, &mut id_to_index, &edge.target, false);
        graph.add_edge(source, target, ());
        adjacency.resize_with(graph.node_count(), Vec::new);
        adjacency[source.index()].push(target);
    }

    PipelineGraph {
        graph,
        id_to_index,
        adjacency,
        declared_count,
    }
}

/// Returns the index for `id`, inserting a node if it has not been seen.
fn intern(
    graph: &mut DiGraph<NodeWeight, ()>,
    id_to_index: &mut HashMap<NodeId, NodeIndex>,
    id: &NodeId,
    declared: bool,
) -> NodeIndex {
    if let Some(&idx) = id_to_index.get(id) {
        return idx;
    }
    let idx = graph.add_node(NodeWeight {
        id: id.clone(),
        declared,
    });
    id_to_index.insert(id.clone(), idx);
    idx
}
