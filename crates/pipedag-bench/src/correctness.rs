//! Post-operation invariant checkers for correctness validation.

use std::collections::{HashMap, HashSet};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use pipedag_core::{NodeId, PipelineGraph, PipelineRequest, TopoSort, ValidationResult};

/// Verifies the counts in a [`ValidationResult`] against the request.
pub fn check_counts(request: &PipelineRequest, result: &ValidationResult) -> Result<(), String> {
    if result.edge_count != request.edges.len() {
        return Err(format!(
            "edge count mismatch: result={}, request={}",
            result.edge_count,
            request.edges.len()
        ));
    }
    let mut ids: HashSet<&NodeId> = request.nodes.iter().map(|n| &n.id).collect();
    for edge in &request.edges {
        ids.insert(&edge.source);
        ids.insert(&edge.target);
    }
    if result.node_count != ids.len() {
        return Err(format!(
            "node count mismatch: result={}, distinct ids={}",
            result.node_count,
            ids.len()
        ));
    }
    Ok(())
}

/// Verifies graph construction: every identifier in the request is indexed.
pub fn check_graph_invariants(
    request: &PipelineRequest,
    graph: &PipelineGraph,
) -> Result<(), String> {
    if graph.edge_count() != request.edges.len() {
        return Err(format!(
            "edge count mismatch: graph={}, request={}",
            graph.edge_count(),
            request.edges.len()
        ));
    }
    let declared = request.nodes.iter().map(|n| &n.id);
    let endpoints = request.edges.iter().flat_map(|e| [&e.source, &e.target]);
    for id in declared.chain(endpoints) {
        if graph.node_index(id).is_none() {
            return Err(format!("node {id} not found in graph index"));
        }
    }
    Ok(())
}

/// Verifies a witness cycle:
/// - non-empty and closed (first == last)
/// - each consecutive pair is an edge of the request
pub fn check_witness(request: &PipelineRequest, cycle: &[NodeId]) -> Result<(), String> {
    let (Some(first), Some(last)) = (cycle.first(), cycle.last()) else {
        return Err("witness is empty".to_owned());
    };
    if cycle.len() < 2 {
        return Err("witness has a single entry".to_owned());
    }
    if first != last {
        return Err(format!("witness is not closed: starts at {first}, ends at {last}"));
    }
    let present: HashSet<(&NodeId, &NodeId)> = request
        .edges
        .iter()
        .map(|e| (&e.source, &e.target))
        .collect();
    for pair in cycle.windows(2) {
        if !present.contains(&(&pair[0], &pair[1])) {
            return Err(format!("witness step {} -> {} is not an edge", pair[0], pair[1]));
        }
    }
    Ok(())
}

/// Verifies a topological sort:
/// - `order` and `blocked` partition the node set
/// - every edge between two ordered nodes points forward
/// - no edge leads from a blocked node to an ordered one
pub fn check_topological_order(graph: &PipelineGraph, topo: &TopoSort) -> Result<(), String> {
    let total = topo.order.len() + topo.blocked.len();
    if total != graph.node_count() {
        return Err(format!(
            "order covers {total} nodes, graph has {}",
            graph.node_count()
        ));
    }
    let position: HashMap<_, _> = topo
        .order
        .iter()
        .enumerate()
        .map(|(i, &idx)| (idx, i))
        .collect();
    if position.len() != topo.order.len() {
        return Err("order contains repeated nodes".to_owned());
    }
    let blocked: HashSet<_> = topo.blocked.iter().copied().collect();
    if blocked.len() != topo.blocked.len() || blocked.iter().any(|idx| position.contains_key(idx))
    {
        return Err("order and blocked overlap or repeat".to_owned());
    }
    for source in graph.node_indices() {
        for &target in graph.successors(source) {
            match (position.get(&source), position.get(&target)) {
                (Some(s), Some(t)) if s >= t => {
                    return Err(format!(
                        "edge {}->{} points backwards",
                        source.index(),
                        target.index()
                    ));
                }
                (None, Some(_)) => {
                    return Err(format!(
                        "blocked node {} feeds ordered node {}",
                        source.index(),
                        target.index()
                    ));
                }
                (Some(_) | None, Some(_) | None) => {}
            }
        }
    }
    Ok(())
}

/// Verifies the acyclicity verdict against petgraph's own cycle check.
pub fn check_against_petgraph(request: &PipelineRequest, is_dag: bool) -> Result<(), String> {
    let mut graph: DiGraph<(), ()> = DiGraph::new();
    let mut index = HashMap::new();
    for id in request
        .nodes
        .iter()
        .map(|n| &n.id)
        .chain(request.edges.iter().flat_map(|e| [&e.source, &e.target]))
    {
        index.entry(id).or_insert_with(|| graph.add_node(()));
    }
    for edge in &request.edges {
        if let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) {
            graph.add_edge(s, t, ());
        }
    }
    let expected = !is_cyclic_directed(&graph);
    if expected != is_dag {
        return Err(format!("is_dag={is_dag}, petgraph says {expected}"));
    }
    Ok(())
}
