/// Cycle detection and topological ordering over a [`PipelineGraph`].
///
/// Two algorithms are provided:
///
/// - [`detect`] — iterative depth-first search with three-coloring. Every
///   node starts WHITE, turns GRAY when pushed onto the DFS stack and BLACK
///   once all of its successors are explored. An edge into a GRAY node is a
///   back-edge and proves a cycle; the stack segment from that node to the
///   top is returned as the witness. Roots are tried in node insertion order
///   so disconnected components are all covered.
/// - [`topological_order`] — Kahn's algorithm. Repeatedly removes
///   zero-in-degree nodes; whatever cannot be removed sits on a cycle or
///   downstream of one.
///
/// Both run in O(V + E) time with O(V) auxiliary state, use an explicit
/// stack or queue instead of recursion, and visit nodes and successors in
/// first-observation order, so their output is reproducible for a fixed
/// input.
use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::graph::PipelineGraph;
use crate::newtypes::NodeId;

// ---------------------------------------------------------------------------
// Three-color DFS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    /// On the DFS stack at the given depth.
    Gray(usize),
    Black,
}

/// Outcome of [`detect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// `true` iff the graph contains no cycle.
    pub is_dag: bool,
    /// The first cycle found, closed so that the first and last entries are
    /// the same node. `None` when `is_dag` is `true`.
    pub cycle: Option<Vec<NodeIndex>>,
}

impl Detection {
    /// Resolves the witness cycle to caller identifiers.
    pub fn witness_ids(&self, graph: &PipelineGraph) -> Option<Vec<NodeId>> {
        self.cycle.as_ref().map(|cycle| {
            cycle
                .iter()
                .filter_map(|&idx| graph.node_id(idx).cloned())
                .collect()
        })
    }
}

/// Decides whether `graph` is acyclic.
///
/// Stops at the first back-edge. A self-loop on `a` is reported as the
/// witness `[a, a]`; a cycle `a -> b -> c -> a` entered at `a` as
/// `[a, b, c, a]`.
pub fn detect(graph: &PipelineGraph) -> Detection {
    let mut color = vec![Color::White; graph.node_count()];

    // Stack entry: (node, position of the next successor to try).
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for root in graph.node_indices() {
        if color[root.index()] != Color::White {
            continue;
        }

        color[root.index()] = Color::Gray(0);
        stack.push((root, 0));

        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let Some(&child) = graph.successors(node).get(*next) else {
                color[node.index()] = Color::Black;
                stack.pop();
                continue;
            };
            *next += 1;

            match color[child.index()] {
                Color::White => {
                    color[child.index()] = Color::Gray(stack.len());
                    stack.push((child, 0));
                }
                Color::Gray(depth) => {
                    let mut cycle: Vec<NodeIndex> =
                        stack[depth..].iter().map(|&(n, _)| n).collect();
                    cycle.push(child);
                    return Detection {
                        is_dag: false,
                        cycle: Some(cycle),
                    };
                }
                Color::Black => {}
            }
        }
    }

    Detection {
        is_dag: true,
        cycle: None,
    }
}

// ---------------------------------------------------------------------------
// Kahn's algorithm
// ---------------------------------------------------------------------------

/// Outcome of [`topological_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoSort {
    /// Nodes in a valid topological order (every edge points forward).
    pub order: Vec<NodeIndex>,
    /// Nodes that could not be ordered, in insertion order.
    pub blocked: Vec<NodeIndex>,
}

impl TopoSort {
    /// Returns `true` if every node was ordered, i.e. the graph is a DAG.
    pub fn is_complete(&self) -> bool {
        self.blocked.is_empty()
    }
}

/// Computes a topological order of `graph` with Kahn's algorithm.
///
/// The queue is seeded with zero-in-degree nodes in insertion order and is
/// first-in first-out; successors are released in edge order. When the
/// graph has a cycle the returned order covers only the nodes upstream of
/// every cycle and [`TopoSort::blocked`] holds the rest.
pub fn topological_order(graph: &PipelineGraph) -> TopoSort {
    let g = graph.graph();

    let mut in_degree = vec![0usize; graph.node_count()];
    for edge in g.edge_references() {
        in_degree[edge.target().index()] += 1;
    }

    let mut queue: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();
    let mut order: Vec<NodeIndex> = Vec::with_capacity(graph.node_count());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &succ in graph.successors(node) {
            let deg = &mut in_degree[succ.index()];
            *deg = deg.saturating_sub(1);
            if *deg == 0 {
                queue.push_back(succ);
            }
        }
    }

    let blocked = graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] > 0)
        .collect();

    TopoSort { order, blocked }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::collections::HashMap;

    use super::*;
    use crate::graph::ingest;
    use crate::test_helpers::{edges, graph_of, names, nodes};

    fn witness(g: &PipelineGraph) -> Option<Vec<String>> {
        detect(g)
            .witness_ids(g)
            .map(|c| c.iter().map(ToString::to_string).collect())
    }

    fn order_names(g: &PipelineGraph, order: &[NodeIndex]) -> Vec<String> {
        order
            .iter()
            .map(|&i| g.node_id(i).expect("valid index").to_string())
            .collect()
    }

    // -----------------------------------------------------------------------
    // detect: acyclic inputs
    // -----------------------------------------------------------------------

    #[test]
    fn empty_graph_is_dag() {
        let d = detect(&ingest(&[], &[]));
        assert!(d.is_dag);
        assert!(d.cycle.is_none());
    }

    #[test]
    fn nodes_without_edges_are_dag() {
        let d = detect(&ingest(&nodes(&["a", "b", "c"]), &[]));
        assert!(d.is_dag);
    }

    #[test]
    fn chain_is_dag() {
        let g = graph_of(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "d")]);
        assert!(detect(&g).is_dag);
    }

    /// Diamond: two paths reach `d`, which is BLACK by the second visit.
    #[test]
    fn diamond_is_dag() {
        let g = graph_of(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert!(detect(&g).is_dag);
    }

    #[test]
    fn parallel_edges_do_not_form_cycle() {
        let g = graph_of(&["a", "b"], &[("a", "b"), ("a", "b"), ("a", "b")]);
        assert!(detect(&g).is_dag);
    }

    /// A cross edge into an already finished component is not a back-edge.
    #[test]
    fn cross_edge_into_finished_component_is_dag() {
        let g = graph_of(&["x", "y", "a"], &[("x", "y"), ("a", "x")]);
        assert!(detect(&g).is_dag);
    }

    // -----------------------------------------------------------------------
    // detect: cyclic inputs and witnesses
    // -----------------------------------------------------------------------

    #[test]
    fn self_loop_witness() {
        let g = graph_of(&["a"], &[("a", "a")]);
        let d = detect(&g);
        assert!(!d.is_dag);
        assert_eq!(witness(&g), Some(names(&["a", "a"])));
    }

    #[test]
    fn two_node_cycle_witness() {
        let g = graph_of(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert_eq!(witness(&g), Some(names(&["a", "b", "a"])));
    }

    /// The witness omits the acyclic prefix leading into the cycle.
    #[test]
    fn cycle_not_involving_all_nodes() {
        let g = graph_of(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")],
        );
        let d = detect(&g);
        assert!(!d.is_dag);
        assert_eq!(witness(&g), Some(names(&["b", "c", "d", "b"])));
    }

    /// Cycles in a component reached only from a later root are found.
    #[test]
    fn cycle_in_second_component() {
        let g = graph_of(&["a", "b", "x", "y"], &[("a", "b"), ("x", "y"), ("y", "x")]);
        assert_eq!(witness(&g), Some(names(&["x", "y", "x"])));
    }

    /// Successor order decides which of two cycles is reported.
    #[test]
    fn witness_follows_edge_order() {
        let first = graph_of(
            &["r", "p", "q"],
            &[("r", "p"), ("r", "q"), ("p", "r"), ("q", "r")],
        );
        assert_eq!(witness(&first), Some(names(&["r", "p", "r"])));

        let swapped = graph_of(
            &["r", "p", "q"],
            &[("r", "q"), ("r", "p"), ("p", "r"), ("q", "r")],
        );
        assert_eq!(witness(&swapped), Some(names(&["r", "q", "r"])));
    }

    #[test]
    fn witness_is_deterministic_across_runs() {
        let g = graph_of(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d"), ("d", "e"), ("e", "c")],
        );
        let first = witness(&g);
        for _ in 0..10 {
            assert_eq!(witness(&g), first);
        }
    }

    /// Every consecutive pair in the witness is joined by a real edge.
    #[test]
    fn witness_edges_exist() {
        let g = graph_of(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")],
        );
        let cycle = detect(&g).cycle.expect("cyclic");
        assert_eq!(cycle.first(), cycle.last());
        for pair in cycle.windows(2) {
            assert!(
                g.graph().find_edge(pair[0], pair[1]).is_some(),
                "missing edge {pair:?}"
            );
        }
    }

    /// Deep chains do not grow the call stack.
    #[test]
    fn long_chain_does_not_overflow() {
        let n = 200_000;
        let names: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let edge_list: Vec<_> = names
            .windows(2)
            .map(|w| crate::request::EdgeEntry::new(w[0].as_str(), w[1].as_str()))
            .collect();
        let g = ingest(&[], &edge_list);
        assert!(detect(&g).is_dag);
        assert!(topological_order(&g).is_complete());
    }

    /// Parallel edges along a long chain leave the stack at one frame per
    /// node on the active path.
    #[test]
    fn long_chain_with_parallel_edges() {
        use crate::request::EdgeEntry;

        let n = 20_000;
        let names: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        let mut edge_list = Vec::with_capacity(n * 50);
        for w in names.windows(2) {
            for _ in 0..50 {
                edge_list.push(EdgeEntry::new(w[0].as_str(), w[1].as_str()));
            }
        }
        let g = ingest(&[], &edge_list);
        assert_eq!(g.edge_count(), (n - 1) * 50);
        assert!(detect(&g).is_dag);

        let last = names[n - 1].as_str();
        edge_list.push(EdgeEntry::new(last, "n0"));
        let g = ingest(&[], &edge_list);
        let d = detect(&g);
        assert!(!d.is_dag);
        assert_eq!(d.cycle.map(|c| c.len()), Some(n + 1));
    }

    // -----------------------------------------------------------------------
    // topological_order
    // -----------------------------------------------------------------------

    #[test]
    fn kahn_orders_chain() {
        let g = graph_of(&["c", "b", "a"], &[("a", "b"), ("b", "c")]);
        let topo = topological_order(&g);
        assert!(topo.is_complete());
        assert_eq!(order_names(&g, &topo.order), vec!["a", "b", "c"]);
    }

    #[test]
    fn kahn_is_fifo_over_insertion_order() {
        let g = graph_of(
            &["a", "b", "c", "d"],
            &[("a", "c"), ("b", "c"), ("c", "d")],
        );
        let topo = topological_order(&g);
        assert_eq!(order_names(&g, &topo.order), vec!["a", "b", "c", "d"]);
    }

    /// Every edge points forward in the produced order.
    #[test]
    fn kahn_order_respects_edges() {
        let g = graph_of(
            &["a", "b", "c", "d", "e"],
            &[("d", "a"), ("a", "b"), ("e", "b"), ("b", "c"), ("d", "c")],
        );
        let topo = topological_order(&g);
        assert!(topo.is_complete());
        let pos: HashMap<NodeIndex, usize> =
            topo.order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        for e in g.graph().edge_references() {
            assert!(pos[&e.source()] < pos[&e.target()]);
        }
    }

    #[test]
    fn kahn_blocks_cycle_and_downstream() {
        let g = graph_of(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("b", "c"), ("c", "b"), ("c", "d"), ("a", "e")],
        );
        let topo = topological_order(&g);
        assert!(!topo.is_complete());
        assert_eq!(order_names(&g, &topo.order), vec!["a", "e"]);
        assert_eq!(order_names(&g, &topo.blocked), vec!["b", "c", "d"]);
    }

    #[test]
    fn kahn_blocks_self_loop() {
        let g = graph_of(&["a", "b"], &[("a", "a")]);
        let topo = topological_order(&g);
        assert_eq!(order_names(&g, &topo.order), vec!["b"]);
        assert_eq!(order_names(&g, &topo.blocked), vec!["a"]);
    }

    #[test]
    fn kahn_handles_parallel_edges() {
        let g = ingest(&[], &edges(&[("a", "b"), ("a", "b")]));
        let topo = topological_order(&g);
        assert!(topo.is_complete());
        assert_eq!(order_names(&g, &topo.order), vec!["a", "b"]);
    }

    /// Both algorithms agree on the verdict.
    #[test]
    fn detect_and_kahn_agree() {
        let cases: Vec<Vec<(&str, &str)>> = vec![
            vec![],
            vec![("a", "b")],
            vec![("a", "a")],
            vec![("a", "b"), ("b", "a")],
            vec![("a", "b"), ("b", "c"), ("a", "c")],
            vec![("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")],
        ];
        for case in cases {
            let g = ingest(&[], &edges(&case));
            assert_eq!(
                detect(&g).is_dag,
                topological_order(&g).is_complete(),
                "disagreement on {case:?}"
            );
        }
    }
}
