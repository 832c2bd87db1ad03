//! End-to-end scenarios for the validation pipeline.
//!
//! Each test feeds a small request through [`pipedag_core::validate`] or
//! [`pipedag_core::validate_json`] and checks the exact response, including
//! the serialized JSON shape the pipeline editor consumes.
#![allow(clippy::expect_used, clippy::panic)]

use pipedag_core::{
    EdgeEntry, ErrorKind, IngestError, NodeEntry, NodeId, PipelineRequest, ValidationResult,
    analyze, parse_request, validate, validate_json,
};

fn nodes(ids: &[&str]) -> Vec<NodeEntry> {
    ids.iter().map(|id| NodeEntry::new(*id)).collect()
}

fn edges(pairs: &[(&str, &str)]) -> Vec<EdgeEntry> {
    pairs.iter().map(|(s, t)| EdgeEntry::new(*s, *t)).collect()
}

fn expect(node_count: usize, edge_count: usize, is_dag: bool) -> ValidationResult {
    ValidationResult {
        node_count,
        edge_count,
        is_dag,
    }
}

#[test]
fn linear_chain_is_a_dag() {
    let r = validate(&nodes(&["A", "B", "C"]), &edges(&[("A", "B"), ("B", "C")]));
    assert_eq!(r, expect(3, 2, true));
}

#[test]
fn two_node_cycle_is_not_a_dag() {
    let r = validate(&nodes(&["A", "B"]), &edges(&[("A", "B"), ("B", "A")]));
    assert_eq!(r, expect(2, 2, false));
}

#[test]
fn self_loop_is_not_a_dag() {
    let r = validate(&nodes(&["A"]), &edges(&[("A", "A")]));
    assert_eq!(r, expect(1, 1, false));
}

#[test]
fn undeclared_endpoints_are_counted() {
    let r = validate(&[], &edges(&[("X", "Y")]));
    assert_eq!(r, expect(2, 1, true));
}

#[test]
fn isolated_nodes_are_a_dag() {
    let r = validate(&nodes(&["A", "B", "C"]), &[]);
    assert_eq!(r, expect(3, 0, true));
}

#[test]
fn cycle_not_involving_every_node() {
    let r = validate(
        &nodes(&["A", "B", "C", "D"]),
        &edges(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "B")]),
    );
    assert_eq!(r, expect(4, 4, false));
}

#[test]
fn empty_request_is_a_dag() {
    assert_eq!(validate(&[], &[]), expect(0, 0, true));
}

#[test]
fn duplicate_edges_count_individually() {
    let r = validate(&nodes(&["A", "B"]), &edges(&[("A", "B"), ("A", "B"), ("A", "B")]));
    assert_eq!(r, expect(2, 3, true));
}

#[test]
fn response_json_uses_caller_field_names() {
    let r = validate_json(
        r#"{
            "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
            "edges": [{"source": "A", "target": "B"}, {"source": "B", "target": "C"}]
        }"#,
    )
    .expect("valid request");
    let json = serde_json::to_string(&r).expect("serialize");
    assert_eq!(json, r#"{"num_nodes":3,"num_edges":2,"is_dag":true}"#);
}

#[test]
fn editor_export_with_extra_fields_is_accepted() {
    let r = validate_json(
        r#"{
            "nodes": [
                {"id": "load", "type": "reader", "position": {"x": 10, "y": 20}},
                {"id": "clean", "data": {"label": "Clean"}}
            ],
            "edges": [
                {"id": "e1", "source": "load", "target": "clean", "animated": true}
            ],
            "viewport": {"zoom": 1.0}
        }"#,
    )
    .expect("extra fields are ignored");
    assert_eq!(r, expect(2, 1, true));
}

#[test]
fn integer_and_string_ids_mix() {
    let r = validate_json(
        r#"{"nodes":[{"id":1},{"id":"1"}],"edges":[{"source":1,"target":"1"},{"source":"1","target":1}]}"#,
    )
    .expect("valid request");
    assert_eq!(r, expect(2, 2, false));
}

#[test]
fn pair_shaped_edges_are_accepted() {
    let r = validate_json(r#"{"nodes":["a","b"],"edges":[["a","b"],["b","c"]]}"#)
        .expect("pair edges decode");
    assert_eq!(r, expect(3, 2, true));
}

#[test]
fn edge_without_target_is_malformed() {
    let err = validate_json(r#"{"nodes":[{"id":"A"}],"edges":[{"source":"A"}]}"#)
        .expect_err("missing target");
    assert_eq!(err.kind(), ErrorKind::MalformedEdge);
    match err {
        IngestError::MalformedEdge { index, .. } => assert_eq!(index, 0),
        IngestError::MalformedRequest { .. } => panic!("expected MalformedEdge, got {err}"),
    }
}

#[test]
fn malformed_edge_reports_its_position() {
    let err = validate_json(
        r#"{"edges":[{"source":"a","target":"b"},{"source":"b","target":null}]}"#,
    )
    .expect_err("null target");
    assert!(err.to_string().contains("edges[1]"), "got: {err}");
}

#[test]
fn non_json_input_is_a_malformed_request() {
    let err = validate_json("not json at all").expect_err("syntax error");
    assert_eq!(err.kind(), ErrorKind::MalformedRequest);
}

#[test]
fn analyze_matches_validate() {
    let request = parse_request(
        r#"{"nodes":[{"id":"A"},{"id":"B"},{"id":"C"},{"id":"D"}],
            "edges":[{"source":"A","target":"B"},{"source":"B","target":"C"},
                     {"source":"C","target":"D"},{"source":"D","target":"B"}]}"#,
    )
    .expect("valid request");
    let analysis = analyze(&request);
    assert_eq!(analysis.result, validate(&request.nodes, &request.edges));
    let cycle = analysis.cycle.expect("cyclic graph has a witness");
    let expected: Vec<NodeId> = ["B", "C", "D", "B"].into_iter().map(NodeId::from).collect();
    assert_eq!(cycle, expected);
}

#[test]
fn request_is_a_snapshot() {
    let mut request = PipelineRequest::new(nodes(&["A", "B"]), edges(&[("A", "B")]));
    let before = analyze(&request);
    request.edges.push(EdgeEntry::new("B", "A"));
    let after = analyze(&request);
    assert!(before.result.is_dag);
    assert!(!after.result.is_dag);
}
