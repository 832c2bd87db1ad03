//! Staged topology: forward edges between stages, optional stage skips,
//! duplicate edges, undeclared endpoints, and optional cycle injection.

use pipedag_core::{EdgeEntry, NodeEntry, NodeId, PipelineRequest};
use rand::Rng;
use rand::rngs::StdRng;

use super::GeneratorConfig;

/// Builds a complete request from the generator configuration.
///
/// Without `inject_cycles` every edge points from a lower stage to a higher
/// one, so the result is always a DAG.
pub fn build_pipeline(config: &GeneratorConfig, rng: &mut StdRng) -> PipelineRequest {
    let stages = config.num_stages.max(1);
    let width = config.stage_width.max(1);

    let ids: Vec<Vec<NodeId>> = (0..stages)
        .map(|s| (0..width).map(|n| node_id(config, s, n, width)).collect())
        .collect();

    let nodes: Vec<NodeEntry> = ids
        .iter()
        .flatten()
        .filter(|_| !chance(rng, config.implicit_fraction))
        .map(|id| NodeEntry::new(id.clone()))
        .collect();

    let mut edges: Vec<EdgeEntry> = Vec::new();
    for stage in 0..stages - 1 {
        for source in &ids[stage] {
            for _ in 0..sample_fan_out(rng, config.fan_out) {
                let target_stage = if stage + 2 < stages && chance(rng, config.skip_density) {
                    rng.gen_range(stage + 2..stages)
                } else {
                    stage + 1
                };
                let target = &ids[target_stage][rng.gen_range(0..width)];
                let edge = EdgeEntry::new(source.clone(), target.clone());
                if chance(rng, config.duplicate_fraction) {
                    edges.push(edge.clone());
                }
                edges.push(edge);
            }
        }
    }

    if config.inject_cycles {
        inject_cycles(rng, &ids[0][0], &mut edges);
    }

    PipelineRequest::new(nodes, edges)
}

fn node_id(config: &GeneratorConfig, stage: usize, node: usize, width: usize) -> NodeId {
    if config.numeric_ids {
        NodeId::Int(i64::try_from(stage * width + node).unwrap_or(i64::MAX))
    } else {
        NodeId::from(format!("s{stage:02}-n{node:04}"))
    }
}

/// Returns `true` with probability `p`. Out-of-range and NaN values never
/// panic: `p <= 0` is never, `p >= 1` is always.
fn chance(rng: &mut StdRng, p: f64) -> bool {
    rng.r#gen::<f64>() < p
}

/// Integer part of `fan_out`, plus one more with probability equal to the
/// fractional part.
fn sample_fan_out(rng: &mut StdRng, fan_out: f64) -> usize {
    let fan_out = fan_out.max(0.0);
    let base = fan_out.floor();
    let extra = usize::from(chance(rng, fan_out - base));
    base as usize + extra
}

/// Reverses one to three existing edges, each closing a two-node cycle.
/// With no edges to reverse, adds a self-loop on `fallback`.
fn inject_cycles(rng: &mut StdRng, fallback: &NodeId, edges: &mut Vec<EdgeEntry>) {
    if edges.is_empty() {
        edges.push(EdgeEntry::new(fallback.clone(), fallback.clone()));
        return;
    }
    let num_cycles = rng.gen_range(1..=3);
    for _ in 0..num_cycles {
        let picked = &edges[rng.gen_range(0..edges.len())];
        let back = EdgeEntry::new(picked.target.clone(), picked.source.clone());
        edges.push(back);
    }
}
