//! Implementation of `pipedag order <file>`.
//!
//! Prints the pipeline's nodes in execution order (Kahn's algorithm, ties
//! broken by first appearance). Human mode prints one id per line; JSON mode
//! prints `{"order":[..],"blocked":[..]}`.
//!
//! Exit codes: 0 = every node ordered, 1 = some nodes sit on or behind a
//! cycle, 2 = unreadable or malformed request.
use std::io::Write;
use std::time::Instant;

use pipedag_core::{NodeId, PipelineGraph, topological_order};
use petgraph::graph::NodeIndex;
use serde::Serialize;

use crate::error::CliError;
use crate::format::{FormatMode, FormatterConfig, io_error, write_timing};

#[derive(Serialize)]
struct OrderReport<'a> {
    order: Vec<&'a NodeId>,
    blocked: Vec<&'a NodeId>,
}

/// Runs the `order` command against the process's stdout and stderr.
///
/// # Errors
///
/// See [`execute`].
pub fn run(content: &str, config: &FormatterConfig) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    execute(&mut stdout.lock(), &mut stderr.lock(), content, config)
}

/// Orders `content`'s nodes, writing the order to `out` and diagnostics to
/// `err`.
///
/// # Errors
///
/// - [`CliError::MalformedRequest`] / [`CliError::MalformedEdge`] (exit 2).
/// - [`CliError::IncompleteOrder`] (exit 1) when a cycle blocks some nodes.
///   The partial order has already been printed.
pub fn execute<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    content: &str,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let graph = super::load(err, content, config)?;

    let start = Instant::now();
    let topo = topological_order(&graph);
    write_timing(err, "order", start.elapsed(), config).map_err(io_error("stderr"))?;

    let report = OrderReport {
        order: resolve(&graph, &topo.order),
        blocked: resolve(&graph, &topo.blocked),
    };

    match config.mode {
        FormatMode::Human => report
            .order
            .iter()
            .try_for_each(|id| writeln!(out, "{id}")),
        FormatMode::Json => serde_json::to_writer(&mut *out, &report)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out)),
    }
    .map_err(io_error("stdout"))?;

    if topo.is_complete() {
        Ok(())
    } else {
        Err(CliError::IncompleteOrder {
            blocked: report.blocked.len(),
        })
    }
}

fn resolve<'g>(graph: &'g PipelineGraph, indices: &[NodeIndex]) -> Vec<&'g NodeId> {
    indices.iter().filter_map(|&idx| graph.node_id(idx)).collect()
}
