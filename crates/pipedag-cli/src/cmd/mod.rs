/// Command modules for the `pipedag` CLI.
///
/// Each submodule implements one subcommand. Both share [`load`], which
/// decodes the request and builds the graph, reporting phase timings and
/// implicit nodes on stderr.
pub mod order;
pub mod validate;

use std::io::Write;
use std::time::Instant;

use pipedag_core::{NodeId, PipelineGraph, parse_request};

use crate::error::CliError;
use crate::format::{FormatterConfig, io_error, write_notice, write_timing};

/// Decodes `content` and builds its graph.
///
/// # Errors
///
/// - [`CliError::MalformedRequest`] / [`CliError::MalformedEdge`] when the
///   request cannot be decoded.
/// - [`CliError::IoError`] if writing diagnostics to `err` fails.
pub fn load<E: Write>(
    err: &mut E,
    content: &str,
    config: &FormatterConfig,
) -> Result<PipelineGraph, CliError> {
    let start = Instant::now();
    let request = parse_request(content)?;
    write_timing(err, "parse", start.elapsed(), config).map_err(io_error("stderr"))?;

    let start = Instant::now();
    let graph = PipelineGraph::from_request(&request);
    write_timing(err, "ingest", start.elapsed(), config).map_err(io_error("stderr"))?;

    for id in graph.implicit_nodes() {
        let message = format!("{} appears only as an edge endpoint", quoted(id));
        write_notice(err, "implicit-node", &message, config).map_err(io_error("stderr"))?;
    }
    Ok(graph)
}

/// Renders a node path as `a -> b -> a`.
pub fn render_path(ids: &[NodeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Text ids in double quotes, integer ids bare.
fn quoted(id: &NodeId) -> String {
    match id {
        NodeId::Text(s) => format!("{s:?}"),
        NodeId::Int(n) => n.to_string(),
    }
}
