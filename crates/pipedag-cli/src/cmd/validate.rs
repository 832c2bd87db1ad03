//! Implementation of `pipedag validate <file>`.
//!
//! Decodes a request, checks it for cycles, and prints the result to stdout:
//! - JSON mode: `{"num_nodes":N,"num_edges":M,"is_dag":B}` on one line, plus
//!   a `cycle` array when `--witness` is set and a cycle exists.
//! - Human mode: aligned `nodes:` / `edges:` / `is_dag:` lines, followed by
//!   `cycle:` for cyclic graphs.
//!
//! Exit codes: 0 = result printed, 1 = cyclic under `--require-dag`,
//! 2 = unreadable or malformed request.
use std::io::Write;
use std::time::Instant;

use pipedag_core::{NodeId, ValidationResult, detect, summarize};
use serde::Serialize;

use crate::error::CliError;
use crate::format::{FormatMode, FormatterConfig, io_error, write_timing};

/// Flags specific to `validate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// Add the witness cycle to JSON output.
    pub witness: bool,
    /// Fail with exit code 1 on a cyclic graph.
    pub require_dag: bool,
}

/// JSON body: the response contract, optionally extended with the witness.
#[derive(Serialize)]
struct Report<'a> {
    num_nodes: usize,
    num_edges: usize,
    is_dag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<&'a [NodeId]>,
}

/// Runs the `validate` command against the process's stdout and stderr.
///
/// # Errors
///
/// See [`execute`].
pub fn run(
    content: &str,
    options: ValidateOptions,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    execute(
        &mut stdout.lock(),
        &mut stderr.lock(),
        content,
        options,
        config,
    )
}

/// Validates `content`, writing the result to `out` and diagnostics to `err`.
///
/// # Errors
///
/// - [`CliError::MalformedRequest`] / [`CliError::MalformedEdge`] (exit 2).
/// - [`CliError::NotADag`] (exit 1) when `require_dag` is set and the graph
///   has a cycle. The result has already been printed.
pub fn execute<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    content: &str,
    options: ValidateOptions,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let graph = super::load(err, content, config)?;

    let start = Instant::now();
    let detection = detect(&graph);
    write_timing(err, "detect", start.elapsed(), config).map_err(io_error("stderr"))?;

    let result = summarize(&graph, &detection);
    let cycle = detection.witness_ids(&graph);

    match config.mode {
        FormatMode::Human => print_human(out, &result, cycle.as_deref()),
        FormatMode::Json => {
            let shown = if options.witness {
                cycle.as_deref()
            } else {
                None
            };
            print_json(out, &result, shown)
        }
    }
    .map_err(io_error("stdout"))?;

    if options.require_dag && !result.is_dag {
        return Err(CliError::NotADag {
            witness: cycle.as_deref().map(super::render_path).unwrap_or_default(),
        });
    }
    Ok(())
}

fn print_human<W: Write>(
    w: &mut W,
    result: &ValidationResult,
    cycle: Option<&[NodeId]>,
) -> std::io::Result<()> {
    writeln!(w, "nodes:   {}", result.node_count)?;
    writeln!(w, "edges:   {}", result.edge_count)?;
    writeln!(w, "is_dag:  {}", result.is_dag)?;
    if let Some(cycle) = cycle {
        writeln!(w, "cycle:   {}", super::render_path(cycle))?;
    }
    Ok(())
}

fn print_json<W: Write>(
    w: &mut W,
    result: &ValidationResult,
    cycle: Option<&[NodeId]>,
) -> std::io::Result<()> {
    let report = Report {
        num_nodes: result.node_count,
        num_edges: result.edge_count,
        is_dag: result.is_dag,
        cycle,
    };
    serde_json::to_writer(&mut *w, &report)?;
    writeln!(w)
}
