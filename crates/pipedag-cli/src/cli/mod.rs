//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Default for `--max-file-size`: 16 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl PathOrStdin {
    /// Label used in diagnostics: `-` for stdin, otherwise the path.
    pub fn label(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Stdin)
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` prints aligned text to stdout and plain or colored diagnostics to
/// stderr. `Json` prints a single JSON object to stdout and NDJSON
/// diagnostics to stderr.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// All subcommands supported by `pipedag`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a pipeline graph is a DAG.
    ///
    /// Prints the node count, edge count, and acyclicity verdict. Exits 2 if
    /// the request cannot be read or decoded.
    Validate {
        /// Path to a request document, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Include the witness cycle in JSON output when the graph is cyclic.
        #[arg(long)]
        witness: bool,
        /// Exit with code 1 when the graph contains a cycle.
        #[arg(long)]
        require_dag: bool,
    },

    /// Print a topological order of the pipeline's nodes.
    ///
    /// Exits 1 if a cycle prevents some nodes from being ordered.
    Order {
        /// Path to a request document, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },
}

impl Command {
    /// Returns the input argument shared by every subcommand.
    pub fn input(&self) -> &PathOrStdin {
        match self {
            Self::Validate { file, .. } | Self::Order { file } => file,
        }
    }
}

/// Root CLI struct for the `pipedag` binary.
///
/// Global flags are marked `global = true` so clap accepts them before or
/// after the subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "pipedag",
    version,
    about = "Pipeline graph validator",
    long_about = "Checks data-pipeline graphs for cycles.\n\
                  Reads a {nodes, edges} request document and reports its node count,\n\
                  edge count, and whether it is a directed acyclic graph."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report phase timings and implicit nodes on stderr
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum request size in bytes.
    ///
    /// Can also be set via the `PIPEDAG_MAX_FILE_SIZE` environment variable.
    /// Default: 16777216 (16 MiB).
    #[arg(
        long,
        global = true,
        env = "PIPEDAG_MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}
