/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `pipedag` binary. Every
/// variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The request could not be read or
///   decoded, so no verdict was produced.
/// - Exit code **1**: logical failure. The graph was analysed and the result
///   was printed, but it fails a condition the caller asked for.
use std::fmt;
use std::path::PathBuf;

use pipedag_core::IngestError;

/// All error conditions the `pipedag` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes, when known. Stdin reports `None`.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        /// Byte offset of the first invalid sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// Any other I/O error.
    IoError {
        /// What was being read or written.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input is not a JSON request object.
    MalformedRequest {
        /// Decoder message.
        detail: String,
    },

    /// An edge entry is not a `(source, target)` pair.
    MalformedEdge {
        /// Position in the `edges` list.
        index: usize,
        /// Decoder message.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// `--require-dag` was given and the graph has a cycle.
    NotADag {
        /// Witness cycle rendered as `a -> b -> a`.
        witness: String,
    },

    /// A topological order covers only part of the graph.
    IncompleteOrder {
        /// Number of nodes that could not be ordered.
        blocked: usize,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::MalformedRequest { .. }
            | Self::MalformedEdge { .. } => 2,

            Self::NotADag { .. } | Self::IncompleteOrder { .. } => 1,
        }
    }

    /// Returns a stable snake-case tag for NDJSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "file_not_found",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::InvalidUtf8 { .. } => "invalid_utf8",
            Self::StdinReadError { .. } => "stdin_read_error",
            Self::IoError { .. } => "io_error",
            Self::MalformedRequest { .. } => "malformed_request",
            Self::MalformedEdge { .. } => "malformed_edge",
            Self::NotADag { .. } => "not_a_dag",
            Self::IncompleteOrder { .. } => "incomplete_order",
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::MalformedRequest { detail } => {
                format!("error: malformed request: {detail}")
            }
            Self::MalformedEdge { index, detail } => {
                format!("error: malformed edge at edges[{index}]: {detail}")
            }
            Self::NotADag { witness } => {
                format!("error: graph is not a DAG: {witness}")
            }
            Self::IncompleteOrder { blocked } => {
                format!("error: {blocked} node(s) could not be ordered because of a cycle")
            }
        }
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::MalformedRequest { detail } => Self::MalformedRequest { detail },
            IngestError::MalformedEdge { index, detail } => Self::MalformedEdge { index, detail },
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}
