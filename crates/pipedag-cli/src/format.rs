/// Stderr diagnostics: human-readable and JSON (NDJSON) modes.
///
/// Results go to stdout and are written by the subcommands. Everything else
/// (notices, phase timings, errors) goes through this module:
///
/// - **Human mode** (default): one line per diagnostic, with a colored
///   severity tag when colors are enabled. Colors are disabled when
///   `--no-color` is set, the `NO_COLOR` environment variable is present
///   (per <https://no-color.org>), or stderr is not a TTY.
/// - **JSON mode**: each diagnostic is a single-line JSON object.
///
/// `--quiet` suppresses everything except errors. `--verbose` enables
/// timings and implicit-node notices.
use std::io::{IsTerminal as _, Write};
use std::time::Duration;

use serde_json::json;

use crate::OutputFormat;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_CYAN: &str = "\x1b[36m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Output format selection for stderr diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Human-readable, optionally colored output.
    Human,
    /// Structured NDJSON output.
    Json,
}

impl From<OutputFormat> for FormatMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Configuration for the diagnostic writers, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Human or NDJSON.
    pub mode: FormatMode,
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress all non-error stderr output.
    pub quiet: bool,
    /// Emit timings and notices.
    pub verbose: bool,
}

impl FormatterConfig {
    /// Constructs a [`FormatterConfig`] from the raw CLI flags.
    pub fn from_flags(
        format: OutputFormat,
        no_color_flag: bool,
        quiet: bool,
        verbose: bool,
    ) -> Self {
        Self {
            mode: format.into(),
            colors: colors_enabled(no_color_flag),
            quiet,
            verbose,
        }
    }

    fn chatty(&self) -> bool {
        self.verbose && !self.quiet
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Writes an informational notice. Only emitted in verbose mode.
///
/// Human: `[I] implicit-node  "x" appears only as an edge endpoint`
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_notice<W: Write>(
    writer: &mut W,
    code: &str,
    message: &str,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.chatty() {
        return Ok(());
    }
    match config.mode {
        FormatMode::Human if config.colors => {
            writeln!(writer, "{ANSI_CYAN}[I]{ANSI_RESET} {code}  {message}")
        }
        FormatMode::Human => writeln!(writer, "[I] {code}  {message}"),
        FormatMode::Json => writeln!(
            writer,
            "{}",
            json!({"severity": "info", "code": code, "message": message})
        ),
    }
}

/// Writes the duration of one processing phase. Only emitted in verbose mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_timing<W: Write>(
    writer: &mut W,
    phase: &str,
    duration: Duration,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if !config.chatty() {
        return Ok(());
    }
    let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
    match config.mode {
        FormatMode::Human => writeln!(writer, "{phase} in {}ms", duration.as_millis()),
        FormatMode::Json => writeln!(
            writer,
            "{}",
            json!({"timing": {"phase": phase, "us": micros}})
        ),
    }
}

/// Writes a fatal error. Never suppressed, not even by `--quiet`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_error<W: Write>(
    writer: &mut W,
    err: &CliError,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    let message = err.message();
    match config.mode {
        FormatMode::Human if config.colors => match message.strip_prefix("error:") {
            Some(rest) => writeln!(writer, "{ANSI_RED}error:{ANSI_RESET}{rest}"),
            None => writeln!(writer, "{message}"),
        },
        FormatMode::Human => writeln!(writer, "{message}"),
        FormatMode::Json => writeln!(
            writer,
            "{}",
            json!({
                "error": {
                    "kind": err.kind(),
                    "exit_code": err.exit_code(),
                    "message": message,
                }
            })
        ),
    }
}

/// Maps a write failure on stdout or stderr to [`CliError::IoError`].
pub fn io_error(target: &str) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |e| CliError::IoError {
        source: target.to_owned(),
        detail: e.to_string(),
    }
}
