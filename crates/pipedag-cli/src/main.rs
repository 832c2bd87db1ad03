mod cli;
mod cmd;
mod error;
mod format;
mod io;

use std::time::Instant;

use clap::Parser;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::cmd::validate::ValidateOptions;
use crate::error::CliError;
use crate::format::{FormatterConfig, io_error, write_error, write_notice, write_timing};

fn main() {
    let cli = Cli::parse();
    let config = FormatterConfig::from_flags(cli.format, cli.no_color, cli.quiet, cli.verbose);

    if let Err(e) = run(&cli, &config) {
        let stderr = std::io::stderr();
        // Nothing left to report to if stderr itself is gone.
        write_error(&mut stderr.lock(), &e, &config).ok();
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli, config: &FormatterConfig) -> Result<(), CliError> {
    let source = cli.command.input();

    let start = Instant::now();
    let content = io::read_input(source, cli.max_file_size)?;
    {
        let stderr = std::io::stderr();
        let mut err = stderr.lock();
        let message = format!("{} ({} bytes)", source.label(), content.len());
        write_notice(&mut err, "input", &message, config).map_err(io_error("stderr"))?;
        write_timing(&mut err, "read", start.elapsed(), config).map_err(io_error("stderr"))?;
    }

    match &cli.command {
        Command::Validate {
            witness,
            require_dag,
            ..
        } => cmd::validate::run(
            &content,
            ValidateOptions {
                witness: *witness,
                require_dag: *require_dag,
            },
            config,
        ),
        Command::Order { .. } => cmd::order::run(&content, config),
    }
}
