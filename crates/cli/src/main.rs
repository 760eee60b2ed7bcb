// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! acmp - code modernization pipeline client

mod commands;
mod completions;
mod error;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use commands::run;
use std::process::ExitCode;

use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "acmp",
    version,
    about = "Stream a file through the agentic code modernization pipeline"
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Modernize a source file
    Run(run::RunArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Exit code for errors before or outside a run (usage, config, I/O)
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::setup_logging(cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: failed to set up logging: {e:#}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Completions(args) => {
            completions::generate_completions::<Cli>(args.shell);
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(err) => eprint!("{err}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}
