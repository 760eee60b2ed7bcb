// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `acmp run <file>` - Stream a file through the modernization pipeline

use crate::error::CliError;
use crate::output::{OutputFormat, ProgressPrinter, RunSummary};
use acmp_client::{ClientConfig, Progress};
use acmp_core::{FailureKind, RunStatus, Selection};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Exit code when a run is interrupted with Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source file to modernize
    pub file: PathBuf,

    /// Source language (inferred from the extension by default)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Target framework
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Backend base URL [env: ACMP_ENDPOINT]
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Cap on the whole run, e.g. "90s" or "5m" [env: ACMP_TIMEOUT_RUN_MS]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Write the modernized code here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// TOML config file [env: ACMP_CONFIG]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not print stage progress
    #[arg(short, long)]
    pub quiet: bool,
}

/// Defaults, then config file, then environment, then flags
fn resolve_config(args: &RunArgs) -> Result<ClientConfig, CliError> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("ACMP_CONFIG").map(PathBuf::from));

    let config = match &path {
        Some(path) => {
            ClientConfig::load(path).map_err(|e| CliError::bad_config(Some(path.as_path()), e))?
        }
        None => ClientConfig::default(),
    };
    let mut config = config.with_env();

    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        config.run_timeout = (!timeout.is_zero()).then_some(timeout);
    }

    config
        .validate()
        .map_err(|e| CliError::bad_config(path.as_deref(), e))?;
    Ok(config)
}

fn selection(args: &RunArgs) -> Result<Selection, CliError> {
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let selection = Selection::for_file(file_name).with_framework(args.framework.as_deref());
    match &args.language {
        Some(language) => {
            let language = language.trim().to_lowercase();
            if !acmp_core::language::is_supported(&language) {
                return Err(CliError::unsupported_language(&language));
            }
            Ok(selection.with_language(language))
        }
        None => Ok(selection),
    }
}

pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let code = std::fs::read_to_string(&args.file)
        .map_err(|e| CliError::unreadable_input(&args.file, e))?;
    let selection = selection(&args)?;
    let config = resolve_config(&args)?;
    let endpoint = config.endpoint.clone();

    let mut controller = acmp_client::connect(config)?;
    let mut printer = ProgressPrinter::new(!args.quiet && args.format == OutputFormat::Text);
    let mut last_failure = None;

    controller.start(selection, code);
    printer.update(&controller.view());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            progress = controller.next() => match progress {
                Some(Progress::Update(_)) => printer.update(&controller.view()),
                Some(Progress::Error { kind, message }) => {
                    printer.error(&message);
                    last_failure = Some((kind, message));
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                controller.cancel();
                eprintln!("interrupted");
                return Ok(ExitCode::from(EXIT_INTERRUPTED));
            }
        }
    }

    let state = controller.state();
    if state.status == RunStatus::Fail {
        if let Some((FailureKind::Unreachable, message)) = &last_failure {
            eprint!("{}", CliError::unreachable(&endpoint, message));
        }
    }

    let summary = RunSummary::new(state, &controller.view(), args.output.as_deref());
    if let Some(path) = &args.output {
        if !summary.code.is_empty() {
            write_output(path, &summary.code)?;
        }
    }

    match args.format {
        OutputFormat::Text => {
            if !args.quiet {
                eprint!("{summary}");
            }
            if args.output.is_none() && !summary.code.is_empty() {
                println!("{}", summary.code);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn write_output(path: &Path, code: &str) -> Result<()> {
    std::fs::write(path, code)
        .map_err(|e| CliError::new(format!("cannot write {}", path.display())).with_source(e))?;
    tracing::info!(path = %path.display(), bytes = code.len(), "wrote modernized code");
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
