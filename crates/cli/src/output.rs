// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for the run command

use acmp_core::{Banner, ChipState, RunState, RunStatus, Stage, View};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn marker(chip: ChipState) -> &'static str {
    match chip {
        ChipState::Completed => "✓",
        ChipState::Active => "▶",
        ChipState::Errored => "✗",
        ChipState::Pending => "·",
    }
}

/// One line showing every stage
pub fn chip_line(view: &View) -> String {
    view.chips
        .iter()
        .map(|(stage, chip)| format!("{} {}", marker(*chip), stage))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Banner text, if the banner is shown
pub fn banner_text(banner: &Banner) -> Option<String> {
    match banner {
        Banner::None => None,
        Banner::Complete { note: None } => {
            Some("complete: the agents verified the modernized code".to_string())
        }
        Banner::Complete { note: Some(note) } => Some(format!("complete: {note}")),
        Banner::DebugLogs { logs } => {
            let mut text = String::from("debug logs:");
            for line in logs.lines() {
                text.push_str("\n  ");
                text.push_str(line);
            }
            Some(text)
        }
    }
}

/// Prints stage progress to stderr as the run advances
pub struct ProgressPrinter {
    enabled: bool,
    last: Option<String>,
}

impl ProgressPrinter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, last: None }
    }

    /// Line to print for this view, or `None` if nothing visible changed
    pub fn render(&mut self, view: &View) -> Option<String> {
        let line = chip_line(view);
        if self.last.as_ref() == Some(&line) {
            return None;
        }
        self.last = Some(line.clone());
        Some(line)
    }

    pub fn update(&mut self, view: &View) {
        if !self.enabled {
            return;
        }
        if let Some(line) = self.render(view) {
            eprintln!("{line}");
        }
    }

    pub fn error(&self, message: &str) {
        if self.enabled {
            eprintln!("error: {message}");
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChipSummary {
    pub stage: Stage,
    pub state: ChipState,
}

/// Final result of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub file: String,
    pub status: RunStatus,
    pub stage: Option<Stage>,
    pub target: String,
    pub verdicts: u32,
    pub diagnostics: Option<String>,
    pub banner: Banner,
    pub chips: Vec<ChipSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub code: String,
}

impl RunSummary {
    pub fn new(state: &RunState, view: &View, output: Option<&Path>) -> Self {
        Self {
            file: state
                .selection
                .as_ref()
                .map(|s| s.file_name.clone())
                .unwrap_or_default(),
            status: state.status,
            stage: state.active_stage,
            target: view.target_label.clone(),
            verdicts: state.verdicts,
            diagnostics: state.diagnostics.clone(),
            banner: view.banner.clone(),
            chips: view
                .chips
                .iter()
                .map(|(stage, state)| ChipSummary {
                    stage: *stage,
                    state: *state,
                })
                .collect(),
            output: output.map(Path::to_path_buf),
            code: state.latest_code.clone(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Human-readable summary, without the code itself
impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chips = self
            .chips
            .iter()
            .map(|chip| format!("{} {}", marker(chip.state), chip.stage))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(f, "{chips}")?;
        if !self.target.is_empty() {
            writeln!(f, "target: {}", self.target)?;
        }
        match banner_text(&self.banner) {
            Some(text) => writeln!(f, "{text}")?,
            None if self.status == RunStatus::Processing => {
                writeln!(f, "stream ended before the pipeline reached a verdict")?
            }
            None => {}
        }
        if let Some(path) = &self.output {
            writeln!(f, "wrote {}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
