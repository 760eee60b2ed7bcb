// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Renderable projection of a run

use crate::run::{RunState, RunStatus};
use crate::stage::Stage;
use serde::Serialize;
use std::fmt;

/// Render category of a stage chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipState {
    Active,
    Errored,
    Completed,
    Pending,
}

impl fmt::Display for ChipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChipState::Active => "active",
            ChipState::Errored => "errored",
            ChipState::Completed => "completed",
            ChipState::Pending => "pending",
        };
        f.write_str(s)
    }
}

/// Result banner under the stage chips
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Banner {
    None,
    /// Run succeeded; `note` carries a qualifying message such as the
    /// verification timeout
    Complete { note: Option<String> },
    /// Diagnostics to show while the run is not successful
    DebugLogs { logs: String },
}

/// Everything the UI layer needs to draw a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub chips: [(Stage, ChipState); 4],
    pub banner: Banner,
    pub target_label: String,
    /// Whether a new run may be started
    pub can_start: bool,
}

/// Project a run state into a view
pub fn project(state: &RunState) -> View {
    View {
        chips: Stage::ALL.map(|stage| (stage, chip_state(state, stage))),
        banner: banner(state),
        target_label: target_label(state),
        can_start: state.status != RunStatus::Processing
            || state.active_stage.is_some_and(|s| s.is_verdict()),
    }
}

/// Render category for one stage
pub fn chip_state(state: &RunState, stage: Stage) -> ChipState {
    let is_active = state.active_stage == Some(stage);
    let precedes_active = state.active_stage.is_some_and(|active| stage.precedes(active));

    match state.status {
        RunStatus::Processing if is_active => ChipState::Active,
        RunStatus::Fail if is_active => ChipState::Errored,
        RunStatus::Success => ChipState::Completed,
        _ if precedes_active => ChipState::Completed,
        _ => ChipState::Pending,
    }
}

fn banner(state: &RunState) -> Banner {
    match (&state.status, &state.diagnostics) {
        (RunStatus::Success, note) => Banner::Complete { note: note.clone() },
        (_, Some(logs)) => Banner::DebugLogs { logs: logs.clone() },
        (_, None) => Banner::None,
    }
}

/// Single-line description of the target environment
///
/// Server-confirmed values win; the caller's selection fills the gaps.
pub fn target_label(state: &RunState) -> String {
    let target = &state.target;
    let selection = state.selection.as_ref();

    let language = known(&target.language).or_else(|| selection.map(|s| s.language.as_str()));
    let framework = known(&target.framework)
        .filter(|fw| !fw.eq_ignore_ascii_case("none"))
        .or_else(|| selection.and_then(|s| s.framework.as_deref()))
        .filter(|fw| !fw.is_empty());

    let mut out = language.unwrap_or_default().to_string();
    if let Some(version) = known(&target.language_version) {
        out.push(' ');
        out.push_str(version);
    }
    if let Some(framework) = framework {
        out.push_str(" · ");
        out.push_str(framework);
        if let Some(version) = known(&target.framework_version) {
            out.push(' ');
            out.push_str(version);
        }
    }
    out.trim().to_string()
}

fn known(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
