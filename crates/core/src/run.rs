// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run state machine
//!
//! `Idle → Processing → {Success, Fail}`. Updates move the active stage and
//! merge code and target metadata; only an update from the verification
//! stage settles the outcome. Failures reported outside of updates (the
//! transport, or an error payload) settle the run as `Fail` directly.

use crate::request::Selection;
use crate::stage::Stage;
use crate::update::{TargetMeta, Update};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error log the sandbox reports when verification exceeded its time budget.
///
/// A run that hits it is still a success: the code was produced and only
/// its execution ran long.
pub const TIMEOUT_SENTINEL: &str = "Execution timed out (possible infinite loop).";

/// Identifies one run within a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunEpoch(pub u64);

impl RunEpoch {
    pub fn next(self) -> RunEpoch {
        RunEpoch(self.0 + 1)
    }
}

impl fmt::Display for RunEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Overall status of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Fail,
}

impl RunStatus {
    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Processing => "processing",
            RunStatus::Success => "success",
            RunStatus::Fail => "fail",
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, RunStatus::Success | RunStatus::Fail)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Status, body read or deadline failure
    Transport,
    /// The backend could not be reached at all
    Unreachable,
    /// Error payload sent by the server
    Reported,
}

/// Events that change run state
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Progress record from the stream
    Update(Box<Update>),
    /// The run failed outside of the update flow
    Failed { kind: FailureKind, message: String },
}

impl RunEvent {
    pub fn update(update: Update) -> Self {
        RunEvent::Update(Box::new(update))
    }

    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        RunEvent::Failed {
            kind,
            message: message.into(),
        }
    }

    pub fn reported(message: impl Into<String>) -> Self {
        RunEvent::Failed {
            kind: FailureKind::Reported,
            message: message.into(),
        }
    }
}

/// How the current status was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settlement {
    Verdict,
    Failure,
}

/// Client-held snapshot of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub epoch: RunEpoch,
    pub status: RunStatus,
    pub active_stage: Option<Stage>,
    pub latest_code: String,
    pub diagnostics: Option<String>,
    /// Server-confirmed target
    pub target: TargetMeta,
    /// Caller-chosen input, seeds the target label until the server confirms
    pub selection: Option<Selection>,
    /// Number of verification verdicts received
    pub verdicts: u32,
    #[serde(skip)]
    pub(crate) settled_by: Option<Settlement>,
}

impl RunState {
    /// State before any run, optionally with an input selected
    pub fn idle(epoch: RunEpoch, selection: Option<Selection>) -> Self {
        Self {
            epoch,
            selection,
            ..Self::default()
        }
    }

    /// Fresh state for a run that was just submitted
    pub fn processing(epoch: RunEpoch, selection: Selection) -> Self {
        Self {
            epoch,
            status: RunStatus::Processing,
            selection: Some(selection),
            ..Self::default()
        }
    }

    /// Pure transition function - returns the new state
    pub fn transition(&self, event: &RunEvent) -> RunState {
        let mut state = self.clone();

        match event {
            RunEvent::Update(update) => state.apply_update(update),
            RunEvent::Failed { kind, message } => {
                tracing::debug!(epoch = %state.epoch, ?kind, %message, "run failed");
                state.status = RunStatus::Fail;
                state.diagnostics = Some(message.clone());
                state.settled_by = Some(Settlement::Failure);
            }
        }

        state
    }

    fn apply_update(&mut self, update: &Update) {
        if self.settled_by == Some(Settlement::Failure) {
            tracing::debug!(epoch = %self.epoch, node = %update.node, "ignoring update after failure");
            return;
        }

        if let Some(code) = update.code() {
            self.latest_code = code.to_string();
        }
        self.target.merge(update);

        // A verdict freezes the stage that settled it; only the next
        // verdict may re-decide a failed run
        if self.status == RunStatus::Success
            || (self.status == RunStatus::Fail && !update.node.is_verdict())
        {
            return;
        }

        self.active_stage = Some(update.node);

        if update.node.is_verdict() {
            self.verdicts += 1;
            self.settled_by = Some(Settlement::Verdict);
            match update.errors() {
                None => {
                    self.status = RunStatus::Success;
                    self.diagnostics = None;
                }
                Some(TIMEOUT_SENTINEL) => {
                    self.status = RunStatus::Success;
                    self.diagnostics = Some(TIMEOUT_SENTINEL.to_string());
                }
                Some(errors) => {
                    self.status = RunStatus::Fail;
                    self.diagnostics = Some(errors.to_string());
                }
            }
        }
    }

    /// Check if the run has settled
    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }

    /// Success qualified by the verification timeout
    pub fn timed_out(&self) -> bool {
        self.status == RunStatus::Success && self.diagnostics.as_deref() == Some(TIMEOUT_SENTINEL)
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
