// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session owning the current run
//!
//! Every run gets a fresh epoch. Events are applied only when they carry the
//! epoch of the current run, so a superseded stream that is still draining
//! cannot touch the newer state.

use crate::request::Selection;
use crate::run::{RunEpoch, RunEvent, RunState};
use crate::view::{self, View};

/// Outcome of offering an event to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The event changed (or was folded into) the current run
    Current,
    /// The event belongs to a superseded run and was dropped
    Stale,
}

/// Caller-owned holder of the current run state
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: RunState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding any previous one
    pub fn start_run(&mut self, selection: Selection) -> RunEpoch {
        let epoch = self.state.epoch.next();
        tracing::info!(%epoch, file = %selection.file_name, language = %selection.language, "run started");
        self.state = RunState::processing(epoch, selection);
        epoch
    }

    /// Change the selected input. Resets to idle and invalidates the current run.
    pub fn select(&mut self, selection: Option<Selection>) -> RunEpoch {
        let epoch = self.state.epoch.next();
        self.state = RunState::idle(epoch, selection);
        epoch
    }

    /// Apply an event tagged with the epoch of the run that produced it
    pub fn apply(&mut self, epoch: RunEpoch, event: &RunEvent) -> Applied {
        if epoch != self.state.epoch {
            tracing::debug!(%epoch, current = %self.state.epoch, "dropping event from superseded run");
            return Applied::Stale;
        }
        self.state = self.state.transition(event);
        Applied::Current
    }

    pub fn epoch(&self) -> RunEpoch {
        self.state.epoch
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Project the current state for rendering
    pub fn view(&self) -> View {
        view::project(&self.state)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
