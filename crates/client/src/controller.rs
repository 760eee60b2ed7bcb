// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run controller
//!
//! Keeps at most one run in flight. All drivers share one channel; every
//! message carries the epoch of the run that produced it and goes through
//! the session gate, so a superseded stream that is still draining cannot
//! touch the current state.

use crate::config::ClientConfig;
use crate::driver::{DriverEvent, RunHandle, StreamDriver};
use crate::transport::Transport;
use acmp_core::{Applied, FailureKind, RunEpoch, RunEvent, RunState, Selection, Session, Update, View};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Caller-facing progress of the current run
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Update(Box<Update>),
    /// Transport failure or error payload; the state already shows it
    Error { kind: FailureKind, message: String },
}

/// Callbacks for a run, invoked in arrival order
pub trait RunObserver {
    fn on_update(&mut self, _update: &Update) {}

    /// May fire more than once; the last message wins in the state
    fn on_error(&mut self, _message: &str) {}
}

impl RunObserver for () {}

pub struct RunController<T> {
    transport: T,
    config: ClientConfig,
    session: Session,
    tx: mpsc::Sender<DriverEvent>,
    rx: mpsc::Receiver<DriverEvent>,
    active: Option<RunHandle>,
}

impl<T: Transport> RunController<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        Self {
            transport,
            config,
            session: Session::new(),
            tx,
            rx,
            active: None,
        }
    }

    /// Submit a run, superseding the one in flight
    pub fn start(&mut self, selection: Selection, code: impl Into<String>) -> RunEpoch {
        self.cancel();
        let request = selection.request(code);
        let epoch = self.session.start_run(selection);
        let driver = StreamDriver::new(
            self.transport.clone(),
            request,
            epoch,
            &self.config,
            self.tx.clone(),
        );
        self.active = Some(driver.spawn());
        epoch
    }

    /// Change the selected input; resets to idle and abandons the current run
    pub fn select(&mut self, selection: Option<Selection>) -> RunEpoch {
        self.cancel();
        self.session.select(selection)
    }

    /// Stop the current run. Its state stays as it was.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            tracing::info!(epoch = %handle.epoch(), "cancelling run");
            handle.cancel();
        }
    }

    /// Token that cancels the current run from elsewhere
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.active.as_ref().map(RunHandle::cancel_token)
    }

    /// Next progress of the current run, applied to the state before it is
    /// returned. `None` once its stream has ended or when nothing is running.
    pub async fn next(&mut self) -> Option<Progress> {
        loop {
            let current = self.active.as_ref()?.epoch();
            let message = self.rx.recv().await?;

            match message {
                DriverEvent::Event { epoch, event } => {
                    if self.session.apply(epoch, &event) == Applied::Stale {
                        continue;
                    }
                    return Some(match event {
                        RunEvent::Update(update) => Progress::Update(update),
                        RunEvent::Failed { kind, message } => Progress::Error { kind, message },
                    });
                }
                DriverEvent::Finished { epoch, end } if epoch == current => {
                    tracing::debug!(%epoch, ?end, status = %self.session.state().status, "run stream ended");
                    self.active = None;
                    return None;
                }
                DriverEvent::Finished { .. } => {}
            }
        }
    }

    /// Drain the current run, reporting each step to `observer`
    pub async fn run_to_end(&mut self, observer: &mut impl RunObserver) -> &RunState {
        while let Some(progress) = self.next().await {
            match &progress {
                Progress::Update(update) => observer.on_update(update),
                Progress::Error { message, .. } => observer.on_error(message),
            }
        }
        self.session.state()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn epoch(&self) -> RunEpoch {
        self.session.epoch()
    }

    pub fn state(&self) -> &RunState {
        self.session.state()
    }

    pub fn view(&self) -> View {
        self.session.view()
    }
}

impl<T> Drop for RunController<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
