// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stream driver
//!
//! Owns one run's stream: opens the transport, recovers lines from the
//! chunked body, parses them, and forwards typed events tagged with the
//! run's epoch. It is the only part of the pipeline that suspends.

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::transport::Transport;
use acmp_core::{parse_line, FrameDecoder, Line, ModernizeRequest, RunEpoch, RunEvent};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How a driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server closed the stream
    Completed,
    /// A transport failure ended the run
    Failed,
    /// The run was cancelled; nothing was emitted after the cancel
    Cancelled,
    /// Nobody was listening any more
    Detached,
}

/// Message from a driver to its controller
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Event { epoch: RunEpoch, event: RunEvent },
    Finished { epoch: RunEpoch, end: StreamEnd },
}

impl DriverEvent {
    pub fn epoch(&self) -> RunEpoch {
        match self {
            DriverEvent::Event { epoch, .. } | DriverEvent::Finished { epoch, .. } => *epoch,
        }
    }
}

/// Drives one run's stream to completion
pub struct StreamDriver<T> {
    transport: T,
    request: ModernizeRequest,
    epoch: RunEpoch,
    tx: mpsc::Sender<DriverEvent>,
    cancel: CancellationToken,
    run_timeout: Option<Duration>,
    max_line_bytes: usize,
}

impl<T: Transport> StreamDriver<T> {
    pub fn new(
        transport: T,
        request: ModernizeRequest,
        epoch: RunEpoch,
        config: &ClientConfig,
        tx: mpsc::Sender<DriverEvent>,
    ) -> Self {
        Self {
            transport,
            request,
            epoch,
            tx,
            cancel: CancellationToken::new(),
            run_timeout: config.run_timeout,
            max_line_bytes: config.max_line_bytes,
        }
    }

    /// Token that stops this driver when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run on the current task. Always ends with a `Finished` event.
    pub async fn run(self) -> StreamEnd {
        let end = self.pump().await;
        tracing::debug!(epoch = %self.epoch, ?end, "stream finished");
        // The receiver may already be gone; there is nobody left to tell
        let _ = self
            .tx
            .send(DriverEvent::Finished {
                epoch: self.epoch,
                end,
            })
            .await;
        end
    }

    /// Run on a new tokio task
    pub fn spawn(self) -> RunHandle {
        let epoch = self.epoch;
        let cancel = self.cancel.clone();
        let task = tokio::spawn(self.run());
        RunHandle { epoch, cancel, task }
    }

    async fn pump(&self) -> StreamEnd {
        let deadline = self.run_timeout.map(|timeout| Instant::now() + timeout);
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(expired);

        let mut stream = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return StreamEnd::Cancelled,
            _ = &mut expired => return self.timed_out().await,
            opened = self.transport.open(&self.request) => match opened {
                Ok(stream) => stream,
                Err(e) => return self.fail(e).await,
            },
        };

        let mut decoder = FrameDecoder::with_limit(self.max_line_bytes);
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!(epoch = %self.epoch, pending = decoder.pending(), "cancelled");
                    return StreamEnd::Cancelled;
                }
                _ = &mut expired => return self.timed_out().await,
                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        for line in decoder.push(&bytes) {
                            if self.cancel.is_cancelled() {
                                return StreamEnd::Cancelled;
                            }
                            if !self.dispatch(&line).await {
                                return StreamEnd::Detached;
                            }
                        }
                    }
                    Some(Err(e)) => return self.fail(e).await,
                    None => {
                        if let Some(line) = decoder.finish() {
                            if !self.dispatch(&line).await {
                                return StreamEnd::Detached;
                            }
                        }
                        return StreamEnd::Completed;
                    }
                },
            }
        }
    }

    /// Parse one line and forward what it carries. Returns false once the
    /// receiver is gone.
    async fn dispatch(&self, line: &str) -> bool {
        let event = match parse_line(line) {
            Line::Ignored | Line::Malformed { .. } => return true,
            Line::Failure { message } => RunEvent::reported(message),
            Line::Update(update) => RunEvent::Update(update),
        };
        self.emit(event).await
    }

    /// Send unless cancelled first; a cancelled run never blocks on a full
    /// channel
    async fn emit(&self, event: RunEvent) -> bool {
        let event = DriverEvent::Event {
            epoch: self.epoch,
            event,
        };
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => true,
            sent = self.tx.send(event) => sent.is_ok(),
        }
    }

    async fn timed_out(&self) -> StreamEnd {
        let timeout = self.run_timeout.unwrap_or_default();
        self.fail(TransportError::Timeout(timeout)).await
    }

    async fn fail(&self, err: TransportError) -> StreamEnd {
        if self.cancel.is_cancelled() {
            return StreamEnd::Cancelled;
        }
        tracing::warn!(epoch = %self.epoch, error = %err, "run failed");
        if self.emit(RunEvent::failed(err.kind(), err.to_string())).await {
            StreamEnd::Failed
        } else {
            StreamEnd::Detached
        }
    }
}

/// Handle to a spawned driver
#[derive(Debug)]
pub struct RunHandle {
    epoch: RunEpoch,
    cancel: CancellationToken,
    task: JoinHandle<StreamEnd>,
}

impl RunHandle {
    pub fn epoch(&self) -> RunEpoch {
        self.epoch
    }

    /// Stop reading; the driver emits nothing further for this run
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the driver task to stop
    pub async fn join(self) -> StreamEnd {
        match self.task.await {
            Ok(end) => end,
            Err(e) => {
                tracing::error!(epoch = %self.epoch, error = %e, "driver task aborted");
                StreamEnd::Detached
            }
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
