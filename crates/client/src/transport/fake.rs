// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ChunkStream, Transport};
use crate::error::TransportError;
use acmp_core::ModernizeRequest;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted step of a fake response body
#[derive(Debug, Clone)]
pub enum FakeChunk {
    /// Deliver these bytes as one chunk
    Data(Bytes),
    /// Wait before the next step
    Delay(Duration),
    /// Fail the body read
    Fail(String),
    /// Never deliver anything again
    Stall,
}

impl FakeChunk {
    pub fn data(bytes: impl Into<Bytes>) -> Self {
        FakeChunk::Data(bytes.into())
    }
}

/// Scripted outcome of one `open` call
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Stream(Vec<FakeChunk>),
    Refuse(TransportError),
}

impl FakeResponse {
    /// Body with each line delivered as its own newline-terminated chunk
    pub fn lines(lines: &[&str]) -> Self {
        FakeResponse::Stream(
            lines
                .iter()
                .map(|line| FakeChunk::data(format!("{line}\n")))
                .collect(),
        )
    }
}

/// Fake transport that replays scripted responses in order
///
/// Once the script is exhausted, `open` yields an empty body.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<FakeResponse>>>,
    calls: Arc<Mutex<Vec<ModernizeRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next `open`
    pub fn push(&self, response: FakeResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }

    /// Get all requests passed to `open`
    pub fn calls(&self) -> Vec<ModernizeRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn open(&self, request: &ModernizeRequest) -> Result<ChunkStream, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(FakeResponse::Stream(Vec::new()));

        let chunks = match response {
            FakeResponse::Refuse(err) => return Err(err),
            FakeResponse::Stream(chunks) => chunks,
        };

        let stream = futures::stream::iter(chunks)
            .then(|chunk| async move {
                match chunk {
                    FakeChunk::Data(bytes) => Some(Ok(bytes)),
                    FakeChunk::Fail(message) => Some(Err(TransportError::Body(message))),
                    FakeChunk::Delay(delay) => {
                        tokio::time::sleep(delay).await;
                        None
                    }
                    FakeChunk::Stall => {
                        std::future::pending::<()>().await;
                        None
                    }
                }
            })
            .filter_map(futures::future::ready);
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
