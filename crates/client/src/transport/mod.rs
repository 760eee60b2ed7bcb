// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transports that open a modernize stream

mod http;

pub use http::HttpTransport;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeChunk, FakeResponse, FakeTransport};

use crate::error::TransportError;
use acmp_core::ModernizeRequest;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Raw response body, chunked however the network delivered it
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Opens the event stream for one run
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Submit the request; resolves once the server accepted it and the body
    /// can be read
    async fn open(&self, request: &ModernizeRequest) -> Result<ChunkStream, TransportError>;
}
