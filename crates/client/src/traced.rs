// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced transport wrapper for consistent observability

use crate::error::TransportError;
use crate::transport::{ChunkStream, Transport};
use acmp_core::ModernizeRequest;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::Instrument;

/// Wrapper that adds tracing to any Transport
#[derive(Clone)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport> Transport for TracedTransport<T> {
    async fn open(&self, request: &ModernizeRequest) -> Result<ChunkStream, TransportError> {
        let span = tracing::info_span!(
            "transport.open",
            file = %request.file_name,
            language = %request.language,
            framework = %request.framework,
        );

        async {
            tracing::info!(code_len = request.code.len(), "submitting");

            let start = std::time::Instant::now();
            let result = self.inner.open(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(stream) => {
                    tracing::info!(elapsed_ms, "stream opened");
                    let body_span = tracing::debug_span!("transport.body");
                    let stream = stream.inspect(move |chunk| {
                        let _guard = body_span.enter();
                        match chunk {
                            Ok(bytes) => tracing::trace!(len = bytes.len(), "chunk"),
                            Err(e) => tracing::error!(error = %e, "body read failed"),
                        }
                    });
                    Ok(Box::pin(stream) as ChunkStream)
                }
                Err(e) => {
                    tracing::error!(elapsed_ms, error = %e, "open failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
