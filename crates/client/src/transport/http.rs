// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport over reqwest

use super::{ChunkStream, Transport};
use crate::config::ClientConfig;
use crate::error::TransportError;
use acmp_core::ModernizeRequest;
use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::header::ACCEPT;

/// Posts the request and streams the response body
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Client(TransportError::chain(&e)))?;
        Ok(Self {
            client,
            url: config.modernize_url(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self, request: &ModernizeRequest) -> Result<ChunkStream, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Connect(TransportError::chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            // Best effort: the body usually carries the backend's reason
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| TransportError::Body(TransportError::chain(&e)));
        Ok(Box::pin(stream))
    }
}
