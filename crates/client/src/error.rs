// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client error types

use acmp_core::FailureKind;
use std::time::Duration;
use thiserror::Error;

/// Failures that end a run before the pipeline reached a verdict
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("failed to connect to backend: {0}")]
    Connect(String),

    #[error("backend returned status {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },

    #[error("stream interrupted: {0}")]
    Body(String),

    #[error("run timed out after {}", format_timeout(.0))]
    Timeout(Duration),
}

fn format_timeout(timeout: &Duration) -> String {
    humantime::format_duration(*timeout).to_string()
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

impl TransportError {
    /// How the run records this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            TransportError::Connect(_) => FailureKind::Unreachable,
            _ => FailureKind::Transport,
        }
    }

    /// Flatten an error and its sources into one line
    pub(crate) fn chain(err: &(dyn std::error::Error + 'static)) -> String {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}

/// Errors loading or validating client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors setting up a client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
