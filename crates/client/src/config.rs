// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration
//!
//! Layered as defaults, then an optional TOML file, then environment
//! variables. The CLI applies its own flags last.

use crate::error::ConfigError;
use acmp_core::frame::DEFAULT_MAX_LINE_BYTES;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Backend used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Path of the modernize route, relative to the endpoint
pub const MODERNIZE_PATH: &str = "/api/modernize";

/// Settings for connecting to the modernize backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the backend
    pub endpoint: String,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Wall-clock cap on a whole run; unset means the stream may run as
    /// long as the server keeps it open
    #[serde(with = "humantime_serde")]
    pub run_timeout: Option<Duration>,
    /// Longest partial line buffered before it is discarded
    pub max_line_bytes: usize,
    /// Capacity of the event channel between driver and controller
    pub channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            run_timeout: None,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            channel_capacity: 64,
        }
    }
}

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(value: Option<String>) -> Option<Duration> {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

impl ClientConfig {
    /// Load a config file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), endpoint = %config.endpoint, "loaded config");
        Ok(config)
    }

    /// Apply `ACMP_*` environment overrides
    pub fn with_env(self) -> Self {
        self.with_env_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// `ACMP_TIMEOUT_RUN_MS=0` removes the run cap.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup("ACMP_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(timeout) = parse_duration_ms(lookup("ACMP_TIMEOUT_CONNECT_MS")) {
            self.connect_timeout = timeout;
        }
        if let Some(timeout) = parse_duration_ms(lookup("ACMP_TIMEOUT_RUN_MS")) {
            self.run_timeout = (!timeout.is_zero()).then_some(timeout);
        }
        self
    }

    /// Check the settings before opening any connection
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint must be an http(s) URL, got {:?}",
                self.endpoint
            )));
        }
        if self.max_line_bytes == 0 {
            return Err(ConfigError::Invalid("max_line_bytes must be positive".to_string()));
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be positive".to_string()));
        }
        Ok(())
    }

    /// Full URL of the modernize route
    pub fn modernize_url(&self) -> String {
        format!("{}{}", self.endpoint.trim().trim_end_matches('/'), MODERNIZE_PATH)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
