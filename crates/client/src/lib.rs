// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! acmp-client: streaming transport and run control for the modernize API

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod traced;
pub mod transport;

pub use config::ClientConfig;
pub use controller::{Progress, RunController, RunObserver};
pub use driver::{DriverEvent, RunHandle, StreamDriver, StreamEnd};
pub use error::{ClientError, ConfigError, TransportError};
pub use traced::TracedTransport;
pub use transport::{ChunkStream, HttpTransport, Transport};

#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeChunk, FakeResponse, FakeTransport};

/// Controller over the traced HTTP transport
pub type HttpController = RunController<TracedTransport<HttpTransport>>;

/// Build a controller for the configured endpoint
pub fn connect(config: ClientConfig) -> Result<HttpController, ClientError> {
    config.validate()?;
    let transport = TracedTransport::new(HttpTransport::new(&config)?);
    Ok(RunController::new(transport, config))
}
