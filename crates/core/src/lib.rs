// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! acmp-core: streaming ingestion core for the code modernization pipeline
//!
//! This crate provides:
//! - Line recovery from an arbitrarily chunked byte stream
//! - Event line parsing into typed progress records
//! - A pure run state machine with epoch-gated sessions
//! - A pure view projection for rendering stage chips and banners

pub mod language;
pub mod stage;

// Stream decoding (order follows the data flow)
pub mod frame;
pub mod event;
pub mod update;
pub mod request;
pub mod run;
pub mod session;
pub mod view;

// Re-exports
pub use event::{parse_line, Line};
pub use frame::FrameDecoder;
pub use request::{ModernizeRequest, Selection};
pub use run::{FailureKind, RunEpoch, RunEvent, RunState, RunStatus, TIMEOUT_SENTINEL};
pub use session::{Applied, Session};
pub use stage::Stage;
pub use update::{TargetMeta, Update};
pub use view::{Banner, ChipState, View};
