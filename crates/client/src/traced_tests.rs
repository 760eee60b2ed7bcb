// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::transport::{FakeChunk, FakeResponse, FakeTransport};
use acmp_core::Selection;
use futures::TryStreamExt;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn request() -> ModernizeRequest {
    Selection::for_file("legacy.py")
        .with_framework(Some("flask"))
        .request("print 'hi'")
}

#[test]
fn open_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeTransport::new();
        fake.push(FakeResponse::lines(&["data: {\"node\": \"auditor\"}"]));
        let traced = TracedTransport::new(fake);

        let stream = traced.open(&request()).await?;
        stream.try_collect::<Vec<_>>().await
    });

    assert_eq!(result.map(|chunks| chunks.len()), Ok(1));
    assert!(logs.contains("transport.open"), "Should log span name. Logs:\n{logs}");
    assert!(logs.contains("legacy.py"), "Should log file name. Logs:\n{logs}");
    assert!(logs.contains("submitting"), "Should log entry message. Logs:\n{logs}");
    assert!(logs.contains("stream opened"), "Should log completion. Logs:\n{logs}");
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{logs}");
    assert!(logs.contains("chunk"), "Should trace chunks. Logs:\n{logs}");
}

#[test]
fn open_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeTransport::new();
        fake.push(FakeResponse::Refuse(TransportError::Status {
            status: 503,
            body: "warming up".to_string(),
        }));
        TracedTransport::new(fake).open(&request()).await.map(|_| ())
    });

    assert!(result.is_err());
    assert!(logs.contains("open failed"), "Should log failure. Logs:\n{logs}");
    assert!(logs.contains("503"), "Should log the status. Logs:\n{logs}");
}

#[test]
fn body_errors_are_logged() {
    let (logs, _) = with_tracing(|| async {
        let fake = FakeTransport::new();
        fake.push(FakeResponse::Stream(vec![FakeChunk::Fail("reset by peer".to_string())]));
        let stream = TracedTransport::new(fake).open(&request()).await?;
        stream.try_collect::<Vec<_>>().await
    });

    assert!(logs.contains("body read failed"), "Should log body failure. Logs:\n{logs}");
    assert!(logs.contains("reset by peer"), "Should log the cause. Logs:\n{logs}");
}

#[tokio::test]
async fn delegates_to_inner() {
    let fake = FakeTransport::new();
    let traced = TracedTransport::new(fake.clone());

    traced.open(&request()).await.unwrap();

    assert_eq!(fake.calls(), vec![request()]);
    assert_eq!(traced.inner().calls().len(), 1);
}
