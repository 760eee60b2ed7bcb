// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted modernize backend for CLI integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;
use std::time::Duration;

/// One-shot backend serving a chunked `text/event-stream` response
pub struct Backend {
    pub endpoint: String,
    handle: JoinHandle<String>,
}

impl Backend {
    /// Answer the next request with `status` and `lines`, one chunk each
    pub fn serve(status: &'static str, lines: &[&str]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind backend");
        let endpoint = format!("http://{}", listener.local_addr().expect("local addr"));
        let chunks: Vec<String> = lines.iter().map(|line| format!("{line}\n\n")).collect();

        let handle = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().expect("accept");
            socket
                .set_read_timeout(Some(Duration::from_secs(10)))
                .expect("read timeout");
            let request = read_request(&mut socket);

            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n"
            );
            let _ = socket.write_all(head.as_bytes());
            for chunk in chunks {
                let _ = write!(socket, "{:x}\r\n{chunk}\r\n", chunk.len());
                let _ = socket.flush();
                std::thread::sleep(Duration::from_millis(5));
            }
            let _ = socket.write_all(b"0\r\n\r\n");
            request
        });

        Backend { endpoint, handle }
    }

    /// Raw request the CLI sent
    pub fn request(self) -> String {
        self.handle.join().expect("backend thread")
    }
}

/// An endpoint nothing listens on
pub fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = match socket.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
