// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line recovery from an arbitrarily chunked byte stream
//!
//! Chunks are split on the `\n` byte before UTF-8 decoding, so neither a
//! record nor a multi-byte character is corrupted when it straddles two
//! chunks. Anything after the last newline stays buffered until more bytes
//! arrive or the stream ends.

/// Longest partial line kept before the decoder gives up on it
pub const DEFAULT_MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// Incremental newline splitter
#[derive(Debug)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    max_line_bytes: usize,
    /// Set after an oversized line was dropped; bytes are skipped until the
    /// next newline.
    discarding: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_LINE_BYTES)
    }

    pub fn with_limit(max_line_bytes: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_line_bytes,
            discarding: false,
        }
    }

    /// Feed a chunk, returning every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(pos);
            rest = &tail[1..];

            if self.discarding {
                self.discarding = false;
                continue;
            }

            self.buf.extend_from_slice(head);
            let raw = std::mem::take(&mut self.buf);
            lines.push(decode_line(&raw));
        }

        if !self.discarding {
            self.buf.extend_from_slice(rest);
            if self.buf.len() > self.max_line_bytes {
                tracing::warn!(
                    buffered = self.buf.len(),
                    limit = self.max_line_bytes,
                    "partial line exceeds limit, discarding until next newline"
                );
                self.buf.clear();
                self.discarding = true;
            }
        }

        lines
    }

    /// Flush buffered content at end of stream
    pub fn finish(self) -> Option<String> {
        if self.discarding || self.buf.is_empty() {
            return None;
        }
        Some(decode_line(&self.buf))
    }

    /// Bytes currently buffered
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(
                len = raw.len(),
                valid_up_to = e.valid_up_to(),
                "line is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(raw).into_owned()
        }
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
