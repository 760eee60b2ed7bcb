// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event line parsing
//!
//! The server emits server-sent-event frames of the form `data: {json}`
//! separated by blank lines. Each line is classified independently, so a bad
//! line never poisons the ones after it.

use crate::update::Update;
use serde_json::Value;

/// Field name carrying a payload
pub const DATA_PREFIX: &str = "data:";

/// Classification of a single stream line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Not a data line (blank keep-alive, comment, other field)
    Ignored,
    /// Data line whose payload could not be decoded
    Malformed { reason: String },
    /// Terminal error payload reported by the server
    Failure { message: String },
    /// A progress record
    Update(Box<Update>),
}

/// Classify a stream line
pub fn parse_line(line: &str) -> Line {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Line::Ignored;
    };
    let payload = payload.strip_prefix(' ').unwrap_or(payload);

    let value = match serde_json::from_str::<Value>(payload) {
        Ok(value) => value,
        Err(e) => return malformed(format!("invalid JSON: {e}")),
    };

    let Some(object) = value.as_object() else {
        return malformed("payload is not an object".to_string());
    };

    match object.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {}
        Some(Value::String(message)) if message.is_empty() => {}
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {}
        Some(Value::String(message)) => {
            return Line::Failure {
                message: message.clone(),
            }
        }
        Some(other) => {
            return Line::Failure {
                message: other.to_string(),
            }
        }
    }

    match serde_json::from_value::<Update>(value) {
        Ok(update) => Line::Update(Box::new(update)),
        Err(e) => malformed(format!("invalid update: {e}")),
    }
}

fn malformed(reason: String) -> Line {
    tracing::warn!(%reason, "skipping malformed event");
    Line::Malformed { reason }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
