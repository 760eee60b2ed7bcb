// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress records streamed by the remote pipeline

use crate::stage::Stage;
use serde::{Deserialize, Deserializer, Serialize};

/// One progress event for a pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub node: Stage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_logs: Option<String>,
    /// Target fields distinguish "absent" (outer `None`) from an explicit
    /// `null` (`Some(None)`).
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub language_version: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub framework: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub framework_version: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_code: Option<String>,
    /// Fields this client does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Update {
    /// Create a bare update for a stage
    pub fn new(node: Stage) -> Self {
        Self {
            node,
            current_code: None,
            error_logs: None,
            language: None,
            language_version: None,
            framework: None,
            framework_version: None,
            file_path: None,
            original_code: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.current_code = Some(code.into());
        self
    }

    pub fn with_error_logs(mut self, logs: impl Into<String>) -> Self {
        self.error_logs = Some(logs.into());
        self
    }

    pub fn with_language(mut self, language: Option<&str>) -> Self {
        self.language = Some(language.map(str::to_string));
        self
    }

    pub fn with_language_version(mut self, version: Option<&str>) -> Self {
        self.language_version = Some(version.map(str::to_string));
        self
    }

    pub fn with_framework(mut self, framework: Option<&str>) -> Self {
        self.framework = Some(framework.map(str::to_string));
        self
    }

    pub fn with_framework_version(mut self, version: Option<&str>) -> Self {
        self.framework_version = Some(version.map(str::to_string));
        self
    }

    /// Code carried by this update, if non-empty
    pub fn code(&self) -> Option<&str> {
        self.current_code.as_deref().filter(|c| !c.is_empty())
    }

    /// Error log carried by this update, if non-empty
    pub fn errors(&self) -> Option<&str> {
        self.error_logs.as_deref().filter(|e| !e.is_empty())
    }

    /// Check if any target field is present
    pub fn has_target(&self) -> bool {
        self.language.is_some()
            || self.language_version.is_some()
            || self.framework.is_some()
            || self.framework_version.is_some()
    }
}

/// Target environment of the modernized artifact, as confirmed by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMeta {
    pub language: Option<String>,
    pub language_version: Option<String>,
    pub framework: Option<String>,
    pub framework_version: Option<String>,
}

impl TargetMeta {
    /// Merge the target fields present in an update
    pub fn merge(&mut self, update: &Update) {
        let fields = [
            (&mut self.language, &update.language),
            (&mut self.language_version, &update.language_version),
            (&mut self.framework, &update.framework),
            (&mut self.framework_version, &update.framework_version),
        ];
        for (slot, incoming) in fields {
            if let Some(value) = incoming {
                slot.clone_from(value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &TargetMeta::default()
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
