// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run inputs and the outbound request body

use crate::language;
use serde::{Deserialize, Serialize};

/// Framework value sent when the caller did not pick one
pub const NO_FRAMEWORK: &str = "None";

/// Caller-chosen input for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub file_name: String,
    pub language: String,
    pub framework: Option<String>,
}

impl Selection {
    /// Select a file, inferring the language from its extension
    pub fn for_file(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let language = language::infer(&file_name).to_string();
        Self {
            file_name,
            language,
            framework: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the framework; blank values clear it
    pub fn with_framework(mut self, framework: Option<&str>) -> Self {
        self.framework = framework
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        self
    }

    /// Build the request body for this selection
    pub fn request(&self, code: impl Into<String>) -> ModernizeRequest {
        ModernizeRequest {
            file_name: self.file_name.clone(),
            code: code.into(),
            language: self.language.clone(),
            framework: self
                .framework
                .clone()
                .unwrap_or_else(|| NO_FRAMEWORK.to_string()),
        }
    }
}

/// Body of the modernize request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModernizeRequest {
    pub file_name: String,
    pub code: String,
    pub language: String,
    pub framework: String,
}
