// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors with context and suggestions

use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The input file could not be read
    pub fn unreadable_input(path: &Path, err: std::io::Error) -> Self {
        CliError::new(format!("cannot read {}", path.display()))
            .with_context(err.to_string())
            .with_suggestion("Check the path and that the file is UTF-8 text")
            .with_source(err)
    }

    /// The config file could not be loaded or is invalid
    pub fn bad_config(path: Option<&Path>, err: acmp_client::ConfigError) -> Self {
        let message = match path {
            Some(path) => format!("invalid configuration in {}", path.display()),
            None => "invalid configuration".to_string(),
        };
        CliError::new(message)
            .with_context(err.to_string())
            .with_suggestion("Check --endpoint, ACMP_ENDPOINT and the config file")
            .with_source(err)
    }

    /// The --language flag names a language the pipeline does not accept
    pub fn unsupported_language(language: &str) -> Self {
        CliError::new(format!("unsupported language '{language}'"))
            .with_context(format!(
                "supported: {}",
                acmp_core::language::SUPPORTED.join(", ")
            ))
            .with_suggestion("Omit --language to infer it from the file extension")
    }

    /// The backend could not be reached
    pub fn unreachable(endpoint: &str, diagnostics: &str) -> Self {
        CliError::new(format!("backend unreachable at {endpoint}"))
            .with_context(diagnostics.to_string())
            .with_suggestion("Check that the modernize server is running")
            .with_suggestion("Point at another backend with --endpoint or ACMP_ENDPOINT")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
