// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source language inference from file names

use std::path::Path;

/// Language assumed when the extension is unknown
pub const DEFAULT_LANGUAGE: &str = "python";

/// Languages the pipeline accepts, by identifier
pub const SUPPORTED: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "go",
    "rust",
    "c",
    "cpp",
    "csharp",
    "php",
    "ruby",
    "r",
    "bash",
    "powershell",
];

/// Map a file extension to a language identifier
pub fn from_extension(ext: &str) -> Option<&'static str> {
    let lang = match ext.to_ascii_lowercase().as_str() {
        "py" => "python",
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "go" => "go",
        "rs" => "rust",
        "c" | "h" => "c",
        "cpp" | "cxx" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "rb" => "ruby",
        "r" => "r",
        "sh" => "bash",
        "ps1" => "powershell",
        _ => return None,
    };
    Some(lang)
}

/// Infer the language of a file, falling back to [`DEFAULT_LANGUAGE`]
pub fn infer(file_name: &str) -> &'static str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(from_extension)
        .unwrap_or(DEFAULT_LANGUAGE)
}

pub fn is_supported(language: &str) -> bool {
    SUPPORTED.contains(&language)
}
