// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Consistent error formatting for the `wos` command line.
//!
//! Turns a failure into a title, a list of possible causes and a numbered list
//! of fixes. See [`crate::errors::WosError::guidance`] for the per-variant text.

use std::fmt;

/// Closing hint appended to every formatted error.
pub const HELP_HINT: &str = "Re-run with --verbose to see the SOAP exchange.";

/// Formats an error message with title, causes, fixes, and a closing hint.
///
/// # Example
///
/// ```
/// use wos::error::format_error;
///
/// let error = format_error(
///     "Cannot load service descriptor",
///     &["Web of Science endpoint unreachable"],
///     &["Check connectivity to search.webofknowledge.com"],
/// );
/// assert!(error.contains("Possible causes:"));
/// ```
pub fn format_error(title: &str, causes: &[&str], fixes: &[&str]) -> String {
    let mut output = String::new();

    output.push_str(&format!("[✗] {}\n\n", title));

    if !causes.is_empty() {
        output.push_str("Possible causes:\n");
        for cause in causes {
            output.push_str(&format!("  - {}\n", cause));
        }
        output.push('\n');
    }

    if !fixes.is_empty() {
        output.push_str("Try these fixes:\n");
        for (i, fix) in fixes.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, fix));
        }
        output.push('\n');
    }

    output.push_str(HELP_HINT);

    output
}

/// Formats a simple error with just a title and the closing hint.
pub fn format_simple_error(title: &str) -> String {
    format!("[✗] {}\n\n{}", title, HELP_HINT)
}

/// Builder for constructing formatted error messages.
///
/// # Example
///
/// ```
/// use wos::error::ErrorBuilder;
///
/// let error = ErrorBuilder::new("Session not open")
///     .cause("search was called before connect")
///     .fix("Call connect() first")
///     .build();
/// assert!(error.contains("1. Call connect() first"));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorBuilder {
    title: String,
    causes: Vec<String>,
    fixes: Vec<String>,
}

impl ErrorBuilder {
    /// Create a new error builder with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            causes: Vec::new(),
            fixes: Vec::new(),
        }
    }

    /// Add a possible cause.
    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a suggested fix.
    pub fn fix(mut self, fix: impl Into<String>) -> Self {
        self.fixes.push(fix.into());
        self
    }

    /// Build the formatted error message.
    pub fn build(self) -> String {
        let causes: Vec<&str> = self.causes.iter().map(|s| s.as_str()).collect();
        let fixes: Vec<&str> = self.fixes.iter().map(|s| s.as_str()).collect();
        format_error(&self.title, &causes, &fixes)
    }
}

impl fmt::Display for ErrorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clone().build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        let error = format_error(
            "Test Error",
            &["Cause 1", "Cause 2"],
            &["Fix 1", "Fix 2"],
        );

        assert!(error.contains("[✗] Test Error"));
        assert!(error.contains("Possible causes:"));
        assert!(error.contains("  - Cause 1"));
        assert!(error.contains("  - Cause 2"));
        assert!(error.contains("Try these fixes:"));
        assert!(error.contains("  1. Fix 1"));
        assert!(error.contains("  2. Fix 2"));
        assert!(error.ends_with(HELP_HINT));
    }

    #[test]
    fn test_format_simple_error() {
        let error = format_simple_error("Simple error");
        assert!(error.contains("[✗] Simple error"));
        assert!(error.contains(HELP_HINT));
    }

    #[test]
    fn test_error_builder_display() {
        let builder = ErrorBuilder::new("Display test")
            .cause("Cause")
            .fix("Fix");

        let error = format!("{}", builder);
        assert!(error.contains("[✗] Display test"));
        assert!(error.contains("  - Cause"));
    }

    #[test]
    fn test_empty_causes_and_fixes() {
        let error = format_error("Empty test", &[], &[]);
        assert!(error.contains("[✗] Empty test"));
        assert!(!error.contains("Possible causes:"));
        assert!(!error.contains("Try these fixes:"));
    }
}
