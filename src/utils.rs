// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Utility functions shared by the client and the command line.

use indexmap::IndexMap;

/// Header names whose values never reach the logs in full.
const SENSITIVE_HEADERS: &[&str] = &["authorization"];

/// Mask a sensitive string (like a basic-auth header) for logging.
///
/// Shows only the first `visible_prefix` characters and replaces the rest with "...".
/// Inputs no longer than the prefix come back as "..." alone.
///
/// # Examples
///
/// ```
/// use wos::utils::mask_sensitive;
///
/// let header = "Basic dXNlcjpwYXNzd29yZA==";
/// assert_eq!(mask_sensitive(header, 6), "Basic ...");
/// ```
pub fn mask_sensitive(input: &str, visible_prefix: usize) -> String {
    if input.chars().count() <= visible_prefix {
        return "...".to_string();
    }

    let prefix: String = input.chars().take(visible_prefix).collect();
    format!("{}...", prefix)
}

/// Render a header map for debug logs with credentials masked.
pub fn redact_headers(headers: &IndexMap<String, String>) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                format!("{}: {}", name, mask_sensitive(value, 6))
            } else {
                format!("{}: {}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
