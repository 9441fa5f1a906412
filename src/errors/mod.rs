// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for Web of Science operations.
//!
//! Library functions return [`anyhow::Result`]. Failures raised by this crate
//! carry a [`WosError`], which callers can recover with
//! `err.downcast_ref::<WosError>()` to tell local misuse apart from remote
//! failures.
//!
//! ```
//! use wos::errors::WosError;
//!
//! let err = anyhow::anyhow!(WosError::SessionNotOpen);
//! match err.downcast_ref::<WosError>() {
//!     Some(WosError::SessionNotOpen) => println!("connect first"),
//!     _ => println!("something else: {}", err),
//! }
//! ```

use crate::error::ErrorBuilder;

/// Error types specific to Web of Science operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WosError {
    /// A service descriptor (WSDL) could not be fetched or understood.
    Descriptor(String),
    /// `search` was called without a session token.
    SessionNotOpen,
    /// The authenticate operation returned an empty session token.
    EmptySession,
    /// The requested record count is not positive.
    InvalidCount(u32),
    /// The operation is not declared by the service descriptor.
    UnknownOperation(String),
    /// The remote service answered with a SOAP fault.
    Fault {
        /// Fault code as sent by the service (e.g. `soap:Server`).
        code: String,
        /// Human-readable fault string.
        message: String,
    },
    /// Non-success HTTP status without a fault body.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// Network or HTTP transport error.
    Network(String),
    /// The request timed out.
    Timeout(String),
    /// Malformed XML in a response, or a record that could not be serialized.
    Xml(String),
}

impl WosError {
    /// Returns true for failures reported by, or on the way to, the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Fault { .. } | Self::Http { .. } | Self::Network(_) | Self::Timeout(_)
        )
    }

    /// Actionable causes and fixes for display in the CLI.
    pub fn guidance(&self) -> ErrorBuilder {
        match self {
            Self::Descriptor(msg) => ErrorBuilder::new(format!("Cannot load service descriptor: {}", msg))
                .cause("Web of Science endpoint unreachable")
                .cause("Base URL points at the wrong host")
                .fix("Check connectivity to search.webofknowledge.com")
                .fix("Verify --base-url if you overrode it"),
            Self::SessionNotOpen => ErrorBuilder::new("Session not open. Invoke connect() before.")
                .cause("search was called before connect")
                .cause("The session was already closed")
                .fix("Call connect() or use session()/with_session()"),
            Self::EmptySession => ErrorBuilder::new("Authentication returned an empty session id")
                .cause("Your institution is not entitled to the service")
                .cause("Invalid premium credentials")
                .fix("Check WOS_USER / WOS_PASSWORD")
                .fix("Retry from a subscribed network"),
            Self::InvalidCount(count) => ErrorBuilder::new(format!("Invalid record count: {}", count))
                .fix("Request at least one record: --count 1"),
            Self::UnknownOperation(op) => ErrorBuilder::new(format!("Unknown SOAP operation: {}", op))
                .cause("The service descriptor does not declare this operation"),
            Self::Fault { code, message } => ErrorBuilder::new(format!("Web of Science fault: {}", message))
                .cause(format!("Fault code {}", code))
                .cause("Malformed query or expired session")
                .cause("Session throttle limit reached")
                .fix("Check the query syntax (e.g. TS=cancer)")
                .fix("Reconnect to obtain a fresh session id"),
            Self::Http { status, .. } => ErrorBuilder::new(format!("Unexpected HTTP status {}", status))
                .cause("Service temporarily unavailable")
                .fix("Wait a moment and retry"),
            Self::Network(msg) => ErrorBuilder::new(format!("Network error: {}", msg))
                .cause("No internet connection")
                .cause("Firewall or proxy blocking HTTP")
                .fix("Check internet connection"),
            Self::Timeout(msg) => ErrorBuilder::new(format!("Request timed out: {}", msg))
                .fix("Increase the timeout: --timeout 120"),
            Self::Xml(msg) => ErrorBuilder::new(format!("Malformed XML: {}", msg))
                .cause("The service returned an unexpected payload"),
        }
    }
}

impl std::fmt::Display for WosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Descriptor(msg) => write!(f, "Service descriptor error: {}", msg),
            Self::SessionNotOpen => write!(f, "Session not open. Invoke connect() before."),
            Self::EmptySession => write!(f, "Authentication returned an empty session id"),
            Self::InvalidCount(count) => write!(f, "Record count must be positive, got {}", count),
            Self::UnknownOperation(op) => write!(f, "Unknown SOAP operation: {}", op),
            Self::Fault { code, message } => write!(f, "SOAP fault {}: {}", code, message),
            Self::Http { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {}", status)
                } else {
                    write!(f, "HTTP {} - {}", status, body)
                }
            }
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            Self::Xml(msg) => write!(f, "XML error: {}", msg),
        }
    }
}

impl std::error::Error for WosError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            WosError::SessionNotOpen.to_string(),
            "Session not open. Invoke connect() before."
        );

        let err = WosError::Fault {
            code: "soap:Server".to_string(),
            message: "Invalid query".to_string(),
        };
        assert!(err.to_string().contains("soap:Server"));
        assert!(err.to_string().contains("Invalid query"));

        let err = WosError::Http { status: 503, body: String::new() };
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[test]
    fn test_is_remote() {
        assert!(!WosError::SessionNotOpen.is_remote());
        assert!(!WosError::InvalidCount(0).is_remote());
        assert!(WosError::Network("down".to_string()).is_remote());
        assert!(WosError::Fault { code: "c".into(), message: "m".into() }.is_remote());
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err = anyhow::anyhow!(WosError::SessionNotOpen);
        assert_eq!(err.downcast_ref::<WosError>(), Some(&WosError::SessionNotOpen));
    }

    #[test]
    fn test_guidance_mentions_title() {
        let text = WosError::InvalidCount(0).guidance().build();
        assert!(text.contains("Invalid record count: 0"));
        assert!(text.contains("--count 1"));
    }
}
