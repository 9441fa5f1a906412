// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! wos - Web of Science session client
//!
//! Authenticates against the Web of Science web services, carries the session
//! id as a cookie on later calls, and forwards searches.
//!
//! **descriptor** -> **connect** -> **search** ... -> **close**
//!
//! # Core Modules
//!
//! - [`client`] - Session lifecycle and search
//! - [`soap`] - Service handles, descriptors, envelopes and the HTTP transport
//! - [`types`] - Query and retrieve parameter records
//! - [`config`] - Client configuration
//! - [`errors`] - Typed failures carried through `anyhow`
//! - [`error`] - Consistent error formatting utilities

pub mod client;
pub mod config;
pub mod error;
pub mod errors;
pub mod soap;
pub mod types;
pub mod utils;

pub use client::{Session, WosClient};
pub use config::ClientConfig;
pub use errors::WosError;
pub use soap::{Headers, HttpResponse, HttpTransport, SoapClient, Transport, XmlElement};
pub use types::{QueryParameters, RetrieveParameters, SortField, SortOrder};

// Re-export error utilities
pub use error::{format_error, format_simple_error, ErrorBuilder};
pub use utils::mask_sensitive;
