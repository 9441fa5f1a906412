// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Client configuration.
//!
//! ```
//! use std::time::Duration;
//! use wos::config::ClientConfig;
//!
//! let config = ClientConfig::new()
//!     .with_credentials("user", "secret")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_close_on_exit(false);
//!
//! assert!(config.auth_wsdl_url().ends_with("WOKMWSAuthenticate?wsdl"));
//! ```

use std::time::Duration;

/// Default Web of Science host.
pub const DEFAULT_BASE_URL: &str = "http://search.webofknowledge.com";

/// Path of the authentication service descriptor.
const AUTH_WSDL_PATH: &str = "/esti/wokmws/ws/WOKMWSAuthenticate?wsdl";

/// Path of the search service descriptor.
const SEARCH_WSDL_PATH: &str = "/esti/wokmws/ws/WokSearch?wsdl";

/// Default timeout for SOAP requests (in seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default timeout for establishing connections (in seconds).
pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the premium username.
pub const ENV_USER: &str = "WOS_USER";

/// Environment variable holding the premium password.
pub const ENV_PASSWORD: &str = "WOS_PASSWORD";

/// Environment variable holding an existing session id.
pub const ENV_SID: &str = "WOS_SID";

/// Everything needed to build a [`crate::WosClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host the two descriptor locations are derived from.
    pub base_url: String,
    /// Explicit auth descriptor location, overrides `base_url`.
    pub auth_wsdl: Option<String>,
    /// Explicit search descriptor location, overrides `base_url`.
    pub search_wsdl: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// Session id from an earlier `connect`, reused instead of authenticating.
    pub sid: Option<String>,
    /// Close the remote session when the client or its scope guard is dropped.
    pub close_on_exit: bool,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfig {
    /// Anonymous access to the default host, closing on exit.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_wsdl: None,
            search_wsdl: None,
            user: None,
            password: None,
            sid: None,
            close_on_exit: true,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Read credentials and session id from `WOS_USER`, `WOS_PASSWORD` and `WOS_SID`.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.user = non_empty_env(ENV_USER);
        config.password = non_empty_env(ENV_PASSWORD);
        config.sid = non_empty_env(ENV_SID);
        config
    }

    /// Premium access credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Reuse an existing session.
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn with_close_on_exit(mut self, close_on_exit: bool) -> Self {
        self.close_on_exit = close_on_exit;
        self
    }

    /// Point both descriptor locations at another host.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use explicit descriptor locations.
    pub fn with_wsdl_urls(mut self, auth: impl Into<String>, search: impl Into<String>) -> Self {
        self.auth_wsdl = Some(auth.into());
        self.search_wsdl = Some(search.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Location of the authentication service descriptor.
    pub fn auth_wsdl_url(&self) -> String {
        self.auth_wsdl
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.base_url, AUTH_WSDL_PATH))
    }

    /// Location of the search service descriptor.
    pub fn search_wsdl_url(&self) -> String {
        self.search_wsdl
            .clone()
            .unwrap_or_else(|| format!("{}{}", self.base_url, SEARCH_WSDL_PATH))
    }

    /// Username and password, only when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
