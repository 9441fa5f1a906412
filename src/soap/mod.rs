// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Minimal SOAP 1.1 client.
//!
//! A [`SoapClient`] is a handle on one remote service. It is built from the
//! service descriptor (WSDL) location, keeps a map of outgoing headers that is
//! sent with every call, and invokes operations by name with
//! serde-serializable arguments. Responses come back as an [`XmlElement`]
//! tree, unmodified.
//!
//! Network access goes through the [`Transport`] trait so the handle can be
//! driven by [`HttpTransport`] in production and by an in-memory service in
//! tests.
//!
//! # Example
//!
//! ```no_run
//! use wos::config::ClientConfig;
//! use wos::soap::{HttpTransport, SoapClient};
//!
//! let transport = HttpTransport::new(&ClientConfig::new())?;
//! let auth = SoapClient::from_descriptor(
//!     transport,
//!     "http://search.webofknowledge.com/esti/wokmws/ws/WOKMWSAuthenticate?wsdl",
//! )?;
//! let response = auth.call("authenticate", &[])?;
//! println!("{}", response.to_indented_string());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod envelope;
pub mod wsdl;
pub mod xml;

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::WosError;
use crate::utils::redact_headers;

pub use envelope::Part;
pub use wsdl::ServiceDescriptor;
pub use xml::XmlElement;

/// Outgoing HTTP headers, in insertion order.
pub type Headers = IndexMap<String, String>;

/// Raw HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking request/response transport.
pub trait Transport {
    /// Fetch a document, used for service descriptors.
    fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Post a SOAP envelope with the given extra headers.
    fn post(&self, url: &str, headers: &Headers, body: String) -> Result<HttpResponse>;
}

/// [`Transport`] over `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport with the timeouts from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("wos/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!(WosError::Network(format!("cannot create HTTP client: {}", e))))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().map_err(|e| map_reqwest_error(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| map_reqwest_error(url, e))?;
        Ok(HttpResponse { status, body })
    }

    fn post(&self, url: &str, headers: &Headers, body: String) -> Result<HttpResponse> {
        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"");

        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(body).send().map_err(|e| map_reqwest_error(url, e))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| map_reqwest_error(url, e))?;
        Ok(HttpResponse { status, body })
    }
}

fn map_reqwest_error(url: &str, e: reqwest::Error) -> anyhow::Error {
    if e.is_timeout() {
        anyhow!(WosError::Timeout(format!("no answer from {}", url)))
    } else if e.is_connect() {
        anyhow!(WosError::Network(format!("cannot connect to {}: {}", url, e)))
    } else {
        anyhow!(WosError::Network(e.to_string()))
    }
}

/// Handle on one remote SOAP service.
#[derive(Debug, Clone)]
pub struct SoapClient<T: Transport> {
    transport: T,
    descriptor_url: String,
    descriptor: ServiceDescriptor,
    headers: Headers,
}

impl<T: Transport> SoapClient<T> {
    /// Fetch and read the descriptor at `url`.
    ///
    /// Any failure here is a [`WosError::Descriptor`]; nothing is retried.
    pub fn from_descriptor(transport: T, url: &str) -> Result<Self> {
        let response = transport.get(url).map_err(|e| {
            anyhow!(WosError::Descriptor(format!("cannot fetch {}: {}", url, e)))
        })?;

        if !response.is_success() {
            return Err(anyhow!(WosError::Descriptor(format!(
                "cannot fetch {}: HTTP {}",
                url, response.status
            ))));
        }

        let descriptor = ServiceDescriptor::parse(&response.body)?;
        debug!(
            url,
            endpoint = %descriptor.endpoint,
            namespace = %descriptor.message_namespace,
            "Loaded service descriptor"
        );

        Ok(Self {
            transport,
            descriptor_url: url.to_string(),
            descriptor,
            headers: Headers::new(),
        })
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn descriptor_url(&self) -> &str {
        &self.descriptor_url
    }

    pub fn endpoint(&self) -> &str {
        &self.descriptor.endpoint
    }

    /// Headers sent with every call.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Replace all outgoing headers.
    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    /// Merge into the outgoing headers. Existing names are overwritten, the rest survive.
    pub fn update_headers(&mut self, headers: Headers) {
        self.headers.extend(headers);
    }

    /// Invoke `operation` with the given arguments and return the response payload.
    pub fn call(&self, operation: &str, parts: &[Part]) -> Result<XmlElement> {
        if !self.descriptor.declares(operation) {
            return Err(anyhow!(WosError::UnknownOperation(operation.to_string())));
        }

        let body = envelope::build(&self.descriptor.message_namespace, operation, parts);
        debug!(
            operation,
            endpoint = %self.descriptor.endpoint,
            headers = %redact_headers(&self.headers),
            "SOAP call"
        );

        let response = self.transport.post(&self.descriptor.endpoint, &self.headers, body)?;
        debug!(operation, status = response.status, bytes = response.body.len(), "SOAP response");

        let document = match XmlElement::parse(&response.body) {
            Ok(document) => document,
            Err(e) if response.is_success() => return Err(e),
            Err(_) => {
                return Err(anyhow!(WosError::Http {
                    status: response.status,
                    body: response.body,
                }))
            }
        };

        // Faults win over the status code: services send them with HTTP 500.
        let payload = envelope::unwrap_body(document)?;

        if !response.is_success() {
            return Err(anyhow!(WosError::Http {
                status: response.status,
                body: response.body,
            }));
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const WSDL: &str = r#"<definitions xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/" targetNamespace="urn:echo">
        <portType name="Echo"><operation name="echo"/></portType>
        <service name="EchoService"><port name="p"><soap:address location="http://echo/ws"/></port></service>
    </definitions>"#;

    /// Answers descriptors with `WSDL` and posts with a canned response.
    #[derive(Debug, Clone)]
    struct Canned {
        status: u16,
        body: String,
        posted: Rc<RefCell<Vec<(String, Headers, String)>>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                posted: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl Transport for Canned {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            if url.contains("missing") {
                return Ok(HttpResponse { status: 404, body: String::new() });
            }
            Ok(HttpResponse { status: 200, body: WSDL.to_string() })
        }

        fn post(&self, url: &str, headers: &Headers, body: String) -> Result<HttpResponse> {
            self.posted.borrow_mut().push((url.to_string(), headers.clone(), body));
            Ok(HttpResponse { status: self.status, body: self.body.clone() })
        }
    }

    fn envelope(payload: &str) -> String {
        format!(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>{}</s:Body></s:Envelope>"#,
            payload
        )
    }

    #[test]
    fn test_call_posts_to_endpoint_with_headers() {
        let transport = Canned::new(200, &envelope("<echoResponse><return>hi</return></echoResponse>"));
        let mut client = SoapClient::from_descriptor(transport.clone(), "http://echo/ws?wsdl").unwrap();

        let mut headers = Headers::new();
        headers.insert("Cookie".to_string(), "SID=\"x\"".to_string());
        client.set_headers(headers);

        let response = client.call("echo", &[]).unwrap();
        assert_eq!(response.child_text("return"), Some("hi"));

        let posted = transport.posted.borrow();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].0, "http://echo/ws");
        assert_eq!(posted[0].1.get("Cookie").map(String::as_str), Some("SID=\"x\""));
        assert!(posted[0].2.contains("<ns:echo>"));
        assert!(posted[0].2.contains(r#"xmlns:ns="urn:echo""#));
    }

    #[test]
    fn test_update_headers_merges() {
        let transport = Canned::new(200, &envelope(""));
        let mut client = SoapClient::from_descriptor(transport, "http://echo/ws?wsdl").unwrap();

        let mut first = Headers::new();
        first.insert("Authorization".to_string(), "Basic abc".to_string());
        first.insert("Cookie".to_string(), "old".to_string());
        client.set_headers(first);

        let mut second = Headers::new();
        second.insert("Cookie".to_string(), "new".to_string());
        client.update_headers(second);

        assert_eq!(client.headers().len(), 2);
        assert_eq!(client.headers()["Authorization"], "Basic abc");
        assert_eq!(client.headers()["Cookie"], "new");
    }

    #[test]
    fn test_unknown_operation_is_rejected_locally() {
        let transport = Canned::new(200, &envelope(""));
        let client = SoapClient::from_descriptor(transport.clone(), "http://echo/ws?wsdl").unwrap();

        let err = client.call("shout", &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WosError>(),
            Some(&WosError::UnknownOperation("shout".to_string()))
        );
        assert!(transport.posted.borrow().is_empty());
    }

    #[test]
    fn test_fault_wins_over_status() {
        let body = envelope("<s:Fault><faultcode>s:Client</faultcode><faultstring>bad</faultstring></s:Fault>");
        let transport = Canned::new(500, &body);
        let client = SoapClient::from_descriptor(transport, "http://echo/ws?wsdl").unwrap();

        let err = client.call("echo", &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WosError>(),
            Some(&WosError::Fault { code: "s:Client".to_string(), message: "bad".to_string() })
        );
    }

    #[test]
    fn test_http_error_without_fault() {
        let transport = Canned::new(503, "Service Unavailable");
        let client = SoapClient::from_descriptor(transport, "http://echo/ws?wsdl").unwrap();

        let err = client.call("echo", &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WosError>(),
            Some(WosError::Http { status: 503, .. })
        ));
    }

    #[test]
    fn test_missing_descriptor() {
        let err = SoapClient::from_descriptor(Canned::new(200, ""), "http://echo/missing?wsdl").unwrap_err();
        assert!(matches!(err.downcast_ref::<WosError>(), Some(WosError::Descriptor(_))));
    }
}
