// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SOAP 1.1 envelope construction and unwrapping.

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::xml::XmlElement;
use crate::errors::WosError;

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// One serialized argument of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    /// Rendered element, `<name>...</name>`.
    pub xml: String,
}

impl Part {
    /// Serialize `value` as an element called `name`.
    pub fn new<S: Serialize>(name: &str, value: &S) -> Result<Self> {
        let xml = quick_xml::se::to_string_with_root(name, value)
            .map_err(|e| anyhow!(WosError::Xml(format!("cannot serialize {}: {}", name, e))))?;
        Ok(Self {
            name: name.to_string(),
            xml,
        })
    }
}

/// Wrap the operation and its parts in an envelope.
///
/// The operation element is qualified with `namespace`; the parts stay
/// unqualified.
pub fn build(namespace: &str, operation: &str, parts: &[Part]) -> String {
    let mut body = String::new();
    for part in parts {
        body.push_str(&part.xml);
    }

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soap:Envelope xmlns:soap="{env}" xmlns:ns="{ns}">"#,
            "<soap:Header/>",
            "<soap:Body><ns:{op}>{body}</ns:{op}></soap:Body>",
            "</soap:Envelope>"
        ),
        env = SOAP_ENV_NS,
        ns = escape_attr(namespace),
        op = operation,
        body = body,
    )
}

/// Take the payload out of a response envelope.
///
/// Returns the first element inside `Body`, or `Body` itself when it is
/// empty. A `Fault` payload becomes [`WosError::Fault`].
pub fn unwrap_body(envelope: XmlElement) -> Result<XmlElement> {
    if envelope.name != "Envelope" {
        return Err(anyhow!(WosError::Xml(format!(
            "expected SOAP Envelope, found <{}>",
            envelope.name
        ))));
    }

    let mut body = envelope
        .children
        .into_iter()
        .find(|c| c.name == "Body")
        .ok_or_else(|| anyhow!(WosError::Xml("SOAP envelope has no Body".to_string())))?;

    if body.children.is_empty() {
        return Ok(body);
    }

    let payload = body.children.remove(0);
    if payload.name == "Fault" {
        return Err(anyhow!(fault_from(&payload)));
    }

    Ok(payload)
}

fn fault_from(fault: &XmlElement) -> WosError {
    let code = fault.child_text("faultcode").unwrap_or_default().to_string();
    let mut message = fault.child_text("faultstring").unwrap_or_default().to_string();
    if message.is_empty() {
        // SOAP 1.2 style Reason/Text
        message = fault
            .descendant("Text")
            .map(|t| t.text.trim().to_string())
            .unwrap_or_default();
    }
    WosError::Fault { code, message }
}

fn escape_attr(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}
