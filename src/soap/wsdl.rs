// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Service descriptor (WSDL) reading.
//!
//! Only what is needed to call a document/literal service is extracted: the
//! endpoint address, the namespace of the operation elements and the list of
//! declared operation names.

use anyhow::{anyhow, Result};

use super::xml::XmlElement;
use crate::errors::WosError;

/// What a service descriptor says about the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// `name` of the `service` element, if any.
    pub name: Option<String>,
    /// `targetNamespace` of the definitions root.
    pub target_namespace: String,
    /// Namespace the operation elements are qualified with.
    pub message_namespace: String,
    /// SOAP address the calls are posted to.
    pub endpoint: String,
    /// Declared operation names. Empty when the port type lives in an import.
    pub operations: Vec<String>,
}

impl ServiceDescriptor {
    /// Parse a WSDL 1.1 document.
    pub fn parse(wsdl: &str) -> Result<Self> {
        let root = XmlElement::parse(wsdl)
            .map_err(|e| anyhow!(WosError::Descriptor(format!("unparsable descriptor: {}", e))))?;

        if root.name != "definitions" {
            return Err(anyhow!(WosError::Descriptor(format!(
                "expected <definitions> root, found <{}>",
                root.name
            ))));
        }

        let target_namespace = root
            .attribute("targetNamespace")
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| anyhow!(WosError::Descriptor("missing targetNamespace".to_string())))?
            .to_string();

        let service = root.child("service");
        let name = service.and_then(|s| s.attribute("name")).map(str::to_string);

        // soap:address and soap12:address both have the local name "address"
        let endpoint = service
            .and_then(|s| s.descendant("address"))
            .and_then(|a| a.attribute("location"))
            .filter(|l| !l.is_empty())
            .ok_or_else(|| anyhow!(WosError::Descriptor("missing soap:address location".to_string())))?
            .to_string();

        let operations = root
            .children_named("portType")
            .flat_map(|pt| pt.children_named("operation"))
            .filter_map(|op| op.attribute("name"))
            .map(str::to_string)
            .collect();

        // Schema namespace first, then an imported definition, then our own.
        let message_namespace = root
            .child("types")
            .and_then(|t| t.child("schema"))
            .and_then(|s| s.attribute("targetNamespace"))
            .or_else(|| root.child("import").and_then(|i| i.attribute("namespace")))
            .filter(|ns| !ns.is_empty())
            .unwrap_or(target_namespace.as_str())
            .to_string();

        Ok(Self {
            name,
            target_namespace,
            message_namespace,
            endpoint,
            operations,
        })
    }

    /// Whether `operation` may be called. Always true when nothing is declared.
    pub fn declares(&self, operation: &str) -> bool {
        self.operations.is_empty() || self.operations.iter().any(|op| op == operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH_WSDL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    name="WOKMWSAuthenticateService"
    targetNamespace="http://auth.cxf.wokmws.thomsonreuters.com">
  <wsdl:portType name="WOKMWSAuthenticate">
    <wsdl:operation name="authenticate"/>
    <wsdl:operation name="closeSession"/>
  </wsdl:portType>
  <wsdl:service name="WOKMWSAuthenticateService">
    <wsdl:port name="WOKMWSAuthenticatePort" binding="tns:WOKMWSAuthenticateServiceSoapBinding">
      <soap:address location="http://search.webofknowledge.com/esti/wokmws/ws/WOKMWSAuthenticate"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>"#;

    #[test]
    fn test_parse_auth_descriptor() {
        let descriptor = ServiceDescriptor::parse(AUTH_WSDL).unwrap();
        assert_eq!(descriptor.name.as_deref(), Some("WOKMWSAuthenticateService"));
        assert_eq!(descriptor.target_namespace, "http://auth.cxf.wokmws.thomsonreuters.com");
        assert_eq!(descriptor.message_namespace, descriptor.target_namespace);
        assert_eq!(
            descriptor.endpoint,
            "http://search.webofknowledge.com/esti/wokmws/ws/WOKMWSAuthenticate"
        );
        assert_eq!(descriptor.operations, vec!["authenticate", "closeSession"]);
        assert!(descriptor.declares("closeSession"));
        assert!(!descriptor.declares("search"));
    }

    #[test]
    fn test_imported_port_type() {
        let wsdl = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
            xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
            targetNamespace="http://impl.example">
          <import namespace="http://woksearch.v3.wokmws.thomsonreuters.com" location="WokSearch?wsdl=x.wsdl"/>
          <service name="WokSearchService">
            <port name="WokSearchPort"><soap:address location="http://host/WokSearch"/></port>
          </service>
        </definitions>"#;

        let descriptor = ServiceDescriptor::parse(wsdl).unwrap();
        assert_eq!(descriptor.message_namespace, "http://woksearch.v3.wokmws.thomsonreuters.com");
        assert!(descriptor.operations.is_empty());
        assert!(descriptor.declares("search"));
    }

    #[test]
    fn test_missing_address_is_descriptor_error() {
        let wsdl = r#"<definitions targetNamespace="urn:x"><service name="S"/></definitions>"#;
        let err = ServiceDescriptor::parse(wsdl).unwrap_err();
        assert!(matches!(err.downcast_ref::<WosError>(), Some(WosError::Descriptor(_))));
    }

    #[test]
    fn test_not_a_descriptor() {
        let err = ServiceDescriptor::parse("<html><body>Not found</body></html>").unwrap_err();
        assert!(matches!(err.downcast_ref::<WosError>(), Some(WosError::Descriptor(_))));

        let err = ServiceDescriptor::parse("not xml at all <").unwrap_err();
        assert!(matches!(err.downcast_ref::<WosError>(), Some(WosError::Descriptor(_))));
    }
}
