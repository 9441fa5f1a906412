// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Generic XML element tree.
//!
//! Responses are handed back to callers as an [`XmlElement`] without any
//! interpretation of the service's result schema. Element names keep only
//! their local part; attribute names keep their prefix so `xmlns:*`
//! declarations stay visible.

use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::fmt::Write as _;

use crate::errors::WosError;

/// One element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct XmlElement {
    /// Local name, namespace prefix stripped.
    pub name: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    /// Concatenated, unescaped character data directly inside this element.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(xml_error)?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(e)),
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(anyhow!(WosError::Xml(format!(
                "unclosed element <{}>",
                stack[stack.len() - 1].name
            ))));
        }

        root.ok_or_else(|| anyhow!(WosError::Xml("document has no root element".to_string())))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Self::new(String::from_utf8_lossy(start.local_name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            element.attributes.insert(key, value);
        }
        Ok(element)
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first search for the first descendant with the given local name.
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant with the given local name, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|v| v.as_str())
    }

    /// Trimmed text of the first direct child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// Human-readable indented rendering, one element per line.
    pub fn to_indented_string(&self) -> String {
        let mut out = String::new();
        self.write_indented(&mut out, 0);
        out
    }

    fn write_indented(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        if self.text.is_empty() {
            let _ = writeln!(out, "{}{}", indent, self.name);
        } else {
            let _ = writeln!(out, "{}{}: {}", indent, self.name, self.text);
        }
        for child in &self.children {
            child.write_indented(out, depth + 1);
        }
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn collect_named<'a>(element: &'a XmlElement, name: &str, found: &mut Vec<&'a XmlElement>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_named(child, name, found);
    }
}

fn xml_error(e: impl std::fmt::Display) -> anyhow::Error {
    anyhow!(WosError::Xml(e.to_string()))
}
