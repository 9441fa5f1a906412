// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parameter records sent to the WokSearch `search` operation.
//!
//! Field names serialize in the service's camelCase so the records can be
//! rendered straight into the SOAP body.

use serde::{Deserialize, Serialize};

/// Database searched by default.
pub const DEFAULT_DATABASE_ID: &str = "WOS";

/// Query language sent with every search.
pub const DEFAULT_QUERY_LANGUAGE: &str = "en";

/// Records requested when the caller does not say otherwise.
pub const DEFAULT_COUNT: u32 = 5;

/// The `queryParameters` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    pub database_id: String,
    pub user_query: String,
    pub query_language: String,
}

impl QueryParameters {
    /// Query the WOS database in English.
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            database_id: DEFAULT_DATABASE_ID.to_string(),
            user_query: user_query.into(),
            query_language: DEFAULT_QUERY_LANGUAGE.to_string(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "A",
            Self::Descending => "D",
        }
    }
}

/// Sort specification inside the retrieve parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Sort key, e.g. `RS` (relevance) or `PY` (publication year).
    pub name: String,
    /// `A` or `D`, see [`SortOrder`].
    pub sort: String,
}

impl SortField {
    pub fn new(name: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            name: name.into(),
            sort: sort.as_str().to_string(),
        }
    }

    /// Relevance, best match first.
    pub fn relevance() -> Self {
        Self::new("RS", SortOrder::Descending)
    }
}

/// The `retrieveParameters` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveParameters {
    /// 1-based offset of the first record.
    pub first_record: u32,
    pub count: u32,
    pub sort_field: SortField,
}

impl RetrieveParameters {
    /// First `count` records sorted by relevance.
    pub fn new(count: u32) -> Self {
        Self {
            first_record: 1,
            count,
            sort_field: SortField::relevance(),
        }
    }
}

impl Default for RetrieveParameters {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parameters_defaults() {
        let params = QueryParameters::new("cancer");
        assert_eq!(params.database_id, "WOS");
        assert_eq!(params.user_query, "cancer");
        assert_eq!(params.query_language, "en");
    }

    #[test]
    fn test_retrieve_parameters_defaults() {
        let params = RetrieveParameters::default();
        assert_eq!(params.first_record, 1);
        assert_eq!(params.count, 5);
        assert_eq!(params.sort_field.name, "RS");
        assert_eq!(params.sort_field.sort, "D");
    }

    #[test]
    fn test_camel_case_field_names() {
        let json = serde_json::to_value(RetrieveParameters::new(10)).unwrap();
        assert_eq!(json["firstRecord"], 1);
        assert_eq!(json["count"], 10);
        assert_eq!(json["sortField"]["name"], "RS");
        assert_eq!(json["sortField"]["sort"], "D");

        let json = serde_json::to_value(QueryParameters::new("TS=cancer")).unwrap();
        assert_eq!(json["databaseId"], "WOS");
        assert_eq!(json["userQuery"], "TS=cancer");
        assert_eq!(json["queryLanguage"], "en");
    }
}
