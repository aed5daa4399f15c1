//! Search request model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value a field filter compares against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value; the filter is ignored
    Null,
    /// Set membership
    Many(Vec<Value>),
    /// Exact match on one value
    Scalar(Value),
}

impl FilterValue {
    /// Whether this filter contributes a clause
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Many(values) => values.is_empty(),
            Self::Scalar(value) => value.is_null(),
        }
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(values) => Self::Many(values),
            other => Self::Scalar(other),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::from(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One (field, direction) sort pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Normalized search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: Option<String>,
    /// Sort directives, applied in order
    #[serde(default)]
    pub sort: Vec<SortDirective>,
    /// Field filters
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,
    /// Page number (1-indexed)
    pub page: Option<u32>,
    /// Results per page
    pub per_page: Option<u32>,
    /// Raw engine query document; replaces everything above when set
    pub raw: Option<Value>,
}

impl SearchRequest {
    /// Create a request for a free-text query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Create a request that matches every document
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Add a field filter
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Append a sort directive
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortDirective::new(field, direction));
        self
    }

    /// Set page number
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set page size
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Replace compilation with a raw engine query document
    pub fn raw(mut self, document: Value) -> Self {
        self.raw = Some(document);
        self
    }

    /// Free text with surrounding whitespace removed, if any remains
    pub fn text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_value_from_json() {
        assert_eq!(FilterValue::from(Value::Null), FilterValue::Null);
        assert_eq!(
            FilterValue::from(json!([1, 2])),
            FilterValue::Many(vec![json!(1), json!(2)])
        );
        assert_eq!(
            FilterValue::from(json!("draft")),
            FilterValue::Scalar(json!("draft"))
        );
        assert_eq!(FilterValue::from(None::<&str>), FilterValue::Null);
    }

    #[test]
    fn test_filter_value_emptiness() {
        assert!(FilterValue::Null.is_empty());
        assert!(FilterValue::Many(vec![]).is_empty());
        assert!(!FilterValue::from(vec!["a"]).is_empty());
        assert!(!FilterValue::from("").is_empty());
        assert!(!FilterValue::from(0_i64).is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new("  rust  ")
            .filter("status", "published")
            .filter("tags", vec!["a", "b"])
            .sort("created_at", SortDirection::Desc)
            .page(2)
            .per_page(25);

        assert_eq!(request.text(), Some("rust"));
        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.sort[0].direction, SortDirection::Desc);
        assert_eq!(request.page, Some(2));
        assert_eq!(request.per_page, Some(25));
        assert!(request.raw.is_none());
    }

    #[test]
    fn test_blank_query_has_no_text() {
        assert_eq!(SearchRequest::new("   ").text(), None);
        assert_eq!(SearchRequest::match_all().text(), None);
    }

    #[test]
    fn test_request_deserializes_filters() {
        let request: SearchRequest = serde_json::from_value(json!({
            "query": "x",
            "filters": {"status": "open", "ids": [1, 2], "owner": null}
        }))
        .unwrap();

        assert_eq!(request.filters["status"], FilterValue::Scalar(json!("open")));
        assert_eq!(
            request.filters["ids"],
            FilterValue::Many(vec![json!(1), json!(2)])
        );
        assert_eq!(request.filters["owner"], FilterValue::Null);
    }
}
