//! Compiles search requests into engine query documents

use super::request::{FilterValue, SearchRequest};
use crate::config::{FilterContext, QueryPolicy};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Engine query document, produced once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDocument(Value);

impl QueryDocument {
    /// Wrap an already-built engine query
    pub fn from_raw(document: Value) -> Self {
        Self(document)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Top-level key lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Translates [`SearchRequest`]s into the engine's query DSL
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    policy: QueryPolicy,
}

impl QueryCompiler {
    pub fn new(policy: QueryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &QueryPolicy {
        &self.policy
    }

    /// Compile a request against the searchable fields of a record type
    pub fn compile(&self, request: &SearchRequest, fields: &[String]) -> QueryDocument {
        if let Some(raw) = &request.raw {
            debug!("Using raw query document");
            return QueryDocument(raw.clone());
        }

        let size = request
            .per_page
            .filter(|&n| n > 0)
            .or(Some(self.policy.default_page_size).filter(|&n| n > 0))
            .unwrap_or(crate::DEFAULT_PAGE_SIZE);
        let from = request
            .page
            .map(|page| page.max(1).saturating_sub(1).saturating_mul(size))
            .unwrap_or(0);

        let mut document = Map::new();
        document.insert("_source".to_string(), Value::Bool(true));
        document.insert("size".to_string(), json!(size));
        document.insert("from".to_string(), json!(from));

        if let Some(query) = self.bool_query(request, fields) {
            document.insert("query".to_string(), query);
        }

        let sort: Vec<Value> = request
            .sort
            .iter()
            .filter(|s| !s.field.is_empty())
            .map(|s| json!({ s.field.as_str(): { "order": s.direction.as_str() } }))
            .collect();
        if !sort.is_empty() {
            document.insert("sort".to_string(), Value::Array(sort));
        }

        let document = Value::Object(document);
        debug!("Compiled query document: {}", document);
        QueryDocument(document)
    }

    /// Boolean query for the text and filters, or `None` to match everything
    fn bool_query(&self, request: &SearchRequest, fields: &[String]) -> Option<Value> {
        let mut must = Vec::new();
        let mut filters = Vec::new();

        if let Some(text) = request.text() {
            let mut clause = Map::new();
            clause.insert("query".to_string(), json!(text));
            if !fields.is_empty() {
                clause.insert("fields".to_string(), json!(fields));
            }
            clause.insert(
                "default_operator".to_string(),
                json!(self.policy.default_operator.as_str()),
            );
            must.push(json!({ "simple_query_string": clause }));
        }

        for (field, value) in &request.filters {
            if field.is_empty() {
                continue;
            }
            if let Some(clause) = filter_clause(field, value) {
                filters.push(clause);
            }
        }

        if must.is_empty() && filters.is_empty() {
            return None;
        }

        let mut clauses = Map::new();
        match self.policy.filter_context {
            FilterContext::Must => must.extend(filters),
            FilterContext::Filter if !filters.is_empty() => {
                clauses.insert("filter".to_string(), Value::Array(filters));
            }
            FilterContext::Filter => {}
        }
        if !must.is_empty() {
            clauses.insert("must".to_string(), Value::Array(must));
        }

        Some(json!({ "bool": clauses }))
    }
}

/// Exact-match clause for one filter; empty values yield nothing
fn filter_clause(field: &str, value: &FilterValue) -> Option<Value> {
    match value {
        FilterValue::Many(values) if !values.is_empty() => {
            Some(json!({ "terms": { field: values } }))
        }
        FilterValue::Scalar(value) if !value.is_null() => {
            Some(json!({ "term": { field: { "value": value } } }))
        }
        _ => None,
    }
}
