//! Engine response envelope and reconciled result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of a `_search` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: HitsEnvelope,
    /// Milliseconds the engine spent on the query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub took: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timed_out: Option<bool>,
    /// Everything else the engine returned (aggregations, suggest, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResponse {
    /// Document ids in relevance order
    pub fn ids(&self) -> Vec<String> {
        self.hits.hits.iter().map(|hit| hit.id.clone()).collect()
    }

    /// Engine-reported total, if the response carries one
    pub fn reported_total(&self) -> Option<u64> {
        self.hits.total.as_ref().map(TotalHits::value)
    }

    /// Best-effort total: the reported total, else the hits on this page
    pub fn total_count(&self) -> u64 {
        self.reported_total()
            .unwrap_or(self.hits.hits.len() as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.hits.hits.is_empty()
    }
}

/// The `hits` object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total`, which engines report in two shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    /// `{"value": 57, "relation": "eq"}`
    Object {
        value: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        relation: Option<String>,
    },
    /// Bare integer, as older engines report it
    Legacy(u64),
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            Self::Object { value, .. } => *value,
            Self::Legacy(value) => *value,
        }
    }

    /// Whether the value is a lower bound rather than exact
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Self::Object { relation: Some(r), .. } if r == "gte")
    }
}

/// One ranked hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "_score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

/// Records of one result page, in hit order
#[derive(Debug, Clone)]
pub struct SearchResult<R> {
    pub records: Vec<R>,
    /// Best-effort total number of matches
    pub total: u64,
    /// `false` when `total` is only the size of this page
    pub total_is_exact: bool,
}

impl<R> SearchResult<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> IntoIterator for SearchResult<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hits(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({"_id": i.to_string()})).collect()
    }

    #[test]
    fn test_total_count_prefers_reported_total() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {"total": {"value": 57, "relation": "eq"}, "hits": hits(10)}
        }))
        .unwrap();
        assert_eq!(response.total_count(), 57);
        assert_eq!(response.reported_total(), Some(57));
    }

    #[test]
    fn test_total_count_falls_back_to_page_size() {
        let response: SearchResponse =
            serde_json::from_value(json!({"hits": {"hits": hits(10)}})).unwrap();
        assert_eq!(response.total_count(), 10);
        assert_eq!(response.reported_total(), None);
    }

    #[test]
    fn test_legacy_integer_total() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {"total": 12, "hits": hits(2)}
        }))
        .unwrap();
        assert_eq!(response.total_count(), 12);
    }

    #[test]
    fn test_lower_bound_total() {
        let total = TotalHits::Object {
            value: 10000,
            relation: Some("gte".to_string()),
        };
        assert!(total.is_lower_bound());
        assert!(!TotalHits::Legacy(3).is_lower_bound());
    }

    #[test]
    fn test_missing_hits_object() {
        let response: SearchResponse =
            serde_json::from_value(json!({"took": 3, "aggregations": {"a": 1}})).unwrap();
        assert!(response.is_empty());
        assert_eq!(response.total_count(), 0);
        assert_eq!(response.took, Some(3));
        assert_eq!(response.extra["aggregations"], json!({"a": 1}));
    }

    #[test]
    fn test_ids_keep_hit_order() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {"hits": [
                {"_id": "3", "_score": 2.5, "_source": {"title": "c"}},
                {"_id": "1", "_score": 1.0},
                {"_id": "2"}
            ]}
        }))
        .unwrap();
        assert_eq!(response.ids(), vec!["3", "1", "2"]);
        assert_eq!(response.hits.hits[0].score, Some(2.5));
        assert!(response.hits.hits[2].source.is_none());
    }
}
