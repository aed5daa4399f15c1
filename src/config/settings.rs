//! Settings structures for the engine configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Main settings structure, read once and handed to component constructors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    /// Index mapping definitions, keyed by index name
    pub mappings: HashMap<String, serde_json::Value>,
    /// Attach soft-delete metadata to payloads of records that expose it
    pub soft_delete: bool,
    pub query: QueryPolicy,
    pub indexing: IndexingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (OPENSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("OPENSEARCH_HOST") {
            self.engine.url = val;
        }
        if let Ok(val) = std::env::var("OPENSEARCH_USER") {
            self.engine.username = Some(val);
        }
        if let Ok(val) = std::env::var("OPENSEARCH_PASS") {
            self.engine.password = Some(val);
        }
        if let Ok(val) = std::env::var("OPENSEARCH_SOFT_DELETE") {
            self.soft_delete = val.parse().unwrap_or(false);
        }
    }

    /// Check that the engine URL is usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.engine.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Unsupported engine URL scheme: {}", url.scheme());
        }
        let timeout = self.engine.request_timeout;
        if !(timeout.is_finite() && timeout > 0.0) {
            anyhow::bail!(
                "request_timeout must be a positive number of seconds, got {}",
                timeout
            );
        }
        Ok(())
    }
}

/// Engine endpoint and transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Base URL, e.g. `https://search.internal:9200`
    pub url: String,
    /// Basic-auth user name
    pub username: Option<String>,
    /// Basic-auth password
    pub password: Option<String>,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Verify TLS certificates
    pub verify_ssl: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            username: None,
            password: None,
            request_timeout: 5.0,
            verify_ssl: true,
        }
    }
}

/// Operator used to combine free-text tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextOperator {
    #[default]
    Or,
    And,
}

impl TextOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
        }
    }
}

/// Boolean clause category that field filters are placed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterContext {
    /// Non-scoring `bool.filter`
    #[default]
    Filter,
    /// Scoring `bool.must`
    Must,
}

/// Deployment-wide query construction policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPolicy {
    pub default_operator: TextOperator,
    pub filter_context: FilterContext,
    /// Page size used when a request does not give one
    pub default_page_size: u32,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            default_operator: TextOperator::Or,
            filter_context: FilterContext::Filter,
            default_page_size: crate::DEFAULT_PAGE_SIZE,
        }
    }
}

/// Indexing behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingSettings {
    /// Send each batch as a single `_bulk` request
    pub bulk: bool,
}
