//! HTTP client for the search engine's REST API

use super::bulk::{BulkOperation, BulkResponse};
use crate::config::{EngineSettings, Settings};
use crate::error::{Error, Result};
use crate::query::QueryDocument;
use crate::records::Payload;
use crate::results::SearchResponse;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Client for one engine endpoint
///
/// Every call is a single request/response pair; retries and pooling are
/// left to the underlying `reqwest` client.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    mappings: HashMap<String, Value>,
}

impl SearchClient {
    /// Create a client for an endpoint, without index mappings
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let base = Url::parse(&settings.url)
            .map_err(|e| Error::Config(format!("invalid engine URL {}: {}", settings.url, e)))?;

        let timeout = Duration::try_from_secs_f64(settings.request_timeout).map_err(|e| {
            Error::Config(format!(
                "invalid request_timeout {}: {}",
                settings.request_timeout, e
            ))
        })?;

        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(format!("scout-opensearch/{}", crate::VERSION))
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            mappings: HashMap::new(),
        })
    }

    /// Create a client from full settings, including index mappings
    pub fn with_settings(settings: &Settings) -> Result<Self> {
        let mut client = Self::new(&settings.engine)?;
        client.mappings = settings.mappings.clone();
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a query document against an index
    pub async fn search(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse> {
        let url = self.url(&[index, "_search"]);
        let response = self
            .send(self.request(Method::POST, &url).json(query.as_value()))
            .await?;

        let text = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&text)?;
        debug!("Search on {} returned {} hits", index, parsed.hits.hits.len());
        Ok(parsed)
    }

    /// Create or replace one document
    pub async fn upsert(&self, index: &str, id: &str, payload: &Payload) -> Result<()> {
        let url = self.url(&[index, "_doc", id]);
        self.send(self.request(Method::PUT, &url).json(payload)).await?;
        Ok(())
    }

    /// Delete one document
    pub async fn delete(&self, index: &str, id: &str) -> Result<()> {
        let url = self.url(&[index, "_doc", id]);
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }

    /// Delete a whole index
    pub async fn delete_index(&self, index: &str) -> Result<()> {
        let url = self.url(&[index]);
        self.send(self.request(Method::DELETE, &url)).await?;
        Ok(())
    }

    /// Create an index from its configured mapping
    ///
    /// Indices without a configured mapping are created by the engine when the
    /// first document arrives, so asking for one explicitly is an error.
    pub async fn create_index(&self, index: &str) -> Result<()> {
        let Some(mapping) = self.mappings.get(index) else {
            return Err(Error::UnsupportedOperation(format!(
                "index {} has no configured mapping; indices are created automatically when documents are added",
                index
            )));
        };

        let url = self.url(&[index]);
        self.send(self.request(Method::PUT, &url).json(mapping)).await?;
        Ok(())
    }

    /// Send several document operations in one `_bulk` request
    pub async fn bulk(&self, operations: &[BulkOperation]) -> Result<()> {
        if operations.is_empty() {
            return Ok(());
        }

        let url = self.url(&["_bulk"]);
        let body = BulkOperation::to_ndjson(operations)?;
        let response = self
            .send(
                self.request(Method::POST, &url)
                    .header("Content-Type", "application/x-ndjson")
                    .body(body),
            )
            .await?;

        let text = response.text().await?;
        let parsed: BulkResponse = serde_json::from_str(&text)?;
        if let Some((status, reason)) = parsed.first_failure() {
            warn!("Bulk request failed ({}): {}", status, reason);
            return Err(Error::SearchEngine {
                status,
                reason,
                body: Some(text),
            });
        }

        debug!("Bulk request applied {} operations", operations.len());
        Ok(())
    }

    /// Build `{base}/{segment}/...` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }

    /// Execute a request, turning non-success statuses into engine errors
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.ok();
        let error = engine_error(status, body);
        warn!("{}", error);
        Err(error)
    }
}

/// Classify a non-success response
///
/// The engine's structured `error.reason` wins; otherwise the HTTP reason
/// phrase is used.
pub(crate) fn engine_error(status: StatusCode, body: Option<String>) -> Error {
    let structured = body
        .as_deref()
        .and_then(|text| serde_json::from_str::<Value>(text).ok())
        .and_then(|json| match json.get("error") {
            Some(Value::String(reason)) => Some(reason.clone()),
            Some(error) => error
                .get("reason")
                .and_then(|r| r.as_str())
                .map(|s| s.to_string()),
            None => None,
        });

    let reason = structured.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(|r| r.to_string())
            .unwrap_or_else(|| status.as_str().to_string())
    });

    Error::SearchEngine {
        status: status.as_u16(),
        reason,
        body,
    }
}
