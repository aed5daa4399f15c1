//! Query execution strategy

use crate::error::Result;
use crate::network::SearchClient;
use crate::query::QueryDocument;
use crate::results::SearchResponse;
use async_trait::async_trait;

/// Runs a compiled query document against an index
///
/// [`SearchClient`] is the default implementation. Callers can substitute
/// their own to intercept or replace the engine call entirely.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse>;
}

#[async_trait]
impl QueryExecutor for SearchClient {
    async fn execute(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse> {
        self.search(index, query).await
    }
}
