//! Engine facade tying compilation, execution, reconciliation and indexing together

use super::executor::QueryExecutor;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::indexing::Indexer;
use crate::network::SearchClient;
use crate::query::{QueryCompiler, QueryDocument, SearchRequest};
use crate::records::{RecordStore, Searchable};
use crate::results::{self, SearchResponse, SearchResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Record search over one engine endpoint
///
/// Holds only immutable configuration; every call is independent.
#[derive(Clone)]
pub struct SearchEngine {
    settings: Arc<Settings>,
    client: SearchClient,
    compiler: QueryCompiler,
    executor: Arc<dyn QueryExecutor>,
    indexer: Indexer,
}

impl SearchEngine {
    /// Create an engine from settings
    pub fn new(settings: Settings) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        let client = SearchClient::with_settings(&settings)?;
        let compiler = QueryCompiler::new(settings.query.clone());
        let indexer = Indexer::new(client.clone(), &settings);
        let executor: Arc<dyn QueryExecutor> = Arc::new(client.clone());

        info!("Search engine configured for {}", client.base_url());

        Ok(Self {
            settings: Arc::new(settings),
            client,
            compiler,
            executor,
            indexer,
        })
    }

    /// Replace the component that runs queries
    pub fn with_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &SearchClient {
        &self.client
    }

    /// Compile a request for record type `R`
    pub fn compile<R: Searchable>(&self, request: &SearchRequest) -> QueryDocument {
        self.compiler.compile(request, &R::searchable_fields())
    }

    /// Compile and run a request, returning the engine response as-is
    pub async fn execute<R: Searchable>(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let document = self.compile::<R>(request);
        self.executor.execute(&R::index_name(), &document).await
    }

    /// Run a caller-built engine query document without compilation
    pub async fn search_raw<R: Searchable>(&self, document: Value) -> Result<SearchResponse> {
        let document = QueryDocument::from_raw(document);
        self.executor.execute(&R::index_name(), &document).await
    }

    /// Search and resolve the hits into records, in relevance order
    pub async fn search<R, S>(&self, request: &SearchRequest, store: &S) -> Result<SearchResult<R>>
    where
        R: Searchable,
        S: RecordStore<R> + ?Sized,
    {
        let response = self.execute::<R>(request).await?;
        debug!(
            "Search on {} matched {} documents",
            R::index_name(),
            response.total_count()
        );
        results::reconcile(&response, store).await
    }

    /// Search one page of `per_page` records
    pub async fn paginate<R, S>(
        &self,
        request: &SearchRequest,
        per_page: u32,
        page: u32,
        store: &S,
    ) -> Result<SearchResult<R>>
    where
        R: Searchable,
        S: RecordStore<R> + ?Sized,
    {
        let request = request.clone().per_page(per_page).page(page);
        self.search(&request, store).await
    }

    /// Make records searchable
    pub async fn update<R: Searchable>(&self, records: &[R]) -> Result<()> {
        self.indexer.index(records).await
    }

    /// Remove records from the index
    pub async fn delete<R: Searchable>(&self, records: &[R]) -> Result<()> {
        self.indexer.unindex(records).await
    }

    /// Drop every document of record type `R` by deleting its index
    pub async fn flush<R: Searchable>(&self) -> Result<()> {
        self.delete_index(&R::index_name()).await
    }

    /// Create an index from its configured mapping
    pub async fn create_index(&self, name: &str) -> Result<()> {
        self.client.create_index(name).await
    }

    pub async fn delete_index(&self, name: &str) -> Result<()> {
        self.client.delete_index(name).await
    }

    /// Ordered document ids of a response
    pub fn map_ids(&self, response: &SearchResponse) -> Vec<String> {
        results::map_ids(response)
    }

    /// Best-effort total of a response
    pub fn total_count(&self, response: &SearchResponse) -> u64 {
        results::total_count(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::testing::{Book, MemoryStore};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Executor that records its calls and answers with a fixed response
    struct CannedExecutor {
        response: Value,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl CannedExecutor {
        fn new(response: Value) -> Self {
            Self {
                response,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl QueryExecutor for CannedExecutor {
        async fn execute(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((index.to_string(), query.as_value().clone()));
            Ok(serde_json::from_value(self.response.clone())?)
        }
    }

    fn engine_with(executor: Arc<CannedExecutor>) -> SearchEngine {
        SearchEngine::new(Settings::default())
            .unwrap()
            .with_executor(executor)
    }

    #[tokio::test]
    async fn test_substitute_executor_replaces_engine_call() {
        let executor = Arc::new(CannedExecutor::new(json!({
            "hits": {"total": {"value": 57, "relation": "eq"}, "hits": [{"_id": "2"}, {"_id": "1"}]}
        })));
        let engine = engine_with(executor.clone());
        let store = MemoryStore::new(vec![Book::new("1", "one"), Book::new("2", "two")]);

        let result = engine
            .search::<Book, _>(&SearchRequest::new("dune").filter("status", "open"), &store)
            .await
            .unwrap();

        let ids: Vec<_> = result.records.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(result.total, 57);

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "books");
        assert_eq!(
            calls[0].1["query"]["bool"]["must"][0]["simple_query_string"]["fields"],
            json!(["title"])
        );
    }

    #[tokio::test]
    async fn test_paginate_sets_offset() {
        let executor = Arc::new(CannedExecutor::new(json!({"hits": {"hits": []}})));
        let engine = engine_with(executor.clone());
        let store = MemoryStore::default();

        let result = engine
            .paginate::<Book, _>(&SearchRequest::match_all(), 20, 3, &store)
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(store.call_count(), 0);

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls[0].1["from"], json!(40));
        assert_eq!(calls[0].1["size"], json!(20));
    }

    #[tokio::test]
    async fn test_search_raw_passes_document_through() {
        let executor = Arc::new(CannedExecutor::new(json!({"hits": {"hits": [{"_id": "9"}]}})));
        let engine = engine_with(executor.clone());

        let response = engine
            .search_raw::<Book>(json!({"query": {"match_all": {}}}))
            .await
            .unwrap();
        assert_eq!(engine.map_ids(&response), vec!["9"]);
        assert_eq!(engine.total_count(&response), 1);

        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls[0].1, json!({"query": {"match_all": {}}}));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = Settings::default();
        settings.engine.url = "nope".to_string();
        assert!(matches!(SearchEngine::new(settings), Err(Error::Config(_))));
    }

    #[test]
    fn test_non_finite_timeout_is_rejected() {
        for timeout in [f64::NAN, f64::INFINITY] {
            let mut settings = Settings::default();
            settings.engine.request_timeout = timeout;
            assert!(matches!(SearchEngine::new(settings), Err(Error::Config(_))));
        }
    }
}
