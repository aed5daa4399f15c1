//! scout-opensearch: record search on top of OpenSearch
//!
//! Compiles normalized search requests into the engine's query DSL, runs
//! them, and maps the ranked hits back onto records from the application's
//! store of record without disturbing relevance order. Record batches are
//! indexed and removed with one engine call per document, or one `_bulk`
//! call per batch.

pub mod config;
pub mod error;
pub mod indexing;
pub mod network;
pub mod query;
pub mod records;
pub mod results;
pub mod search;

pub use config::Settings;
pub use error::{Error, Result};
pub use query::{FilterValue, QueryDocument, SearchRequest, SortDirection};
pub use records::{Payload, RecordStore, Searchable};
pub use results::{SearchResponse, SearchResult};
pub use search::{QueryExecutor, SearchEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Page size used when neither the request nor the settings give one
pub const DEFAULT_PAGE_SIZE: u32 = 10;
