//! HTTP networking module
//!
//! Talks to the engine's document, search and index endpoints.

mod bulk;
mod client;

pub use bulk::BulkOperation;
pub use client::SearchClient;
