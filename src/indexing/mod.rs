//! Indexing coordinator
//!
//! Turns record batches into per-document engine calls, or a single
//! `_bulk` request when bulk indexing is enabled.

mod coordinator;

pub use coordinator::Indexer;
