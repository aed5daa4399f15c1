//! Search orchestration module
//!
//! Compiles requests, runs them through a [`QueryExecutor`], and reconciles
//! the hits with the store of record.

mod engine;
mod executor;

pub use engine::SearchEngine;
pub use executor::QueryExecutor;
