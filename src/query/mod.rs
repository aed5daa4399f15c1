//! Search request model and query compilation
//!
//! Turns a normalized [`SearchRequest`] into the engine's query DSL. No I/O.

mod compiler;
mod request;

pub use compiler::{QueryCompiler, QueryDocument};
pub use request::{FilterValue, SearchRequest, SortDirection, SortDirective};
