//! Engine responses and their reconciliation with the store of record
//!
//! The hit list order is the relevance order; nothing in this module
//! re-derives it from the fetched records.

mod reconciler;
mod types;

pub use reconciler::{map_ids, reconcile, total_count};
pub use types::*;
