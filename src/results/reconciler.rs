//! Maps ranked engine hits back onto records from the store of record

use super::types::{SearchResponse, SearchResult};
use crate::error::{Error, Result};
use crate::records::{RecordStore, Searchable};
use std::collections::HashMap;
use tracing::debug;

/// Ordered document ids of a response
pub fn map_ids(response: &SearchResponse) -> Vec<String> {
    response.ids()
}

/// Best-effort total of a response
pub fn total_count(response: &SearchResponse) -> u64 {
    response.total_count()
}

/// Resolve the hits of `response` into records, in hit order
///
/// The store is called once with every id and may answer in any order;
/// records it does not return are dropped. An empty hit list returns without
/// touching the store.
pub async fn reconcile<R, S>(response: &SearchResponse, store: &S) -> Result<SearchResult<R>>
where
    R: Searchable,
    S: RecordStore<R> + ?Sized,
{
    let total = response.total_count();
    let total_is_exact = response
        .hits
        .total
        .as_ref()
        .map(|t| !t.is_lower_bound())
        .unwrap_or(false);

    let ids = response.ids();
    if ids.is_empty() {
        return Ok(SearchResult {
            records: Vec::new(),
            total,
            total_is_exact,
        });
    }

    let fetched = store.get_by_ids(&ids).await.map_err(Error::RecordStore)?;
    let fetched_count = fetched.len();
    let records = order_by_hits(&ids, fetched);

    debug!(
        "Reconciled {} hits into {} records ({} fetched)",
        ids.len(),
        records.len(),
        fetched_count
    );

    Ok(SearchResult {
        records,
        total,
        total_is_exact,
    })
}

/// Sort `records` into the order of `ids`, dropping records not in `ids`
fn order_by_hits<R: Searchable>(ids: &[String], records: Vec<R>) -> Vec<R> {
    let positions: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(rank, id)| (id.as_str(), rank))
        .collect();

    let mut ranked: Vec<(usize, R)> = records
        .into_iter()
        .filter_map(|record| {
            let key = record.search_key();
            positions.get(key.as_str()).map(|&rank| (rank, record))
        })
        .collect();

    ranked.sort_by_key(|(rank, _)| *rank);
    ranked.into_iter().map(|(_, record)| record).collect()
}
