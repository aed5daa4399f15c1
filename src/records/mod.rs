//! Record-store boundary
//!
//! Traits implemented by the application for the record types it wants
//! searchable, and for the store that resolves engine ids back to records.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Searchable document body sent to the engine
pub type Payload = Map<String, Value>;

/// A record type that can be indexed and searched
pub trait Searchable: Send + Sync {
    /// Index holding documents of this record type
    fn index_name() -> String
    where
        Self: Sized;

    /// Fields the free-text query searches; empty means the engine default
    fn searchable_fields() -> Vec<String>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Index this particular record belongs to
    fn searchable_as(&self) -> String
    where
        Self: Sized,
    {
        Self::index_name()
    }

    /// Unique key, used as the engine document id
    fn search_key(&self) -> String;

    /// Document body; an empty payload means "do not index"
    fn to_searchable_payload(&self) -> Payload;

    /// Soft-delete metadata (e.g. `{"__soft_deleted": 1}`) for record types
    /// that support trashing. Only consulted when soft-delete indexing is
    /// enabled in the settings.
    fn soft_delete_metadata(&self) -> Option<Payload> {
        None
    }
}

/// Resolves engine document ids into full records
#[async_trait]
pub trait RecordStore<R>: Send + Sync {
    /// Fetch the records for `ids`
    ///
    /// Records may be returned in any order, and ids that no longer exist may
    /// simply be absent from the result.
    async fn get_by_ids(&self, ids: &[String]) -> anyhow::Result<Vec<R>>;
}
