//! Per-batch index and unindex orchestration

use crate::config::Settings;
use crate::error::Result;
use crate::network::{BulkOperation, SearchClient};
use crate::records::{Payload, Searchable};
use serde_json::Value;
use tracing::{debug, info};

/// Pushes record batches into, and removes them from, the engine
///
/// Batches are not atomic: when document N fails, documents before it are
/// already committed and the error is returned immediately.
#[derive(Clone)]
pub struct Indexer {
    client: SearchClient,
    soft_delete: bool,
    bulk: bool,
}

impl Indexer {
    pub fn new(client: SearchClient, settings: &Settings) -> Self {
        Self {
            client,
            soft_delete: settings.soft_delete,
            bulk: settings.indexing.bulk,
        }
    }

    /// Upsert every record with a non-empty payload
    pub async fn index<R: Searchable>(&self, records: &[R]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let index = first.searchable_as();

        let documents: Vec<(String, Payload)> = records
            .iter()
            .filter_map(|record| {
                self.document(record)
                    .map(|payload| (record.search_key(), payload))
            })
            .collect();

        let skipped = records.len() - documents.len();
        if skipped > 0 {
            debug!("Skipping {} records with empty payloads", skipped);
        }
        if documents.is_empty() {
            return Ok(());
        }

        if self.bulk {
            let operations: Vec<BulkOperation> = documents
                .into_iter()
                .map(|(id, payload)| BulkOperation::Index {
                    index: index.clone(),
                    id,
                    payload,
                })
                .collect();
            self.client.bulk(&operations).await?;
            info!("Indexed {} documents into {} (bulk)", operations.len(), index);
            return Ok(());
        }

        let count = documents.len();
        for (id, payload) in &documents {
            self.client.upsert(&index, id, payload).await?;
        }
        info!("Indexed {} documents into {}", count, index);
        Ok(())
    }

    /// Delete the document of every record
    pub async fn unindex<R: Searchable>(&self, records: &[R]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let index = first.searchable_as();

        if self.bulk {
            let operations: Vec<BulkOperation> = records
                .iter()
                .map(|record| BulkOperation::Delete {
                    index: index.clone(),
                    id: record.search_key(),
                })
                .collect();
            self.client.bulk(&operations).await?;
        } else {
            for record in records {
                self.client.delete(&index, &record.search_key()).await?;
            }
        }

        info!("Removed {} documents from {}", records.len(), index);
        Ok(())
    }

    /// Engine document for a record, or `None` when it has nothing to index
    ///
    /// Soft-delete metadata is merged before the emptiness check. The record
    /// key is added as `id` unless the payload already carries one.
    pub fn document<R: Searchable>(&self, record: &R) -> Option<Payload> {
        let mut payload = record.to_searchable_payload();

        if self.soft_delete {
            if let Some(metadata) = record.soft_delete_metadata() {
                payload.extend(metadata);
            }
        }

        if payload.is_empty() {
            return None;
        }

        payload
            .entry("id")
            .or_insert_with(|| Value::String(record.search_key()));
        Some(payload)
    }
}
