//! `_bulk` request encoding and response inspection

use crate::records::Payload;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// One document operation inside a bulk request
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Create or replace a document
    Index {
        index: String,
        id: String,
        payload: Payload,
    },
    Delete {
        index: String,
        id: String,
    },
}

impl BulkOperation {
    /// Encode operations as newline-delimited JSON, trailing newline included
    pub fn to_ndjson(operations: &[BulkOperation]) -> serde_json::Result<String> {
        let mut body = String::new();
        for operation in operations {
            match operation {
                Self::Index { index, id, payload } => {
                    let action = json!({"index": {"_index": index, "_id": id}});
                    body.push_str(&serde_json::to_string(&action)?);
                    body.push('\n');
                    body.push_str(&serde_json::to_string(payload)?);
                    body.push('\n');
                }
                Self::Delete { index, id } => {
                    let action = json!({"delete": {"_index": index, "_id": id}});
                    body.push_str(&serde_json::to_string(&action)?);
                    body.push('\n');
                }
            }
        }
        Ok(body)
    }
}

/// Response of a `_bulk` call
#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    #[serde(default)]
    status: u16,
    #[serde(default)]
    error: Option<Value>,
}

impl BulkItem {
    fn failed(&self) -> bool {
        self.error.is_some() || !StatusCode::from_u16(self.status).is_ok_and(|s| s.is_success())
    }

    fn reason(&self) -> String {
        if let Some(reason) = self
            .error
            .as_ref()
            .and_then(|e| e.get("reason").and_then(|r| r.as_str()))
        {
            return reason.to_string();
        }
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("bulk item failed")
            .to_string()
    }
}

impl BulkResponse {
    /// Status and reason of the first failed item, if any
    ///
    /// Items with a non-2xx status fail even when the engine leaves `errors`
    /// unset, as it does for deletes of missing documents.
    pub(crate) fn first_failure(&self) -> Option<(u16, String)> {
        let failed = self
            .items
            .iter()
            .flat_map(|item| item.values())
            .find(|item| item.failed());

        match failed {
            Some(item) => Some((item.status, item.reason())),
            None if self.errors => Some((500, "bulk request reported errors".to_string())),
            None => None,
        }
    }
}
