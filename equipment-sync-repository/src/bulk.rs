//! Bulk request body in the newline-delimited JSON wire format.
//!
//! Each document contributes two lines: an `index` action naming the target
//! index and the document id, followed by the document itself.
//!
//! ```text
//! {"index":{"_index":"itinventory-equipments","_id":"42"}}
//! {"idEquipment":42,"type":"NOTEBOOK",...}
//! ```

use serde::Serialize;

use equipment_sync_shared::EquipmentDocument;

use crate::errors::SearchIndexError;

#[derive(Serialize)]
struct BulkAction<'a> {
    index: BulkActionMeta<'a>,
}

#[derive(Serialize)]
struct BulkActionMeta<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: &'a str,
}

/// A single action/document pair.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BulkEntry {
    action: String,
    document: String,
}

/// Ordered sequence of `index` operations for one bulk call.
///
/// The action is always `index`, so writing a document replaces any previous
/// document with the same `_id`; sending the same body twice leaves the index
/// in the same state as sending it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRequestBody {
    entries: Vec<BulkEntry>,
}

impl BulkRequestBody {
    /// Build a bulk body for the given documents.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the target index
    /// * `documents` - Documents to write, in order
    ///
    /// # Returns
    ///
    /// * `Ok(BulkRequestBody)` - The serialized operations
    /// * `Err(SearchIndexError)` - If a document cannot be serialized
    pub fn from_documents(
        index: &str,
        documents: &[EquipmentDocument],
    ) -> Result<Self, SearchIndexError> {
        let mut entries = Vec::with_capacity(documents.len());

        for doc in documents {
            let id = doc.document_id();
            let action = serde_json::to_string(&BulkAction {
                index: BulkActionMeta { index, id: &id },
            })
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;
            let document = serde_json::to_string(doc).map_err(|e| {
                SearchIndexError::serialization(format!("document {}: {}", id, e))
            })?;

            entries.push(BulkEntry { action, document });
        }

        Ok(Self { entries })
    }

    /// Number of documents in the body.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the body carries no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The body as individual lines, actions and documents interleaved.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| [entry.action.clone(), entry.document.clone()])
            .collect()
    }

    /// The full NDJSON payload, terminated by a trailing newline.
    pub fn to_ndjson(&self) -> String {
        let mut body = String::with_capacity(self.byte_len());
        for entry in &self.entries {
            body.push_str(&entry.action);
            body.push('\n');
            body.push_str(&entry.document);
            body.push('\n');
        }
        body
    }

    /// Size in bytes of the NDJSON payload.
    pub fn byte_len(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.action.len() + entry.document.len() + 2)
            .sum()
    }
}
