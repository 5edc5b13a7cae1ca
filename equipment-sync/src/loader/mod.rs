//! Loader module for the equipment sync.
//!
//! Writes documents into the search index with bulk `index` requests.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use equipment_sync_repository::{BulkOutcome, BulkRequestBody, SearchIndexProvider};
use equipment_sync_shared::EquipmentDocument;

use crate::errors::SyncError;

/// Configuration for the bulk loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Maximum documents per bulk request; `None` sends all in one request.
    pub chunk_size: Option<usize>,
}

/// Loader that indexes documents into the search engine.
///
/// Documents are written with their identifier as `_id`, so loading the same
/// set twice overwrites rather than duplicates.
pub struct BulkLoader {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new bulk loader that sends everything in one request.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new bulk loader with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        Self { provider, config }
    }

    /// Load documents into the index.
    ///
    /// With a chunk size, chunks are sent in order and their outcomes are
    /// combined: the first rejected request stops the load and is returned;
    /// otherwise any partial failure is returned with the first sample seen;
    /// otherwise the load succeeded.
    ///
    /// # Returns
    ///
    /// * `Ok(BulkOutcome)` - The classified outcome
    /// * `Err(SyncError)` - On transport errors or an unreadable response
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn load(&self, documents: &[EquipmentDocument]) -> Result<BulkOutcome, SyncError> {
        let chunk_size = self
            .config
            .chunk_size
            .filter(|size| *size > 0)
            .unwrap_or(documents.len())
            .max(1);
        let index = self.provider.index_name();

        let mut sent = 0;
        let mut first_sample: Option<String> = None;

        for (chunk_number, chunk) in documents.chunks(chunk_size).enumerate() {
            let body = BulkRequestBody::from_documents(index, chunk)?;
            debug!(
                chunk = chunk_number,
                documents = body.len(),
                bytes = body.byte_len(),
                "Sending bulk request"
            );

            match self.provider.bulk_index(&body).await? {
                BulkOutcome::Success { items } => {
                    sent += items;
                }
                BulkOutcome::PartialFailure { items, sample } => {
                    warn!(chunk = chunk_number, "Bulk request reported item errors");
                    sent += items;
                    first_sample.get_or_insert(sample);
                }
                BulkOutcome::RequestFailure { status, body } => {
                    error!(
                        chunk = chunk_number,
                        status = status,
                        body = %body,
                        "Bulk request rejected"
                    );
                    return Ok(BulkOutcome::RequestFailure { status, body });
                }
            }
        }

        match first_sample {
            Some(sample) => Ok(BulkOutcome::PartialFailure {
                items: sent,
                sample,
            }),
            None => {
                info!(documents = sent, "Bulk load completed");
                Ok(BulkOutcome::Success { items: sent })
            }
        }
    }
}
