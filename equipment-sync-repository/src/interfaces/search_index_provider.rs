//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use equipment_sync_shared::{EquipmentDocument, EquipmentSearchQuery};

use crate::bulk::BulkRequestBody;
use crate::errors::SearchIndexError;
use crate::types::{BulkOutcome, IndexProvisioning};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the sync pipeline as trait objects so that
/// the pipeline can be exercised against mock backends.
///
/// Responses that reach the server are reported through `IndexProvisioning` and
/// `BulkOutcome`; `Err(SearchIndexError)` is reserved for transport failures and
/// unreadable responses.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Name of the index this provider writes to.
    fn index_name(&self) -> &str;

    /// Check that the backend answers.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the backend responded with a success status
    /// * `Err(SearchIndexError)` - If it is unreachable or unhealthy
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Create the index with the equipment mapping unless it already exists.
    ///
    /// An existing index is accepted without comparing or migrating its mapping.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexProvisioning)` - Created, already existing, or rejected with details
    /// * `Err(SearchIndexError)` - If the request could not be sent
    async fn ensure_index_exists(&self) -> Result<IndexProvisioning, SearchIndexError>;

    /// Send a bulk body in a single request.
    ///
    /// # Arguments
    ///
    /// * `body` - The `index` operations to send
    ///
    /// # Returns
    ///
    /// * `Ok(BulkOutcome)` - Success, partial failure, or request-level failure
    /// * `Err(SearchIndexError)` - If the request could not be sent or the response is unreadable
    async fn bulk_index(&self, body: &BulkRequestBody) -> Result<BulkOutcome, SearchIndexError>;

    /// Search the index by free text and structured filters.
    ///
    /// # Arguments
    ///
    /// * `query` - Text, filters and paging
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<EquipmentDocument>)` - Matching documents ordered by relevance
    /// * `Err(SearchIndexError)` - If the query is invalid or the search fails
    async fn search(
        &self,
        query: &EquipmentSearchQuery,
    ) -> Result<Vec<EquipmentDocument>, SearchIndexError>;
}
