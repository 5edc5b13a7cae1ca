//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::IndicesCreateParts,
    BulkParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use equipment_sync_shared::{EquipmentDocument, EquipmentSearchQuery};

use crate::bulk::BulkRequestBody;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_mapping, IndexConfig};
use crate::opensearch::queries::{build_search_query, parse_search_hits};
use crate::types::{BulkOutcome, IndexProvisioning};

/// OpenSearch provider implementation.
///
/// Writes equipment documents to a single index and searches it.
///
/// # Example
///
/// ```ignore
/// use equipment_sync_repository::opensearch::IndexConfig;
/// let config = IndexConfig::new("itinventory-equipments");
/// let provider = OpenSearchProvider::new("http://localhost:9200", config).await?;
///
/// // Creates the index unless it already exists
/// let provisioning = provider.ensure_index_exists().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// No request is sent; the URL is only parsed and the transport built.
    ///
    /// # Arguments
    ///
    /// * `url` - The search service URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing the index name
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %index_config.name,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    fn index_name(&self) -> &str {
        &self.index_config.name
    }

    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping returned status {}",
                status
            )));
        }

        Ok(())
    }

    /// Create the index with the equipment mapping.
    ///
    /// The request is always sent; an "already exists" rejection is reported as
    /// `IndexProvisioning::AlreadyExists` rather than as an error.
    #[instrument(skip(self), fields(index = %self.index_config.name))]
    async fn ensure_index_exists(&self) -> Result<IndexProvisioning, SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index_config.name))
            .body(get_index_mapping())
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let provisioning = IndexProvisioning::from_response(status, &body);
        debug!(status = status, outcome = ?provisioning, "Index creation response");
        Ok(provisioning)
    }

    /// Send every operation of `body` in one `_bulk` request.
    #[instrument(skip(self, body), fields(documents = body.len(), bytes = body.byte_len()))]
    async fn bulk_index(&self, body: &BulkRequestBody) -> Result<BulkOutcome, SearchIndexError> {
        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body.lines())
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        debug!(status = status, "Bulk response received");
        BulkOutcome::from_response(status, &text, body.len())
    }

    async fn search(
        &self,
        query: &EquipmentSearchQuery,
    ) -> Result<Vec<EquipmentDocument>, SearchIndexError> {
        query.validate().map_err(SearchIndexError::validation)?;

        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_config.name]))
            .body(build_search_query(query))
            .send()
            .await
            .map_err(|e| SearchIndexError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        parse_search_hits(&payload)
    }
}
