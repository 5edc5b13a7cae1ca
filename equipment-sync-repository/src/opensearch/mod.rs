//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend. The same wire API is served by
//! Elasticsearch, so the provider works against either.

mod index_config;
mod provider;
mod queries;

pub use index_config::{get_index_mapping, IndexConfig, DEFAULT_INDEX_NAME};
pub use provider::OpenSearchProvider;
pub use queries::{build_search_query, parse_search_hits};
