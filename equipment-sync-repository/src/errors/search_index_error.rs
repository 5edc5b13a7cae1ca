//! Search index error types.
//!
//! This module defines the unified error type for all search index operations.

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait for every backend call. Responses
/// that reached the server and carry a status code are not errors: they are
/// classified into `IndexProvisioning` or `BulkOutcome`. These variants cover
/// the cases where no usable response came back.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., inconsistent search filters).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Index creation request could not be sent.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Bulk request could not be sent.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Search request failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// Failed to parse response from search index backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the search index backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}
