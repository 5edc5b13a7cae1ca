//! Error types for the equipment sync repository.
//!
//! This module provides a unified error type for all search index operations.

mod search_index_error;

pub use search_index_error::SearchIndexError;
