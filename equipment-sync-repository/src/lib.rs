//! # Equipment Sync Repository
//!
//! This crate provides the trait and implementation used to talk to the
//! equipment search index. It includes the index mapping, the bulk wire
//! format, classification of index-creation and bulk responses, search query
//! building, and a concrete implementation for OpenSearch.

pub mod bulk;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;
pub mod utils;

pub use bulk::BulkRequestBody;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BulkOutcome, IndexProvisioning};
pub use utils::truncate_body;
