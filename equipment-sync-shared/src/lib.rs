//! # Equipment Sync Shared
//!
//! This crate defines the data structures shared across the equipment sync job:
//! the record read from the relational source, the document written to the
//! search index, and the query used to search that index.

pub mod types;

pub use types::equipment_document::EquipmentDocument;
pub use types::equipment_record::EquipmentRecord;
pub use types::search_query::EquipmentSearchQuery;
