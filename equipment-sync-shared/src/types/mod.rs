//! This module defines the core data structures used across the equipment sync.
//! It re-exports the record, document and search query types.

pub mod equipment_document;
pub mod equipment_record;
pub mod search_query;

pub use equipment_document::EquipmentDocument;
pub use equipment_record::EquipmentRecord;
pub use search_query::EquipmentSearchQuery;
