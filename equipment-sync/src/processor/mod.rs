//! Processor module for the equipment sync.
//!
//! Transforms equipment records into search documents.

mod equipment_processor;

pub use equipment_processor::{format_date, format_datetime, EquipmentProcessor};
