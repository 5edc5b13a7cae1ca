//! Equipment processor implementation.
//!
//! Transforms `EquipmentRecord` rows into `EquipmentDocument` structures for
//! indexing.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, instrument, warn};

use equipment_sync_shared::{EquipmentDocument, EquipmentRecord};

/// Processor that transforms equipment records into search documents.
///
/// The conversion is total: every record yields a document. Missing columns
/// stay `null`, dates become ISO-8601 strings, the decimal value becomes a
/// float and the activity flag becomes a boolean.
#[derive(Debug, Default, Clone, Copy)]
pub struct EquipmentProcessor;

impl EquipmentProcessor {
    /// Create a new equipment processor.
    pub fn new() -> Self {
        Self
    }

    /// Process a batch of records, preserving their order.
    #[instrument(skip(self, records), fields(record_count = records.len()))]
    pub fn process_batch(&self, records: &[EquipmentRecord]) -> Vec<EquipmentDocument> {
        let documents: Vec<EquipmentDocument> =
            records.iter().map(|record| self.to_document(record)).collect();

        debug!(document_count = documents.len(), "Processed record batch");
        documents
    }

    /// Convert a single record.
    pub fn to_document(&self, record: &EquipmentRecord) -> EquipmentDocument {
        EquipmentDocument {
            id_equipment: record.id,
            equipment_type: record.equipment_type.clone(),
            brand: record.brand.clone(),
            model: record.model.clone(),
            asset_number: record.asset_number.clone(),
            status: record.status.clone(),
            location: record.location.clone(),
            responsible: record.responsible.clone(),
            acquisition_date: record.acquisition_date.as_ref().map(format_date),
            acquisition_value: record.acquisition_value.as_ref().and_then(decimal_to_f64),
            active: record.is_active(),
            created_at: record.created_at.as_ref().map(format_datetime),
            updated_at: record.updated_at.as_ref().map(format_datetime),
            category_id: record.category_id,
            current_branch_id: record.current_branch_id,
            supplier_id: record.supplier_id,
        }
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS`.
///
/// Microseconds are appended as `.ffffff` only when the sub-second part is
/// non-zero.
pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.nanosecond() == 0 {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn decimal_to_f64(value: &BigDecimal) -> Option<f64> {
    match value.to_string().parse::<f64>() {
        Ok(converted) if converted.is_finite() => Some(converted),
        Ok(_) => {
            warn!(value = %value, "Decimal value out of range for a double, writing null");
            None
        }
        Err(e) => {
            warn!(value = %value, error = %e, "Unreadable decimal value, writing null");
            None
        }
    }
}
