//! Equipment document types for the search index.
//!
//! This module defines the document structure that is indexed in the search engine.

use serde::{Deserialize, Serialize};

/// Document representation of an equipment in the search index.
///
/// Field names are serialized in camelCase to match the index mapping. Absent
/// values are written as explicit `null`s so that re-indexing a record always
/// overwrites every field of the previous version.
///
/// # Fields
///
/// - `id_equipment`: Identifier of the equipment, also used as the document `_id`
/// - `acquisition_date`: `YYYY-MM-DD`
/// - `created_at` / `updated_at`: ISO-8601 local date-times
/// - `acquisition_value`: Purchase value as a double
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDocument {
    pub id_equipment: i64,
    #[serde(rename = "type")]
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub asset_number: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub responsible: Option<String>,
    pub acquisition_date: Option<String>,
    pub acquisition_value: Option<f64>,
    pub active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub category_id: Option<i64>,
    pub current_branch_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl EquipmentDocument {
    /// Generate the document ID used in the search index.
    pub fn document_id(&self) -> String {
        self.id_equipment.to_string()
    }
}
