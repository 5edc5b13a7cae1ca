//! Equipment record as read from the relational source.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

/// One row of the `equipment` table.
///
/// Records are read-only snapshots valid for a single sync run. The `active`
/// flag keeps the integer representation the database stores it in; it is
/// truthy when non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentRecord {
    pub id: i64,
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub asset_number: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub responsible: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    pub acquisition_value: Option<BigDecimal>,
    pub active: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub category_id: Option<i64>,
    pub current_branch_id: Option<i64>,
    pub supplier_id: Option<i64>,
}

impl EquipmentRecord {
    /// Create a record with only the identifier and activity flag set.
    ///
    /// Every other column starts out as `NULL`.
    pub fn new(id: i64, active: i64) -> Self {
        Self {
            id,
            equipment_type: None,
            brand: None,
            model: None,
            asset_number: None,
            status: None,
            location: None,
            responsible: None,
            acquisition_date: None,
            acquisition_value: None,
            active,
            created_at: None,
            updated_at: None,
            category_id: None,
            current_branch_id: None,
            supplier_id: None,
        }
    }

    /// Whether the record is logically active.
    pub fn is_active(&self) -> bool {
        self.active != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_null_columns() {
        let record = EquipmentRecord::new(7, 1);

        assert_eq!(record.id, 7);
        assert!(record.brand.is_none());
        assert!(record.acquisition_date.is_none());
        assert!(record.acquisition_value.is_none());
        assert!(record.supplier_id.is_none());
    }

    #[test]
    fn test_is_active() {
        assert!(EquipmentRecord::new(1, 1).is_active());
        assert!(EquipmentRecord::new(1, -1).is_active());
        assert!(!EquipmentRecord::new(1, 0).is_active());
    }
}
