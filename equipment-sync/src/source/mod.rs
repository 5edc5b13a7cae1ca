//! Relational source of equipment records.

mod mysql;

pub use mysql::{
    extract, retain_active, MySqlRecordSource, SourceSession, SELECT_ACTIVE_EQUIPMENT,
};

use async_trait::async_trait;
use equipment_sync_shared::EquipmentRecord;

use crate::errors::SyncError;

/// Reads the active equipment records for one run.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every active record, ordered by identifier.
    ///
    /// An empty table yields an empty vector, not an error.
    async fn fetch_active_records(&self) -> Result<Vec<EquipmentRecord>, SyncError>;
}
