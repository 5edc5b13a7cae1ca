//! MySQL extractor.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Row};
use tracing::{debug, info, instrument, warn};

use equipment_sync_shared::EquipmentRecord;

use crate::errors::SyncError;
use crate::gate::ReadinessProbe;
use crate::source::RecordSource;

/// Query for the active equipment rows.
///
/// Integer columns are cast to `SIGNED` so they decode as `i64` whatever their
/// declared width, and columns are aliased to the record's field names.
pub const SELECT_ACTIVE_EQUIPMENT: &str = "SELECT \
     CAST(id_equipment AS SIGNED) AS id, \
     `type` AS equipment_type, \
     brand, \
     model, \
     asset_number, \
     status, \
     location, \
     responsible, \
     acquisition_date, \
     acquisition_value, \
     CAST(ativo AS SIGNED) AS active, \
     criado_em AS created_at, \
     atualizado_em AS updated_at, \
     CAST(id_categoria AS SIGNED) AS category_id, \
     CAST(id_filial_atual AS SIGNED) AS current_branch_id, \
     CAST(id_fornecedor AS SIGNED) AS supplier_id \
     FROM equipment \
     WHERE ativo = 1 \
     ORDER BY id_equipment";

/// Reads equipment from MySQL over a single connection per call.
///
/// No pool is kept; the connection is opened for the query and closed right
/// after, whether the query succeeded or not.
pub struct MySqlRecordSource {
    options: MySqlConnectOptions,
}

impl MySqlRecordSource {
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }

    async fn connect(&self) -> Result<MySqlConnection, SyncError> {
        self.options
            .connect()
            .await
            .map_err(|e| SyncError::connection(format!("Failed to connect to MySQL: {}", e)))
    }
}

#[async_trait]
impl RecordSource for MySqlRecordSource {
    #[instrument(skip(self))]
    async fn fetch_active_records(&self) -> Result<Vec<EquipmentRecord>, SyncError> {
        let conn = self.connect().await?;
        debug!("MySQL connection opened");

        extract(MySqlSession { conn }).await
    }
}

/// An open source connection used for a single extraction.
#[async_trait]
pub trait SourceSession: Send {
    /// Run the extraction query and decode every row.
    async fn fetch_records(&mut self) -> Result<Vec<EquipmentRecord>, SyncError>;

    /// Release the connection.
    async fn close(self) -> Result<(), SyncError>;
}

struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl SourceSession for MySqlSession {
    async fn fetch_records(&mut self) -> Result<Vec<EquipmentRecord>, SyncError> {
        let rows = sqlx::query(SELECT_ACTIVE_EQUIPMENT)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| SyncError::extraction(format!("Failed to read equipment: {}", e)))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn close(self) -> Result<(), SyncError> {
        self.conn
            .close()
            .await
            .map_err(|e| {
                SyncError::connection(format!("Failed to close MySQL connection: {}", e))
            })
    }
}

/// Fetch the records of `session`, then close it whatever the fetch returned.
///
/// A failure to close is logged and does not change the result. Inactive
/// records that slipped through the query are dropped.
pub async fn extract<S>(mut session: S) -> Result<Vec<EquipmentRecord>, SyncError>
where
    S: SourceSession,
{
    let result = session.fetch_records().await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "Failed to close source connection");
    }

    let records = result?;
    let fetched = records.len();
    let records = retain_active(records);
    if records.len() != fetched {
        warn!(
            dropped = fetched - records.len(),
            "Dropped inactive rows returned by the query"
        );
    }

    info!(records = records.len(), "Fetched active equipment");
    Ok(records)
}

#[async_trait]
impl ReadinessProbe for MySqlRecordSource {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn check(&self) -> Result<(), SyncError> {
        let mut conn = self.connect().await?;
        let result = conn
            .ping()
            .await
            .map_err(|e| SyncError::connection(format!("MySQL ping failed: {}", e)));

        if let Err(e) = conn.close().await {
            debug!(error = %e, "Failed to close MySQL probe connection");
        }

        result
    }
}

/// Decode one result row into a record.
fn record_from_row(row: &MySqlRow) -> Result<EquipmentRecord, SyncError> {
    let decode = |e: sqlx::Error| SyncError::extraction(format!("Invalid equipment row: {}", e));

    Ok(EquipmentRecord {
        id: row.try_get("id").map_err(decode)?,
        equipment_type: row.try_get("equipment_type").map_err(decode)?,
        brand: row.try_get("brand").map_err(decode)?,
        model: row.try_get("model").map_err(decode)?,
        asset_number: row.try_get("asset_number").map_err(decode)?,
        status: row.try_get("status").map_err(decode)?,
        location: row.try_get("location").map_err(decode)?,
        responsible: row.try_get("responsible").map_err(decode)?,
        acquisition_date: row.try_get("acquisition_date").map_err(decode)?,
        acquisition_value: row.try_get("acquisition_value").map_err(decode)?,
        active: row.try_get("active").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
        category_id: row.try_get("category_id").map_err(decode)?,
        current_branch_id: row.try_get("current_branch_id").map_err(decode)?,
        supplier_id: row.try_get("supplier_id").map_err(decode)?,
    })
}

/// Drop every record whose activity flag is zero, keeping order.
pub fn retain_active(records: Vec<EquipmentRecord>) -> Vec<EquipmentRecord> {
    records.into_iter().filter(EquipmentRecord::is_active).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Session returning a scripted fetch result and recording its close.
    struct MockSession {
        result: Option<Result<Vec<EquipmentRecord>, SyncError>>,
        close_fails: bool,
        closed: Arc<AtomicBool>,
    }

    impl MockSession {
        fn new(result: Result<Vec<EquipmentRecord>, SyncError>) -> (Self, Arc<AtomicBool>) {
            let closed = Arc::new(AtomicBool::new(false));
            let session = Self {
                result: Some(result),
                close_fails: false,
                closed: closed.clone(),
            };
            (session, closed)
        }
    }

    #[async_trait]
    impl SourceSession for MockSession {
        async fn fetch_records(&mut self) -> Result<Vec<EquipmentRecord>, SyncError> {
            self.result.take().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn close(self) -> Result<(), SyncError> {
            self.closed.store(true, Ordering::SeqCst);
            if self.close_fails {
                Err(SyncError::connection("connection reset"))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_extract_closes_connection_after_success() {
        let (session, closed) = MockSession::new(Ok(vec![
            EquipmentRecord::new(1, 1),
            EquipmentRecord::new(2, 1),
        ]));

        let records = extract(session).await.unwrap();

        assert_eq!(records.len(), 2);
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_extract_closes_connection_when_query_fails() {
        let (session, closed) =
            MockSession::new(Err(SyncError::extraction("Table 'equipment' doesn't exist")));

        let result = extract(session).await;

        assert!(matches!(result, Err(SyncError::ExtractionError(_))));
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_extract_ignores_close_failure() {
        let (mut session, closed) = MockSession::new(Ok(vec![EquipmentRecord::new(5, 1)]));
        session.close_fails = true;

        let records = extract(session).await.unwrap();

        assert_eq!(records.len(), 1);
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_extract_drops_inactive_records() {
        let (session, _closed) = MockSession::new(Ok(vec![
            EquipmentRecord::new(1, 1),
            EquipmentRecord::new(2, 0),
            EquipmentRecord::new(3, 1),
        ]));

        let ids: Vec<i64> = extract(session).await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_extract_empty_result_is_not_an_error() {
        let (session, closed) = MockSession::new(Ok(Vec::new()));

        assert!(extract(session).await.unwrap().is_empty());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_retain_active_drops_inactive_and_keeps_order() {
        let records = vec![
            EquipmentRecord::new(1, 1),
            EquipmentRecord::new(2, 0),
            EquipmentRecord::new(3, 1),
            EquipmentRecord::new(4, 0),
        ];

        let ids: Vec<i64> = retain_active(records).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_retain_active_empty() {
        assert!(retain_active(Vec::new()).is_empty());
    }

    #[test]
    fn test_query_filters_active_rows_in_id_order() {
        assert!(SELECT_ACTIVE_EQUIPMENT.contains("FROM equipment WHERE ativo = 1"));
        assert!(SELECT_ACTIVE_EQUIPMENT.ends_with("ORDER BY id_equipment"));
    }

    #[test]
    fn test_query_selects_every_record_column() {
        for column in [
            "AS id,",
            "AS equipment_type,",
            "brand,",
            "model,",
            "asset_number,",
            "status,",
            "location,",
            "responsible,",
            "acquisition_date,",
            "acquisition_value,",
            "AS active,",
            "AS created_at,",
            "AS updated_at,",
            "AS category_id,",
            "AS current_branch_id,",
            "AS supplier_id ",
        ] {
            assert!(
                SELECT_ACTIVE_EQUIPMENT.contains(column),
                "missing column {}",
                column
            );
        }
    }
}
