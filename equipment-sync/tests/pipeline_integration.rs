//! Integration tests for the equipment sync pipeline.
//!
//! These tests use the real Orchestrator, processor and loader with mock
//! dependencies (RecordSource and SearchIndexProvider) standing in for MySQL
//! and the search service.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde_json::Value;

use equipment_sync::config::ProvisioningPolicy;
use equipment_sync::errors::SyncError;
use equipment_sync::gate::{DependencyGate, Readiness, ReadinessProbe, SearchIndexProbe};
use equipment_sync::loader::{BulkLoader, LoaderConfig};
use equipment_sync::orchestrator::{Orchestrator, OrchestratorConfig, SyncOutcome};
use equipment_sync::processor::EquipmentProcessor;
use equipment_sync::source::RecordSource;
use equipment_sync_repository::{
    BulkOutcome, BulkRequestBody, IndexProvisioning, SearchIndexError, SearchIndexProvider,
};
use equipment_sync_shared::{EquipmentDocument, EquipmentRecord, EquipmentSearchQuery};

const INDEX: &str = "itinventory-equipments";

// Mock search service answering with raw HTTP status codes and bodies
struct MockSearchService {
    create_status: u16,
    create_body: String,
    bulk_status: u16,
    bulk_body: String,
    reachable: bool,
    payloads: Mutex<Vec<String>>,
}

impl MockSearchService {
    fn new() -> Self {
        Self {
            create_status: 200,
            create_body: r#"{"acknowledged":true}"#.to_string(),
            bulk_status: 200,
            bulk_body: r#"{"took":5,"errors":false,"items":[]}"#.to_string(),
            reachable: true,
            payloads: Mutex::new(Vec::new()),
        }
    }

    fn with_create_response(mut self, status: u16, body: &str) -> Self {
        self.create_status = status;
        self.create_body = body.to_string();
        self
    }

    fn with_bulk_response(mut self, status: u16, body: &str) -> Self {
        self.bulk_status = status;
        self.bulk_body = body.to_string();
        self
    }

    fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndexProvider for MockSearchService {
    fn index_name(&self) -> &str {
        INDEX
    }

    async fn ping(&self) -> Result<(), SearchIndexError> {
        if self.reachable {
            Ok(())
        } else {
            Err(SearchIndexError::connection("connection refused"))
        }
    }

    async fn ensure_index_exists(&self) -> Result<IndexProvisioning, SearchIndexError> {
        if !self.reachable {
            return Err(SearchIndexError::index_creation("connection refused"));
        }
        Ok(IndexProvisioning::from_response(
            self.create_status,
            &self.create_body,
        ))
    }

    async fn bulk_index(&self, body: &BulkRequestBody) -> Result<BulkOutcome, SearchIndexError> {
        if !self.reachable {
            return Err(SearchIndexError::bulk_index("connection refused"));
        }
        self.payloads.lock().unwrap().push(body.to_ndjson());
        BulkOutcome::from_response(self.bulk_status, &self.bulk_body, body.len())
    }

    async fn search(
        &self,
        _query: &EquipmentSearchQuery,
    ) -> Result<Vec<EquipmentDocument>, SearchIndexError> {
        Ok(Vec::new())
    }
}

// Mock MySQL source
struct MockSource {
    records: Vec<EquipmentRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockSource {
    fn new(records: Vec<EquipmentRecord>) -> Self {
        Self {
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn fetch_active_records(&self) -> Result<Vec<EquipmentRecord>, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SyncError::connection("Access denied for user 'root'"));
        }
        Ok(self.records.clone())
    }
}

fn notebook_42() -> EquipmentRecord {
    EquipmentRecord {
        id: 42,
        equipment_type: Some("NOTEBOOK".to_string()),
        brand: Some("Dell".to_string()),
        model: Some("Latitude 5420".to_string()),
        asset_number: Some("INV-00042".to_string()),
        status: Some("EM_USO".to_string()),
        location: Some("Matriz – TI".to_string()),
        responsible: Some("Ana Souza".to_string()),
        acquisition_date: NaiveDate::from_ymd_opt(2023, 1, 15),
        acquisition_value: Some(BigDecimal::from_str("1999.90").unwrap()),
        active: 1,
        created_at: NaiveDate::from_ymd_opt(2023, 1, 16).and_then(|d| d.and_hms_opt(9, 0, 0)),
        updated_at: None,
        category_id: Some(2),
        current_branch_id: Some(1),
        supplier_id: Some(7),
    }
}

fn build(
    service: Arc<MockSearchService>,
    source: Arc<MockSource>,
    policy: ProvisioningPolicy,
    chunk_size: Option<usize>,
) -> Orchestrator {
    Orchestrator::with_config(
        DependencyGate::fixed_delay(Duration::ZERO),
        service.clone(),
        source,
        EquipmentProcessor::new(),
        BulkLoader::with_config(service, LoaderConfig { chunk_size }),
        OrchestratorConfig {
            provisioning_policy: policy,
        },
    )
}

#[tokio::test]
async fn test_full_sync_writes_expected_bulk_body() {
    let service = Arc::new(MockSearchService::new());
    let source = Arc::new(MockSource::new(vec![notebook_42()]));

    let report = build(service.clone(), source, ProvisioningPolicy::Continue, None)
        .run()
        .await
        .unwrap();

    assert_eq!(report.provisioning, IndexProvisioning::Created);
    assert_eq!(report.records, 1);
    assert!(report.is_clean());

    let payloads = service.payloads();
    assert_eq!(payloads.len(), 1);

    let lines: Vec<&str> = payloads[0].lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        r#"{"index":{"_index":"itinventory-equipments","_id":"42"}}"#
    );

    let doc: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(doc["idEquipment"], 42);
    assert_eq!(doc["acquisitionDate"], "2023-01-15");
    assert_eq!(doc["acquisitionValue"], 1999.9);
    assert_eq!(doc["active"], true);
    assert_eq!(doc["createdAt"], "2023-01-16T09:00:00");
    assert_eq!(doc["updatedAt"], Value::Null);
    assert_eq!(doc["location"], "Matriz – TI");
    assert!(payloads[0].ends_with('\n'));
}

#[tokio::test]
async fn test_empty_source_sends_nothing() {
    let service = Arc::new(MockSearchService::new());
    let source = Arc::new(MockSource::new(vec![]));

    let report = build(service.clone(), source, ProvisioningPolicy::Continue, None)
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome, SyncOutcome::NothingToDo);
    assert!(service.payloads().is_empty());
}

#[tokio::test]
async fn test_existing_index_is_reused() {
    let service = Arc::new(MockSearchService::new().with_create_response(
        400,
        r#"{"error":{"type":"resource_already_exists_exception"},"status":400}"#,
    ));
    let source = Arc::new(MockSource::new(vec![notebook_42()]));

    let report = build(service.clone(), source, ProvisioningPolicy::Continue, None)
        .run()
        .await
        .unwrap();

    assert_eq!(report.provisioning, IndexProvisioning::AlreadyExists);
    assert_eq!(service.payloads().len(), 1);
}

#[tokio::test]
async fn test_item_errors_are_reported_as_partial_failure() {
    let bulk_body = r#"{"took":5,"errors":true,"items":[{"index":{"_id":"42","status":400}}]}"#;
    let service = Arc::new(MockSearchService::new().with_bulk_response(200, bulk_body));
    let source = Arc::new(MockSource::new(vec![notebook_42()]));

    let report = build(service, source, ProvisioningPolicy::Continue, None)
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        SyncOutcome::Loaded(BulkOutcome::PartialFailure {
            items: 1,
            sample: bulk_body.to_string(),
        })
    );
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_rejected_bulk_request_is_reported() {
    let service = Arc::new(
        MockSearchService::new().with_bulk_response(400, r#"{"error":"illegal_argument"}"#),
    );
    let source = Arc::new(MockSource::new(vec![notebook_42()]));

    let report = build(service, source, ProvisioningPolicy::Continue, None)
        .run()
        .await
        .unwrap();

    assert!(matches!(
        report.outcome,
        SyncOutcome::Loaded(BulkOutcome::RequestFailure { status: 400, .. })
    ));
}

#[tokio::test]
async fn test_source_failure_aborts_run() {
    let service = Arc::new(MockSearchService::new());
    let source = Arc::new(MockSource::failing());

    let result = build(service.clone(), source, ProvisioningPolicy::Continue, None)
        .run()
        .await;

    assert!(matches!(result, Err(SyncError::ConnectionError(_))));
    assert!(service.payloads().is_empty());
}

#[tokio::test]
async fn test_transport_failure_aborts_run() {
    let service = Arc::new(MockSearchService::new().unreachable());
    let source = Arc::new(MockSource::new(vec![notebook_42()]));

    let result = build(service, source.clone(), ProvisioningPolicy::Continue, None)
        .run()
        .await;

    assert!(matches!(result, Err(SyncError::SearchIndex(_))));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rerun_produces_identical_payloads() {
    let service = Arc::new(MockSearchService::new());
    let records = vec![notebook_42(), EquipmentRecord::new(43, 1)];

    for _ in 0..2 {
        let source = Arc::new(MockSource::new(records.clone()));
        build(service.clone(), source, ProvisioningPolicy::Continue, None)
            .run()
            .await
            .unwrap();
    }

    let payloads = service.payloads();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
}

#[tokio::test]
async fn test_chunked_sync_splits_requests() {
    let service = Arc::new(MockSearchService::new());
    let records: Vec<EquipmentRecord> = (1..=5).map(|id| EquipmentRecord::new(id, 1)).collect();
    let source = Arc::new(MockSource::new(records));

    let report = build(service.clone(), source, ProvisioningPolicy::Continue, Some(2))
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.outcome,
        SyncOutcome::Loaded(BulkOutcome::Success { items: 5 })
    );
    let line_counts: Vec<usize> = service
        .payloads()
        .iter()
        .map(|p| p.lines().count())
        .collect();
    assert_eq!(line_counts, vec![4, 4, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_probe_gate_reports_unreachable_search_service() {
    let service = Arc::new(MockSearchService::new().unreachable());
    let probes: Vec<Arc<dyn ReadinessProbe>> =
        vec![Arc::new(SearchIndexProbe::new(service.clone()))];
    let gate = DependencyGate::probe(probes, Duration::from_millis(10), 2);

    assert_eq!(
        gate.wait().await,
        Readiness::Unconfirmed(vec!["search-index".to_string()])
    );
}
