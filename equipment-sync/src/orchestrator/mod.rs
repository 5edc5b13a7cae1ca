//! Orchestrator module for the equipment sync.
//!
//! Runs the gate, provisioning, extraction, transformation and load steps in
//! order, once.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use equipment_sync_repository::{BulkOutcome, IndexProvisioning, SearchIndexProvider};

use crate::config::ProvisioningPolicy;
use crate::errors::SyncError;
use crate::gate::{DependencyGate, Readiness};
use crate::loader::BulkLoader;
use crate::processor::EquipmentProcessor;
use crate::source::RecordSource;

/// Configuration for the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// What to do when the index cannot be created.
    pub provisioning_policy: ProvisioningPolicy,
}

/// How the load step ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// No active records were found; nothing was sent.
    NothingToDo,
    /// Documents were sent to the index.
    Loaded(BulkOutcome),
}

/// Summary of one sync run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub readiness: Readiness,
    pub provisioning: IndexProvisioning,
    /// Number of active records extracted.
    pub records: usize,
    pub outcome: SyncOutcome,
}

impl SyncReport {
    /// Whether the run ended without any failure to report.
    pub fn is_clean(&self) -> bool {
        self.provisioning.is_ready()
            && matches!(
                self.outcome,
                SyncOutcome::NothingToDo | SyncOutcome::Loaded(BulkOutcome::Success { .. })
            )
    }
}

/// Orchestrator that coordinates one sync run.
pub struct Orchestrator {
    gate: DependencyGate,
    provider: Arc<dyn SearchIndexProvider>,
    source: Arc<dyn RecordSource>,
    processor: EquipmentProcessor,
    loader: BulkLoader,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        gate: DependencyGate,
        provider: Arc<dyn SearchIndexProvider>,
        source: Arc<dyn RecordSource>,
        processor: EquipmentProcessor,
        loader: BulkLoader,
    ) -> Self {
        Self::with_config(
            gate,
            provider,
            source,
            processor,
            loader,
            OrchestratorConfig::default(),
        )
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        gate: DependencyGate,
        provider: Arc<dyn SearchIndexProvider>,
        source: Arc<dyn RecordSource>,
        processor: EquipmentProcessor,
        loader: BulkLoader,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            gate,
            provider,
            source,
            processor,
            loader,
            config,
        }
    }

    /// Run the sync to completion.
    ///
    /// Provisioning failures, partial bulk failures and rejected bulk requests
    /// are reported in the returned `SyncReport`. Errors are returned only for
    /// source failures, transport failures and, under the `Abort` policy, a
    /// failed index creation.
    #[instrument(skip(self), fields(index = %self.provider.index_name()))]
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        info!("Starting equipment sync");

        let readiness = self.gate.wait().await;
        let provisioning = self.provision().await?;

        let records = self.source.fetch_active_records().await?;
        if records.is_empty() {
            info!("No active equipment found, nothing to index");
            return Ok(SyncReport {
                readiness,
                provisioning,
                records: 0,
                outcome: SyncOutcome::NothingToDo,
            });
        }

        let documents = self.processor.process_batch(&records);
        let outcome = self.loader.load(&documents).await?;

        match &outcome {
            BulkOutcome::Success { items } => {
                info!(documents = items, "Indexed equipment documents");
            }
            BulkOutcome::PartialFailure { items, sample } => {
                warn!(
                    documents = items,
                    sample = %sample,
                    "Bulk load completed with item errors"
                );
            }
            BulkOutcome::RequestFailure { status, .. } => {
                error!(status = status, "Bulk load failed");
            }
        }

        Ok(SyncReport {
            readiness,
            provisioning,
            records: records.len(),
            outcome: SyncOutcome::Loaded(outcome),
        })
    }

    async fn provision(&self) -> Result<IndexProvisioning, SyncError> {
        let provisioning = self.provider.ensure_index_exists().await?;

        match &provisioning {
            IndexProvisioning::Created => info!("Index created"),
            IndexProvisioning::AlreadyExists => info!("Index already exists"),
            IndexProvisioning::Failed { status, body } => match self.config.provisioning_policy {
                ProvisioningPolicy::Continue => {
                    warn!(
                        status = status,
                        body = %body,
                        "Failed to create index, continuing"
                    );
                }
                ProvisioningPolicy::Abort => {
                    error!(status = status, body = %body, "Failed to create index");
                    return Err(SyncError::provisioning(format!(
                        "Index creation failed with status {}: {}",
                        status, body
                    )));
                }
            },
        }

        Ok(provisioning)
    }
}
