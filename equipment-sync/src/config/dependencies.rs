//! Dependency initialization and wiring for the equipment sync.

use std::sync::Arc;
use tracing::info;

use equipment_sync_repository::opensearch::IndexConfig;
use equipment_sync_repository::{OpenSearchProvider, SearchIndexProvider};

use crate::config::{ReadinessMode, SyncConfig};
use crate::gate::{DependencyGate, ReadinessProbe, SearchIndexProbe};
use crate::loader::{BulkLoader, LoaderConfig};
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::processor::EquipmentProcessor;
use crate::source::{MySqlRecordSource, RecordSource};
use crate::SyncError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build every component from the configuration.
    ///
    /// Nothing is contacted here: the search client only parses its URL and
    /// the MySQL connection is opened later, during extraction.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SyncError)` - If the search service URL is invalid
    pub async fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        info!(
            mysql_host = %config.source.host,
            mysql_port = config.source.port,
            mysql_db = %config.source.database,
            search_url = %config.search.url,
            index = %config.search.index,
            readiness_mode = ?config.readiness.mode,
            provisioning_policy = ?config.provisioning_policy,
            bulk_chunk_size = ?config.bulk_chunk_size,
            "Initializing dependencies"
        );

        let provider: Arc<dyn SearchIndexProvider> = Arc::new(
            OpenSearchProvider::new(
                &config.search.url,
                IndexConfig::new(config.search.index.clone()),
            )
            .await
            .map_err(|e| {
                SyncError::config(format!("Failed to create search provider: {}", e))
            })?,
        );

        let mysql = Arc::new(MySqlRecordSource::new(config.source.connect_options()));

        let gate = match config.readiness.mode {
            ReadinessMode::FixedDelay => DependencyGate::fixed_delay(config.readiness.delay),
            ReadinessMode::Probe => {
                let probes: Vec<Arc<dyn ReadinessProbe>> = vec![
                    mysql.clone(),
                    Arc::new(SearchIndexProbe::new(provider.clone())),
                ];
                DependencyGate::probe(
                    probes,
                    config.readiness.delay,
                    config.readiness.max_attempts,
                )
            }
        };

        let source: Arc<dyn RecordSource> = mysql;

        let loader = BulkLoader::with_config(
            provider.clone(),
            LoaderConfig {
                chunk_size: config.bulk_chunk_size,
            },
        );

        let orchestrator = Orchestrator::with_config(
            gate,
            provider,
            source,
            EquipmentProcessor::new(),
            loader,
            OrchestratorConfig {
                provisioning_policy: config.provisioning_policy,
            },
        );

        Ok(Self { orchestrator })
    }
}
