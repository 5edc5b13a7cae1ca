//! Equipment Sync Main Entry Point
//!
//! Copies the active equipment rows from MySQL into the search index, then
//! exits.

use dotenv::dotenv;
use equipment_sync::orchestrator::SyncOutcome;
use equipment_sync::{Dependencies, SyncConfig, SyncError, SyncReport};
use std::env;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("equipment_sync=info,equipment_sync_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "equipment-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "equipment-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

fn log_report(report: &SyncReport) {
    match &report.outcome {
        SyncOutcome::NothingToDo => info!("Sync finished: nothing to do"),
        SyncOutcome::Loaded(outcome) if report.is_clean() => {
            info!(records = report.records, documents = outcome.items(), "Sync finished");
        }
        SyncOutcome::Loaded(outcome) => {
            warn!(
                records = report.records,
                provisioning = ?report.provisioning,
                outcome = ?outcome,
                "Sync finished with failures"
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), SyncError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let config = SyncConfig::from_env();

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.orchestrator.run().await {
        Ok(report) => {
            log_report(&report);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Equipment sync failed");
            Err(e)
        }
    }
}
