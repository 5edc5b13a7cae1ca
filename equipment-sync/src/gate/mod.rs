//! Dependency gate.
//!
//! Holds the run back until MySQL and the search service can be expected to
//! answer. The default is a fixed delay; probe mode polls each dependency with
//! exponential backoff instead.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use equipment_sync_repository::SearchIndexProvider;

use crate::errors::SyncError;

/// Lower bound on the interval between two probe attempts.
const MIN_PROBE_BACKOFF: Duration = Duration::from_millis(100);

/// Upper bound on the interval between two probe attempts.
const MAX_PROBE_BACKOFF: Duration = Duration::from_secs(30);

/// A dependency that can be asked whether it is ready.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Check the dependency once.
    async fn check(&self) -> Result<(), SyncError>;
}

/// Probe that pings the search service.
pub struct SearchIndexProbe {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchIndexProbe {
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ReadinessProbe for SearchIndexProbe {
    fn name(&self) -> &str {
        "search-index"
    }

    async fn check(&self) -> Result<(), SyncError> {
        self.provider.ping().await.map_err(SyncError::from)
    }
}

/// How the gate decided to let the run through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// The fixed delay elapsed; nothing was checked.
    Delayed,
    /// Every probe succeeded.
    Ready,
    /// Some probes never succeeded; the names are listed.
    Unconfirmed(Vec<String>),
}

enum GateMode {
    FixedDelay(Duration),
    Probe {
        probes: Vec<Arc<dyn ReadinessProbe>>,
        initial_backoff: Duration,
        max_attempts: u32,
    },
}

/// Blocks the pipeline until its dependencies are expected to be up.
///
/// The gate never fails the run: when probing gives up it logs a warning and
/// lets the run proceed, so the first real request reports the problem.
pub struct DependencyGate {
    mode: GateMode,
}

impl DependencyGate {
    /// Gate that sleeps for `delay` and proceeds.
    pub fn fixed_delay(delay: Duration) -> Self {
        Self {
            mode: GateMode::FixedDelay(delay),
        }
    }

    /// Gate that polls every probe until it answers or `max_attempts` is reached.
    ///
    /// The interval between attempts starts at `initial_backoff` (at least
    /// 100 ms) and doubles after each failure, capped at 30 seconds.
    pub fn probe(
        probes: Vec<Arc<dyn ReadinessProbe>>,
        initial_backoff: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            mode: GateMode::Probe {
                probes,
                initial_backoff: initial_backoff.clamp(MIN_PROBE_BACKOFF, MAX_PROBE_BACKOFF),
                max_attempts: max_attempts.max(1),
            },
        }
    }

    /// Wait for the dependencies.
    #[instrument(skip(self))]
    pub async fn wait(&self) -> Readiness {
        match &self.mode {
            GateMode::FixedDelay(delay) => {
                info!(delay_secs = delay.as_secs_f64(), "Waiting for dependencies");
                sleep(*delay).await;
                Readiness::Delayed
            }
            GateMode::Probe {
                probes,
                initial_backoff,
                max_attempts,
            } => {
                let mut unconfirmed = Vec::new();
                for probe in probes {
                    if !Self::poll(probe.as_ref(), *initial_backoff, *max_attempts).await {
                        unconfirmed.push(probe.name().to_string());
                    }
                }

                if unconfirmed.is_empty() {
                    info!("All dependencies ready");
                    Readiness::Ready
                } else {
                    warn!(
                        dependencies = ?unconfirmed,
                        "Dependencies not confirmed ready, proceeding anyway"
                    );
                    Readiness::Unconfirmed(unconfirmed)
                }
            }
        }
    }

    async fn poll(probe: &dyn ReadinessProbe, initial_backoff: Duration, max_attempts: u32) -> bool {
        let mut backoff = initial_backoff;

        for attempt in 1..=max_attempts {
            match probe.check().await {
                Ok(()) => {
                    debug!(dependency = probe.name(), attempt = attempt, "Dependency ready");
                    return true;
                }
                Err(e) if attempt < max_attempts => {
                    warn!(
                        dependency = probe.name(),
                        attempt = attempt,
                        max_attempts = max_attempts,
                        error = %e,
                        retry_in_ms = backoff.as_millis() as u64,
                        "Dependency not ready, retrying..."
                    );
                    sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_PROBE_BACKOFF);
                }
                Err(e) => {
                    warn!(
                        dependency = probe.name(),
                        attempts = max_attempts,
                        error = %e,
                        "Dependency still not ready"
                    );
                }
            }
        }

        false
    }
}
