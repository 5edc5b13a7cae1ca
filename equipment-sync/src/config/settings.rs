//! Runtime settings read from the environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::mysql::MySqlConnectOptions;
use tracing::warn;

/// Default MySQL host.
const DEFAULT_MYSQL_HOST: &str = "localhost";

/// Default MySQL port.
const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Default MySQL database.
const DEFAULT_MYSQL_DB: &str = "itinventory_equip";

/// Default MySQL user.
const DEFAULT_MYSQL_USER: &str = "root";

/// Default MySQL password.
const DEFAULT_MYSQL_PASSWORD: &str = "root";

/// Default search service URL.
const DEFAULT_ELASTIC_HOST: &str = "http://localhost:9200";

/// Default index name.
const DEFAULT_ELASTIC_INDEX: &str = "itinventory-equipments";

/// Default startup delay in seconds.
const DEFAULT_STARTUP_DELAY_SECS: u64 = 5;

/// Default number of probe attempts per dependency.
const DEFAULT_PROBE_MAX_ATTEMPTS: u32 = 10;

/// How the job waits for its dependencies before starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessMode {
    /// Sleep for a fixed delay, then proceed.
    FixedDelay,
    /// Poll each dependency with exponential backoff.
    Probe,
}

impl FromStr for ReadinessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed-delay" | "fixed_delay" | "delay" => Ok(Self::FixedDelay),
            "probe" => Ok(Self::Probe),
            other => Err(format!("unknown readiness mode '{}'", other)),
        }
    }
}

/// What to do when the index cannot be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisioningPolicy {
    /// Log the failure and carry on with extraction and loading.
    #[default]
    Continue,
    /// Stop the run with a provisioning error.
    Abort,
}

impl FromStr for ProvisioningPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" | "fail-fast" | "fail_fast" => Ok(Self::Abort),
            other => Err(format!("unknown provisioning policy '{}'", other)),
        }
    }
}

/// Connection settings for the relational source.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl SourceConfig {
    /// Connection options for a single MySQL connection.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Settings for the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub url: String,
    pub index: String,
}

/// Settings for the dependency gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessConfig {
    pub mode: ReadinessMode,
    /// Fixed delay, or the first backoff interval in probe mode.
    pub delay: Duration,
    /// Probe attempts per dependency.
    pub max_attempts: u32,
}

/// Complete configuration for one sync run.
///
/// Built once at startup and passed by reference to the dependency wiring;
/// components never read the environment themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub search: SearchConfig,
    pub readiness: ReadinessConfig,
    pub provisioning_policy: ProvisioningPolicy,
    /// Documents per bulk request; `None` sends everything at once.
    pub bulk_chunk_size: Option<usize>,
}

impl SyncConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MYSQL_HOST`: MySQL host (default: localhost)
    /// - `MYSQL_PORT`: MySQL port (default: 3306)
    /// - `MYSQL_DB`: Database name (default: itinventory_equip)
    /// - `MYSQL_USER`: User (default: root)
    /// - `MYSQL_PASSWORD`: Password (default: root)
    /// - `ELASTIC_HOST`: Search service URL (default: http://localhost:9200)
    /// - `ELASTIC_INDEX`: Index name (default: itinventory-equipments)
    /// - `SYNC_READINESS_MODE`: "fixed-delay" or "probe" (default: fixed-delay)
    /// - `SYNC_STARTUP_DELAY_SECS`: Fixed delay or first probe backoff (default: 5)
    /// - `SYNC_PROBE_MAX_ATTEMPTS`: Probe attempts per dependency (default: 10)
    /// - `SYNC_PROVISIONING_FAILURE`: "continue" or "abort" (default: continue)
    /// - `SYNC_BULK_CHUNK_SIZE`: Documents per bulk request (default: unset, single request)
    ///
    /// Invalid values are logged and replaced by their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let source = SourceConfig {
            host: text("MYSQL_HOST", DEFAULT_MYSQL_HOST),
            port: parsed(&lookup, "MYSQL_PORT", DEFAULT_MYSQL_PORT),
            database: text("MYSQL_DB", DEFAULT_MYSQL_DB),
            user: text("MYSQL_USER", DEFAULT_MYSQL_USER),
            password: lookup("MYSQL_PASSWORD")
                .unwrap_or_else(|| DEFAULT_MYSQL_PASSWORD.to_string()),
        };

        let search = SearchConfig {
            url: text("ELASTIC_HOST", DEFAULT_ELASTIC_HOST),
            index: text("ELASTIC_INDEX", DEFAULT_ELASTIC_INDEX),
        };

        let readiness = ReadinessConfig {
            mode: parsed(&lookup, "SYNC_READINESS_MODE", ReadinessMode::FixedDelay),
            delay: Duration::from_secs(parsed(
                &lookup,
                "SYNC_STARTUP_DELAY_SECS",
                DEFAULT_STARTUP_DELAY_SECS,
            )),
            max_attempts: positive(&lookup, "SYNC_PROBE_MAX_ATTEMPTS")
                .map(|n| n as u32)
                .unwrap_or(DEFAULT_PROBE_MAX_ATTEMPTS),
        };

        Self {
            source,
            search,
            readiness,
            provisioning_policy: parsed(
                &lookup,
                "SYNC_PROVISIONING_FAILURE",
                ProvisioningPolicy::default(),
            ),
            bulk_chunk_size: positive(&lookup, "SYNC_BULK_CHUNK_SIZE").map(|n| n as usize),
        }
    }
}

/// Parse a variable, falling back to `default` when unset or invalid.
fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Debug,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = key, value = %raw, default = ?default, "Invalid value, using default");
                default
            }
        },
    }
}

/// Parse a strictly positive integer; unset, zero or invalid yields `None`.
fn positive<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).filter(|v| !v.trim().is_empty())?;
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Some(n),
        _ => {
            warn!(key = key, value = %raw, "Expected a positive integer, ignoring");
            None
        }
    }
}
