//! Error types for the equipment sync.

use equipment_sync_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can abort a sync run.
///
/// Outcomes the job reports and moves past (a rejected index creation under the
/// default policy, a partially failed or rejected bulk request) are not errors;
/// they are carried in the `SyncReport`.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The relational source could not be reached or refused the credentials.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The extraction query failed or returned rows that could not be decoded.
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Index creation was rejected and the provisioning policy is `abort`.
    #[error("Provisioning error: {0}")]
    ProvisioningError(String),

    /// Transport or protocol error from the search index.
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),
}

impl SyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an extraction error.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::ExtractionError(msg.into())
    }

    /// Create a provisioning error.
    pub fn provisioning(msg: impl Into<String>) -> Self {
        Self::ProvisioningError(msg.into())
    }
}
