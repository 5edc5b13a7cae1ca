//! Outcome types for search index operations.

use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::utils::{truncate_body, BULK_RESPONSE_SAMPLE_CHARS, INDEX_RESPONSE_SAMPLE_CHARS};

/// Error marker returned by the search service when the index is already there.
pub const INDEX_ALREADY_EXISTS_MARKER: &str = "resource_already_exists_exception";

/// Result of an index creation request.
///
/// Creation is idempotent: an index that already exists is accepted as-is,
/// whatever its mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexProvisioning {
    /// The index was created with the equipment mapping.
    Created,
    /// The index was already present and was left untouched.
    AlreadyExists,
    /// The service rejected the request for another reason.
    Failed {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },
}

impl IndexProvisioning {
    /// Classify an index creation response.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code of the response
    /// * `body` - Raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            200 | 201 => Self::Created,
            400 if body.contains(INDEX_ALREADY_EXISTS_MARKER) => Self::AlreadyExists,
            _ => Self::Failed {
                status,
                body: truncate_body(body, INDEX_RESPONSE_SAMPLE_CHARS),
            },
        }
    }

    /// Whether the index is usable after this outcome.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Created | Self::AlreadyExists)
    }
}

/// Result of a bulk write request.
///
/// Only the aggregate `errors` flag of the response is inspected; individual
/// item results are not examined.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    /// Every document was accepted.
    Success {
        /// Number of documents in the request.
        items: usize,
    },
    /// The request was accepted but at least one document failed.
    PartialFailure {
        /// Number of documents in the request.
        items: usize,
        /// Raw response, truncated for diagnosis.
        sample: String,
    },
    /// The request was rejected at the status level.
    RequestFailure {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, truncated for logging.
        body: String,
    },
}

impl BulkOutcome {
    /// Classify a bulk response.
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code of the response
    /// * `body` - Raw response body
    /// * `items` - Number of documents that were sent
    ///
    /// # Returns
    ///
    /// * `Ok(BulkOutcome)` - The classified outcome
    /// * `Err(SearchIndexError)` - If a successful status carries a body that is not JSON
    pub fn from_response(status: u16, body: &str, items: usize) -> Result<Self, SearchIndexError> {
        if status >= 300 {
            return Ok(Self::RequestFailure {
                status,
                body: truncate_body(body, BULK_RESPONSE_SAMPLE_CHARS),
            });
        }

        let payload: Value = serde_json::from_str(body)
            .map_err(|e| SearchIndexError::parse(format!("Invalid bulk response: {}", e)))?;

        let has_errors = payload
            .get("errors")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if has_errors {
            Ok(Self::PartialFailure {
                items,
                sample: truncate_body(body, BULK_RESPONSE_SAMPLE_CHARS),
            })
        } else {
            Ok(Self::Success { items })
        }
    }

    /// Number of documents covered by this outcome, zero for request failures.
    pub fn items(&self) -> usize {
        match self {
            Self::Success { items } | Self::PartialFailure { items, .. } => *items,
            Self::RequestFailure { .. } => 0,
        }
    }
}
