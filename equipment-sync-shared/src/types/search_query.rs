//! Search query types for the equipment index.
//!
//! This module defines the free-text and structured filter parameters used to
//! search synchronized equipment documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_SIZE: usize = 20;

/// Maximum page size.
const MAX_SIZE: usize = 100;

/// Search query parameters.
///
/// Every filter is optional; blank strings are treated as absent. Text is
/// matched with fuzziness against asset number, brand, model, responsible and
/// location, while the remaining fields narrow the result set without affecting
/// relevance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentSearchQuery {
    /// Free text, matched with typo tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Exact status (e.g. `EM_USO`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Exact equipment type (e.g. `NOTEBOOK`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,

    /// Exact location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Lower bound for the acquisition value, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,

    /// Upper bound for the acquisition value, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,

    /// Earliest acquisition date, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    /// Latest acquisition date, inclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,

    /// Zero-based page number.
    #[serde(default)]
    pub page: usize,

    /// Page size, between 1 and 100.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

impl Default for EquipmentSearchQuery {
    fn default() -> Self {
        Self {
            text: None,
            status: None,
            equipment_type: None,
            location: None,
            min_value: None,
            max_value: None,
            date_from: None,
            date_to: None,
            page: 0,
            size: DEFAULT_SIZE,
        }
    }
}

impl EquipmentSearchQuery {
    /// Create a free-text query.
    ///
    /// # Example
    ///
    /// ```
    /// use equipment_sync_shared::EquipmentSearchQuery;
    ///
    /// let query = EquipmentSearchQuery::text("latitude").with_status("EM_USO");
    /// assert_eq!(query.size, 20);
    /// ```
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create a query with no text, matching every document before filters.
    pub fn filters_only() -> Self {
        Self::default()
    }

    /// Restrict to a status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Restrict to an equipment type.
    pub fn with_type(mut self, equipment_type: impl Into<String>) -> Self {
        self.equipment_type = Some(equipment_type.into());
        self
    }

    /// Restrict to a location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Restrict the acquisition value range.
    pub fn with_value_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Restrict the acquisition date range.
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Set the page and page size.
    pub fn with_page(mut self, page: usize, size: usize) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    /// Page size clamped to `1..=100`.
    pub fn effective_size(&self) -> usize {
        self.size.clamp(1, MAX_SIZE)
    }

    /// Offset of the first hit of the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.effective_size())
    }

    /// Trimmed free text, if any non-blank text was given.
    pub fn text_terms(&self) -> Option<&str> {
        non_blank(&self.text)
    }

    /// Trimmed status filter.
    pub fn status_filter(&self) -> Option<&str> {
        non_blank(&self.status)
    }

    /// Trimmed type filter.
    pub fn type_filter(&self) -> Option<&str> {
        non_blank(&self.equipment_type)
    }

    /// Trimmed location filter.
    pub fn location_filter(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(format!("min_value {} is greater than max_value {}", min, max));
            }
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(format!("date_from {} is after date_to {}", from, to));
            }
        }

        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
