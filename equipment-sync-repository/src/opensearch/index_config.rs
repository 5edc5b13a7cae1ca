//! OpenSearch index configuration and mappings.
//!
//! This module defines the mapping of the equipment search index.

use serde_json::{json, Value};

/// Default name of the equipment index.
pub const DEFAULT_INDEX_NAME: &str = "itinventory-equipments";

/// Configuration for the search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The index name used for all operations.
    pub name: String,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_NAME)
    }
}

/// Get the mapping for the equipment search index.
///
/// The mapping includes:
/// - **keyword**: categorical and exact-match fields (`type`, `status`, `assetNumber`)
/// - **text + keyword**: free-text fields that can also be filtered exactly
///   through their `.keyword` sub-field
/// - **long / double / date / boolean**: identifiers, value, dates and the activity flag
pub fn get_index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "idEquipment": { "type": "long" },

                "type": { "type": "keyword" },
                "brand": text_with_keyword(),
                "model": text_with_keyword(),
                "assetNumber": { "type": "keyword" },
                "status": { "type": "keyword" },
                "location": text_with_keyword(),
                "responsible": text_with_keyword(),

                "acquisitionDate": { "type": "date" },
                "acquisitionValue": { "type": "double" },

                "active": { "type": "boolean" },
                "createdAt": { "type": "date" },
                "updatedAt": { "type": "date" },

                "categoryId": { "type": "long" },
                "currentBranchId": { "type": "long" },
                "supplierId": { "type": "long" }
            }
        }
    })
}

fn text_with_keyword() -> Value {
    json!({
        "type": "text",
        "fields": {
            "keyword": { "type": "keyword" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_structure() {
        let mapping = get_index_mapping();
        let properties = mapping["mappings"]["properties"].as_object().unwrap();

        assert_eq!(properties.len(), 16);
        assert_eq!(properties["idEquipment"]["type"], "long");
        assert_eq!(properties["acquisitionValue"]["type"], "double");
        assert_eq!(properties["active"]["type"], "boolean");
    }

    #[test]
    fn test_keyword_fields() {
        let mapping = get_index_mapping();
        let properties = &mapping["mappings"]["properties"];

        for field in ["type", "assetNumber", "status"] {
            assert_eq!(properties[field]["type"], "keyword", "field {}", field);
        }
    }

    #[test]
    fn test_text_fields_have_keyword_subfield() {
        let mapping = get_index_mapping();
        let properties = &mapping["mappings"]["properties"];

        for field in ["brand", "model", "location", "responsible"] {
            assert_eq!(properties[field]["type"], "text", "field {}", field);
            assert_eq!(
                properties[field]["fields"]["keyword"]["type"], "keyword",
                "field {}",
                field
            );
        }
    }

    #[test]
    fn test_date_and_long_fields() {
        let mapping = get_index_mapping();
        let properties = &mapping["mappings"]["properties"];

        for field in ["acquisitionDate", "createdAt", "updatedAt"] {
            assert_eq!(properties[field]["type"], "date", "field {}", field);
        }
        for field in ["categoryId", "currentBranchId", "supplierId"] {
            assert_eq!(properties[field]["type"], "long", "field {}", field);
        }
    }

    #[test]
    fn test_default_index_name() {
        assert_eq!(IndexConfig::default().name, "itinventory-equipments");
        assert_eq!(IndexConfig::new("custom").name, "custom");
    }
}
