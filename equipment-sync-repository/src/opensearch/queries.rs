//! OpenSearch query builders.
//!
//! This module builds search requests for the equipment index and reads the
//! documents back out of search responses.

use serde_json::{json, Map, Value};

use equipment_sync_shared::{EquipmentDocument, EquipmentSearchQuery};

use crate::errors::SearchIndexError;

/// Fields searched by free text, with their boosts.
const TEXT_FIELDS: [&str; 5] = [
    "assetNumber^3",
    "brand^2",
    "model^2",
    "responsible",
    "location",
];

/// Build an OpenSearch search request from an `EquipmentSearchQuery`.
///
/// The request combines:
/// - A fuzzy `multi_match` over the text fields when text is given, `match_all` otherwise
/// - `term` filters on `status`, `type` and `location.keyword`
/// - `range` filters on `acquisitionValue` and `acquisitionDate`
/// - Paging with `from`/`size` and ordering by relevance
pub fn build_search_query(query: &EquipmentSearchQuery) -> Value {
    let must = match query.text_terms() {
        Some(text) => json!({
            "multi_match": {
                "query": text,
                "fields": TEXT_FIELDS,
                // AUTO fuzziness: 0 edits up to 2 chars, 1 edit up to 5, then 2
                "fuzziness": "AUTO"
            }
        }),
        None => json!({ "match_all": {} }),
    };

    json!({
        "from": query.offset(),
        "size": query.effective_size(),
        "track_scores": true,
        "query": {
            "bool": {
                "must": [must],
                "filter": build_filters(query)
            }
        },
        "sort": [
            { "_score": { "order": "desc" } }
        ]
    })
}

fn build_filters(query: &EquipmentSearchQuery) -> Vec<Value> {
    let mut filters = Vec::new();

    if let Some(status) = query.status_filter() {
        filters.push(json!({ "term": { "status": status } }));
    }
    if let Some(equipment_type) = query.type_filter() {
        filters.push(json!({ "term": { "type": equipment_type } }));
    }
    if let Some(location) = query.location_filter() {
        filters.push(json!({ "term": { "location.keyword": location } }));
    }

    if query.min_value.is_some() || query.max_value.is_some() {
        let mut bounds = Map::new();
        if let Some(min) = query.min_value {
            bounds.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = query.max_value {
            bounds.insert("lte".to_string(), json!(max));
        }
        filters.push(json!({ "range": { "acquisitionValue": bounds } }));
    }

    if query.date_from.is_some() || query.date_to.is_some() {
        let mut bounds = Map::new();
        if let Some(from) = query.date_from {
            bounds.insert("gte".to_string(), json!(from.to_string()));
        }
        if let Some(to) = query.date_to {
            bounds.insert("lte".to_string(), json!(to.to_string()));
        }
        filters.push(json!({ "range": { "acquisitionDate": bounds } }));
    }

    filters
}

/// Extract the `_source` documents from a search response.
///
/// Hits without a `_source` are skipped.
///
/// # Returns
///
/// * `Ok(Vec<EquipmentDocument>)` - Documents in response order
/// * `Err(SearchIndexError)` - If the response has no hits array or a source is malformed
pub fn parse_search_hits(response: &Value) -> Result<Vec<EquipmentDocument>, SearchIndexError> {
    let hits = response
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Search response has no hits array"))?;

    hits.iter()
        .filter_map(|hit| hit.get("_source"))
        .map(|source| {
            serde_json::from_value(source.clone())
                .map_err(|e| SearchIndexError::parse(format!("Invalid hit source: {}", e)))
        })
        .collect()
}
