//! Utility functions for the equipment sync repository.

/// Maximum number of characters of an index creation response kept for diagnostics.
pub const INDEX_RESPONSE_SAMPLE_CHARS: usize = 1000;

/// Maximum number of characters of a bulk response kept for diagnostics.
pub const BULK_RESPONSE_SAMPLE_CHARS: usize = 2000;

/// Truncate a response body to at most `max_chars` characters.
///
/// Truncation happens on character boundaries so that multi-byte UTF-8
/// sequences in error messages are never split.
///
/// # Example
///
/// ```
/// use equipment_sync_repository::truncate_body;
///
/// assert_eq!(truncate_body("índice", 3), "índ");
/// assert_eq!(truncate_body("ok", 10), "ok");
/// ```
pub fn truncate_body(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((end, _)) => body[..end].to_string(),
        None => body.to_string(),
    }
}
