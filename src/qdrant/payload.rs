//! Helpers for deterministic point ids and payload timestamps.

use time::OffsetDateTime;
use uuid::Uuid;

/// Derive the Qdrant point id for a readable card id.
///
/// Qdrant only accepts integer or UUID point ids, so the human-readable id
/// (`text_0`, `image_3`, ...) is mapped through UUIDv5. The mapping is stable:
/// re-ingesting the same corpus produces the same point ids, making repeated
/// runs upserts rather than duplicates.
pub fn point_uuid(card_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, card_id.as_bytes()).to_string()
}

/// Current timestamp formatted for payload storage.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
