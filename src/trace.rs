//! Timestamp and id helpers for trace metadata
//!
//! Strategy outputs carry a trace record for auditability. The timestamp is
//! wall-clock in normal operation but switches to a fixed value when the
//! `TEST_DETERMINISTIC_TIMESTAMPS` environment variable is set to `true`,
//! so tests can compare whole outputs byte for byte.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Fixed timestamp returned in deterministic-test mode
const FIXED_TIMESTAMP: &str = "2024-01-01T12:00:00Z";

/// Current UTC timestamp in RFC 3339 format, fixable for tests
pub fn generated_at() -> String {
    if deterministic_mode() {
        return FIXED_TIMESTAMP.to_string();
    }
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| FIXED_TIMESTAMP.to_string())
}

/// Deterministic id derived from content
///
/// DefaultHasher runs SipHash with fixed keys, so the id is stable across
/// processes and platforms for identical content.
pub fn content_id(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

fn deterministic_mode() -> bool {
    std::env::var("TEST_DETERMINISTIC_TIMESTAMPS")
        .map(|v| v == "true")
        .unwrap_or(false)
}
