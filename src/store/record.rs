// The abandoned-cart call record as stored in the backing store.
//
// Records are immutable snapshots; the dashboard never writes them back.
// `created_at` is kept as the raw string from the store and parsed lazily so
// that a single malformed row cannot poison deserialization of the whole set.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// CartRecord
// ---------------------------------------------------------------------------

/// One abandoned-cart recovery call, denormalized.
///
/// Every field carries a serde default: rows in the store are written by
/// several upstream automations and older rows may be missing columns that
/// were added later. A missing flag reads as `false`, a missing price as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CartRecord {
    /// Row id assigned by the backing store.
    pub id: Option<i64>,
    /// Document id from the upstream source, when the row was mirrored.
    #[serde(rename = "_id")]
    pub source_id: Option<String>,

    // Identity
    pub customer_id: String,
    pub checkout_id: String,
    pub call_id: String,

    // Contact
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub country: String,

    // Commerce
    pub product_name: String,
    pub short_product_name: String,
    pub original_price: f64,

    // Call outcome
    pub call_status: String,
    pub call_successful: bool,
    pub ended_reason: String,
    pub transcript: String,
    pub summary: String,
    pub recording_url: String,

    // Flags derived upstream from the call transcript
    pub interested: bool,
    pub answered_by_ai: bool,
    pub agreed_to_get_sms: bool,
    pub received_sms: bool,
    pub bought_from_automation: bool,

    /// Creation timestamp as written by the store (RFC 3339, usually with an
    /// offset). Parse with [`CartRecord::created_at_local`].
    pub created_at: String,
}

impl CartRecord {
    /// Parse `created_at` into a local timestamp.
    ///
    /// Accepts RFC 3339 with an offset, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]`
    /// (also with a space separator) interpreted in the local timezone.
    /// Returns `None` for anything else; callers decide whether to skip the
    /// row or keep it.
    pub fn created_at_local(&self) -> Option<DateTime<Local>> {
        parse_timestamp(&self.created_at)
    }

    /// The price attributed to an automated recovery: the recovery flow sells
    /// at a 10% discount, so revenue counts 90% of the original price.
    pub fn recovered_price(&self) -> f64 {
        self.original_price * crate::analytics::DISCOUNT_FACTOR
    }
}

/// Parse a store timestamp into local time. See [`CartRecord::created_at_local`].
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.with_timezone(&Local));
    }

    // Naive timestamps (no offset) are interpreted as local time.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn deserialize_full_row() {
        let json = r#"{
            "id": 17,
            "_id": "665f1c2e9b1d",
            "customer_id": "cus_123",
            "checkout_id": "chk_456",
            "call_id": "call_789",
            "first_name": "Marta",
            "email": "marta@example.com",
            "phone": "+34600111222",
            "city": "Sevilla",
            "country": "Spain",
            "product_name": "Ceramic Tagine & Serving Set",
            "short_product_name": "Tagine Set",
            "original_price": 89.99,
            "call_status": "ended",
            "call_successful": true,
            "ended_reason": "customer-ended-call",
            "transcript": "AI: Hello...",
            "summary": "Customer agreed to buy.",
            "recording_url": "https://cdn.example.com/rec/789.mp3",
            "interested": true,
            "answered_by_ai": false,
            "agreed_to_get_sms": true,
            "received_sms": true,
            "bought_from_automation": true,
            "created_at": "2026-03-14T09:26:53.589+00:00"
        }"#;

        let record: CartRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, Some(17));
        assert_eq!(record.source_id.as_deref(), Some("665f1c2e9b1d"));
        assert_eq!(record.call_id, "call_789");
        assert_eq!(record.first_name, "Marta");
        assert!((record.original_price - 89.99).abs() < f64::EPSILON);
        assert!(record.bought_from_automation);
        assert!(record.created_at_local().is_some());
    }

    #[test]
    fn deserialize_sparse_row_uses_defaults() {
        // Older rows predate several columns; they must still deserialize.
        let json = r#"{ "call_id": "call_1", "first_name": "Ben" }"#;
        let record: CartRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.call_id, "call_1");
        assert_eq!(record.id, None);
        assert_eq!(record.original_price, 0.0);
        assert!(!record.bought_from_automation);
        assert!(record.created_at.is_empty());
        assert!(record.created_at_local().is_none());
    }

    #[test]
    fn recovered_price_applies_discount() {
        let record = CartRecord {
            original_price: 100.0,
            ..CartRecord::default()
        };
        assert!((record.recovered_price() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2026-03-14T12:00:00+02:00").unwrap();
        // 12:00 at +02:00 is 10:00 UTC regardless of the local zone.
        assert_eq!(ts.to_utc().hour(), 10);
    }

    #[test]
    fn parse_naive_is_local() {
        let ts = parse_timestamp("2026-03-14T09:30:00").unwrap();
        assert_eq!(ts.year(), 2026);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 14);
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn parse_naive_with_space_separator() {
        assert!(parse_timestamp("2026-03-14 09:30:00.123").is_some());
    }

    #[test]
    fn parse_garbage_returns_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2026-13-99T00:00:00Z").is_none());
    }
}
