// Call-id deduplication.
//
// The store accumulates one row per automation event, so a single call can
// appear several times (e.g. once when the call ends and again when the
// follow-up purchase lands). The dashboard works on one row per call.

use std::collections::HashMap;

use tracing::debug;

use crate::store::CartRecord;

/// Collapse records sharing a `call_id` down to one row each.
///
/// Merge rule: a record with `bought_from_automation = true` replaces an
/// earlier one without it; otherwise the first-seen record wins. The
/// first-seen order of distinct call ids is preserved, and a replacement
/// keeps its call id's original position.
pub fn dedupe_records(records: Vec<CartRecord>) -> Vec<CartRecord> {
    let input_len = records.len();
    let mut slot_by_call: HashMap<String, usize> = HashMap::with_capacity(input_len);
    let mut out: Vec<CartRecord> = Vec::with_capacity(input_len);

    for record in records {
        match slot_by_call.get(&record.call_id) {
            Some(&slot) => {
                if !out[slot].bought_from_automation && record.bought_from_automation {
                    out[slot] = record;
                }
            }
            None => {
                slot_by_call.insert(record.call_id.clone(), out.len());
                out.push(record);
            }
        }
    }

    if out.len() < input_len {
        debug!("deduplicated {} rows down to {}", input_len, out.len());
    }
    out
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
