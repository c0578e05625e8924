// Categorical breakdowns: call status frequencies and top countries.

use std::collections::HashMap;

use crate::store::CartRecord;

/// Count records per call status, descending by count (name breaks ties).
/// An empty status is reported as "Unknown".
pub fn call_status_distribution(records: &[CartRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let status = if record.call_status.is_empty() {
            "Unknown"
        } else {
            record.call_status.as_str()
        };
        *counts.entry(status).or_insert(0) += 1;
    }
    sorted_counts(counts)
}

/// The `limit` most common countries, descending by count (name breaks ties).
/// An empty country is reported as "Unknown".
pub fn top_countries(records: &[CartRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let country = if record.country.is_empty() {
            "Unknown"
        } else {
            record.country.as_str()
        };
        *counts.entry(country).or_insert(0) += 1;
    }
    let mut sorted = sorted_counts(counts);
    sorted.truncate(limit);
    sorted
}

fn sorted_counts(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
