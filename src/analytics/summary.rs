// Summary statistics for the Overview cards.

use crate::store::CartRecord;

/// Aggregate counters over a (time-filtered) record set.
///
/// One bounded-memory pass; every field is a plain count except
/// `automation_revenue`, which sums the discounted price of automated
/// purchases and is therefore independent of input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    /// Records in the set.
    pub total_carts: usize,
    /// Calls that connected (`call_successful`).
    pub successful_calls: usize,
    /// Customers the transcript analysis marked as interested.
    pub interested: usize,
    /// Customers who consented to SMS follow-up.
    pub agreed_to_sms: usize,
    /// Customers who answered the call themselves and then purchased.
    pub answered_and_bought: usize,
    /// Revenue from automated recoveries, at the discounted price.
    pub automation_revenue: f64,
}

/// Compute the Overview stats for `records`.
pub fn compute_summary(records: &[CartRecord]) -> SummaryStats {
    let mut stats = SummaryStats {
        total_carts: records.len(),
        ..SummaryStats::default()
    };

    for record in records {
        if record.call_successful {
            stats.successful_calls += 1;
        }
        if record.interested {
            stats.interested += 1;
        }
        if record.agreed_to_get_sms {
            stats.agreed_to_sms += 1;
        }
        if record.bought_from_automation {
            stats.automation_revenue += record.recovered_price();
            if !record.answered_by_ai {
                stats.answered_and_bought += 1;
            }
        }
    }

    stats
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
