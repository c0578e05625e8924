// Daily time-series aggregation for the Analytics charts.
//
// Records are bucketed by their local calendar day. A row whose timestamp
// cannot be parsed is skipped with a warning; one bad row never aborts the
// whole computation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::store::CartRecord;

// ---------------------------------------------------------------------------
// DailyBucket
// ---------------------------------------------------------------------------

/// Per-day counters feeding the time-series charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Discounted revenue from automated purchases that day.
    pub revenue: f64,
    pub interested_total: u32,
    pub interested_purchased: u32,
    pub sms_total: u32,
    pub sms_purchased: u32,
    pub ai_total: u32,
    pub non_ai_total: u32,
    /// Purchases where the customer (not the AI) answered the call.
    pub manual_purchased: u32,
}

/// Overall totals across the whole set, shown in chart titles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartStats {
    /// Daily buckets, ascending by date.
    pub days: Vec<DailyBucket>,
    pub total_revenue: f64,
    pub total_interested: u32,
    pub interested_purchased: u32,
    /// Percent of interested customers who purchased, one decimal.
    pub interest_purchase_rate: f64,
    pub total_sms: u32,
    pub sms_purchased: u32,
    pub sms_purchase_rate: f64,
    pub total_ai: u32,
    pub total_non_ai: u32,
    pub total_manual_purchases: u32,
}

/// Bucket `records` by local calendar day, ascending.
pub fn build_daily_buckets(records: &[CartRecord]) -> Vec<DailyBucket> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket> = BTreeMap::new();

    for record in records {
        let Some(created) = record.created_at_local() else {
            warn!(
                call_id = %record.call_id,
                created_at = %record.created_at,
                "skipping record with unparseable timestamp in timeline"
            );
            continue;
        };
        let day = created.date_naive();
        let bucket = buckets.entry(day).or_insert_with(|| DailyBucket {
            date: day,
            ..DailyBucket::default()
        });

        if record.bought_from_automation {
            bucket.revenue += record.recovered_price();
            if !record.answered_by_ai {
                bucket.manual_purchased += 1;
            }
        }
        if record.interested {
            bucket.interested_total += 1;
            if record.bought_from_automation {
                bucket.interested_purchased += 1;
            }
        }
        if record.agreed_to_get_sms {
            bucket.sms_total += 1;
            if record.bought_from_automation {
                bucket.sms_purchased += 1;
            }
        }
        if record.answered_by_ai {
            bucket.ai_total += 1;
        } else {
            bucket.non_ai_total += 1;
        }
    }

    buckets.into_values().collect()
}

/// Build the full chart dataset: daily buckets plus overall totals.
pub fn compute_chart_stats(records: &[CartRecord]) -> ChartStats {
    let days = build_daily_buckets(records);

    let mut stats = ChartStats {
        days,
        ..ChartStats::default()
    };

    for record in records {
        if record.bought_from_automation {
            stats.total_revenue += record.recovered_price();
            if !record.answered_by_ai {
                stats.total_manual_purchases += 1;
            }
        }
        if record.interested {
            stats.total_interested += 1;
            if record.bought_from_automation {
                stats.interested_purchased += 1;
            }
        }
        if record.agreed_to_get_sms {
            stats.total_sms += 1;
            if record.bought_from_automation {
                stats.sms_purchased += 1;
            }
        }
        if record.answered_by_ai {
            stats.total_ai += 1;
        } else {
            stats.total_non_ai += 1;
        }
    }

    stats.interest_purchase_rate = percentage(stats.interested_purchased, stats.total_interested);
    stats.sms_purchase_rate = percentage(stats.sms_purchased, stats.total_sms);
    stats
}

/// `part` of `whole` as a percentage rounded to one decimal; 0 when empty.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record_on(day: &str, interested: bool, sms: bool, ai: bool, bought: bool, price: f64) -> CartRecord {
        CartRecord {
            call_id: "c".into(),
            created_at: format!("{day}T12:00:00"),
            interested,
            agreed_to_get_sms: sms,
            answered_by_ai: ai,
            bought_from_automation: bought,
            original_price: price,
            ..CartRecord::default()
        }
    }

    #[test]
    fn buckets_are_sorted_ascending_by_date() {
        let records = vec![
            record_on("2026-03-14", false, false, true, false, 0.0),
            record_on("2026-03-12", false, false, true, false, 0.0),
            record_on("2026-03-13", false, false, true, false, 0.0),
        ];
        let days = build_daily_buckets(&records);
        assert_eq!(days.len(), 3);
        assert!(days[0].date < days[1].date && days[1].date < days[2].date);
    }

    #[test]
    fn same_day_records_accumulate() {
        let records = vec![
            record_on("2026-03-14", true, false, true, true, 100.0),
            record_on("2026-03-14", true, true, false, true, 50.0),
            record_on("2026-03-14", false, true, false, false, 10.0),
        ];
        let days = build_daily_buckets(&records);
        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert!((day.revenue - 135.0).abs() < 1e-9);
        assert_eq!(day.interested_total, 2);
        assert_eq!(day.interested_purchased, 2);
        assert_eq!(day.sms_total, 2);
        assert_eq!(day.sms_purchased, 1);
        assert_eq!(day.ai_total, 1);
        assert_eq!(day.non_ai_total, 2);
        assert_eq!(day.manual_purchased, 1);
    }

    #[test]
    fn malformed_timestamps_are_skipped_not_fatal() {
        let mut bad = record_on("2026-03-14", true, true, true, true, 100.0);
        bad.created_at = "absolutely-not-a-date".into();
        let records = vec![bad, record_on("2026-03-14", false, false, false, false, 0.0)];
        let days = build_daily_buckets(&records);
        assert_eq!(days.len(), 1);
        // Only the good record landed in the bucket.
        assert_eq!(days[0].interested_total, 0);
        assert_eq!(days[0].non_ai_total, 1);
    }

    #[test]
    fn chart_stats_totals_and_rates() {
        let records = vec![
            record_on("2026-03-12", true, true, true, true, 100.0),
            record_on("2026-03-13", true, false, false, false, 40.0),
            record_on("2026-03-13", true, true, false, true, 60.0),
            record_on("2026-03-14", false, true, true, false, 20.0),
        ];
        let stats = compute_chart_stats(&records);
        assert_eq!(stats.days.len(), 3);
        assert!((stats.total_revenue - 144.0).abs() < 1e-9);
        assert_eq!(stats.total_interested, 3);
        assert_eq!(stats.interested_purchased, 2);
        assert!((stats.interest_purchase_rate - 66.7).abs() < 1e-9);
        assert_eq!(stats.total_sms, 3);
        assert_eq!(stats.sms_purchased, 2);
        assert!((stats.sms_purchase_rate - 66.7).abs() < 1e-9);
        assert_eq!(stats.total_ai, 2);
        assert_eq!(stats.total_non_ai, 2);
        assert_eq!(stats.total_manual_purchases, 1);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 5), 100.0);
    }

    #[test]
    fn empty_input_yields_empty_stats() {
        let stats = compute_chart_stats(&[]);
        assert!(stats.days.is_empty());
        assert_eq!(stats.total_revenue, 0.0);
        assert_eq!(stats.interest_purchase_rate, 0.0);
    }
}
