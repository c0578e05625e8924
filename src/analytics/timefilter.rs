// Time-window filtering of cart records.
//
// All windows are anchored to local midnight so "today" means the local
// calendar day, not the last 24 hours. `now` is always passed in by the
// caller; nothing in here reads the clock, which keeps the filters
// deterministic under test.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

use crate::store::CartRecord;

// ---------------------------------------------------------------------------
// TimeFilter
// ---------------------------------------------------------------------------

/// The active time window scoping every dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    /// Records created since local midnight today.
    Today,
    /// Records created in the last 7 days (from local midnight).
    Week,
    /// Records created in the last 30 days (from local midnight).
    Month,
    /// Every record, including ones with unparseable timestamps.
    All,
    /// An inclusive calendar-date range; `to` covers the full end day.
    Custom { from: NaiveDate, to: NaiveDate },
}

impl TimeFilter {
    /// Short label for the filter bar.
    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::Today => "Today",
            TimeFilter::Week => "Week",
            TimeFilter::Month => "Month",
            TimeFilter::All => "All",
            TimeFilter::Custom { .. } => "Custom",
        }
    }

    /// Whether a record falls inside this window, evaluated against `now`.
    ///
    /// A record whose `created_at` cannot be parsed matches only `All` -- a
    /// bounded window cannot place it, so it is excluded rather than guessed
    /// at.
    pub fn matches(&self, record: &CartRecord, now: DateTime<Local>) -> bool {
        if matches!(self, TimeFilter::All) {
            return true;
        }
        let Some(created) = record.created_at_local() else {
            return false;
        };

        match self {
            TimeFilter::All => true,
            TimeFilter::Today => created >= local_midnight(now.date_naive()),
            TimeFilter::Week => created >= local_midnight(now.date_naive()) - Duration::days(7),
            TimeFilter::Month => created >= local_midnight(now.date_naive()) - Duration::days(30),
            TimeFilter::Custom { from, to } => {
                let start = local_midnight(*from);
                let end = end_of_day(*to);
                created >= start && created <= end
            }
        }
    }
}

/// Retain the records inside `filter`'s window, preserving order.
pub fn filter_records(
    records: &[CartRecord],
    filter: &TimeFilter,
    now: DateTime<Local>,
) -> Vec<CartRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record, now))
        .cloned()
        .collect()
}

/// Local midnight of `date`. Around a DST gap the earliest valid instant of
/// the day is used; an unrepresentable date falls back to the epoch, which
/// only makes the window larger.
fn local_midnight(date: NaiveDate) -> DateTime<Local> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .unwrap_or_else(|| Local.timestamp_opt(0, 0).unwrap())
}

/// Last representable instant of `date` in local time.
fn end_of_day(date: NaiveDate) -> DateTime<Local> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .and_then(|naive| Local.from_local_datetime(&naive).latest())
        .unwrap_or_else(|| local_midnight(date) + Duration::days(1))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
