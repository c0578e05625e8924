// Search, flag filtering, and sorting for the Carts table.
//
// Applied by the TUI at render time over the time-filtered record set: the
// query lives in view state and the canonical records are never reordered.

use std::cmp::Ordering;

use crate::store::CartRecord;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Customer first name.
    Customer,
    /// Short product name.
    Product,
    /// Original price.
    Price,
    /// Creation timestamp.
    CreatedAt,
}

impl SortKey {
    /// Cycle order for the `s` key.
    pub fn next(self) -> SortKey {
        match self {
            SortKey::Customer => SortKey::Product,
            SortKey::Product => SortKey::Price,
            SortKey::Price => SortKey::CreatedAt,
            SortKey::CreatedAt => SortKey::Customer,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Customer => "Customer",
            SortKey::Product => "Product",
            SortKey::Price => "Price",
            SortKey::CreatedAt => "Date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Three-state flag filter: keep all, only set, or only unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriFilter {
    #[default]
    All,
    Yes,
    No,
}

impl TriFilter {
    /// Cycle order for the filter keys: All -> Yes -> No -> All.
    pub fn next(self) -> TriFilter {
        match self {
            TriFilter::All => TriFilter::Yes,
            TriFilter::Yes => TriFilter::No,
            TriFilter::No => TriFilter::All,
        }
    }

    pub fn accepts(self, value: bool) -> bool {
        match self {
            TriFilter::All => true,
            TriFilter::Yes => value,
            TriFilter::No => !value,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TriFilter::All => "all",
            TriFilter::Yes => "yes",
            TriFilter::No => "no",
        }
    }
}

/// The complete table query: search text, flag filters, and sort order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub search: String,
    pub interested: TriFilter,
    pub purchased: TriFilter,
    pub ai_handled: TriFilter,
    pub sort_key: SortKey,
    pub direction: SortDirection,
}

impl Default for TableQuery {
    /// Newest records first, nothing filtered.
    fn default() -> Self {
        TableQuery {
            search: String::new(),
            interested: TriFilter::All,
            purchased: TriFilter::All,
            ai_handled: TriFilter::All,
            sort_key: SortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

// ---------------------------------------------------------------------------
// Query application
// ---------------------------------------------------------------------------

/// Apply `query` to `records`: search, then flag filters, then a stable sort.
pub fn apply_query<'a>(records: &'a [CartRecord], query: &TableQuery) -> Vec<&'a CartRecord> {
    let needle = query.search.to_lowercase();

    let mut rows: Vec<&CartRecord> = records
        .iter()
        .filter(|record| {
            if !needle.is_empty() && !matches_search(record, &needle) {
                return false;
            }
            query.interested.accepts(record.interested)
                && query.purchased.accepts(record.bought_from_automation)
                && query.ai_handled.accepts(record.answered_by_ai)
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, query.sort_key);
        match query.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    rows
}

/// Case-insensitive substring match over name, email, product, and country.
fn matches_search(record: &CartRecord, needle: &str) -> bool {
    record.first_name.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
        || record.short_product_name.to_lowercase().contains(needle)
        || record.country.to_lowercase().contains(needle)
}

/// Compare two records on the given column.
///
/// `Price` uses `total_cmp` so NaN prices still produce a total order;
/// `CreatedAt` compares the raw RFC 3339 strings, whose lexicographic order
/// matches chronological order for the store's uniform timestamps.
fn compare_by_key(a: &CartRecord, b: &CartRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Customer => a.first_name.cmp(&b.first_name),
        SortKey::Product => a.short_product_name.cmp(&b.short_product_name),
        SortKey::Price => a.original_price.total_cmp(&b.original_price),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
