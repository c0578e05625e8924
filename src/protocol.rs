// Message types exchanged between the fetch tasks, the app orchestrator,
// and the TUI render loop.

use chrono::{DateTime, Local};

use crate::analytics::{ChartStats, SummaryStats, TimeFilter};
use crate::store::CartRecord;

// ---------------------------------------------------------------------------
// Fetch events
// ---------------------------------------------------------------------------

/// Outcome of one store scan, sent by a spawned fetch task.
///
/// Every event carries the generation counter it was spawned with; the app
/// loop discards events whose generation is no longer current, so a slow
/// response from an old refetch can never overwrite a newer one.
#[derive(Debug)]
pub enum FetchEvent {
    Loaded {
        records: Vec<CartRecord>,
        generation: u64,
    },
    Failed {
        message: String,
        generation: u64,
    },
}

impl FetchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            FetchEvent::Loaded { generation, .. } => *generation,
            FetchEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Where the most recent fetch stands, for the status bar indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing fetched yet.
    Idle,
    /// A fetch task is in flight.
    Loading,
    /// The last fetch completed and its data is on screen.
    Loaded,
    /// The last fetch failed; earlier data (if any) is still on screen.
    Failed,
}

// ---------------------------------------------------------------------------
// User commands
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Change the active time window (triggers a refetch).
    SetTimeFilter(TimeFilter),
    /// Refetch with the current window.
    Refresh,
    /// Shut down.
    Quit,
}

// ---------------------------------------------------------------------------
// UI updates
// ---------------------------------------------------------------------------

/// The main-panel views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewId {
    Overview,
    Carts,
    Analytics,
}

/// Everything the TUI needs to draw one consistent frame of data.
///
/// Built by the app orchestrator after every state change and applied by the
/// TUI in one shot; view-local state (search, sort, scroll) stays in the TUI.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// The window the snapshot was computed under.
    pub time_filter: TimeFilter,
    /// Deduplicated records inside the window, store order (newest first).
    pub records: Vec<CartRecord>,
    /// Total deduplicated records across all time.
    pub total_records: usize,
    pub summary: SummaryStats,
    pub charts: ChartStats,
    pub status_breakdown: Vec<(String, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub fetch_status: FetchStatus,
    /// Human-readable notice from the last failed fetch, if any.
    pub notice: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
}

/// Messages pushed from the app orchestrator to the TUI.
#[derive(Debug)]
pub enum UiUpdate {
    /// Full recomputed dashboard state.
    Snapshot(Box<DashboardSnapshot>),
    /// A refetch was started (spinner state only; data unchanged).
    FetchStarted,
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
