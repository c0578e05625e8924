// Application state and orchestration logic.
//
// The central event loop that coordinates fetch results from the backing
// store and user commands from the TUI. Maintains the canonical record set
// and pushes recomputed dashboard snapshots to the TUI render loop.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::analytics::{
    compute_chart_stats, compute_summary, dedupe_records, distribution, filter_records,
    TimeFilter, TOP_COUNTRY_LIMIT,
};
use crate::config::Config;
use crate::protocol::{DashboardSnapshot, FetchEvent, FetchStatus, UiUpdate, UserCommand};
use crate::store::{CartRecord, StoreClient};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    /// Deduplicated records from the last successful fetch, store order.
    pub records: Vec<CartRecord>,
    /// The active time window.
    pub time_filter: TimeFilter,
    pub fetch_status: FetchStatus,
    /// Notice from the last failed fetch; cleared on the next success.
    pub notice: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    /// Monotonically increasing counter identifying the current fetch.
    /// Incremented each time a refetch is triggered; events from stale
    /// generations are discarded in `apply_fetch_event`, so a slow old
    /// response can never overwrite a newer one.
    pub fetch_generation: u64,
    current_fetch_task: Option<tokio::task::JoinHandle<()>>,
    /// Store client, shared with spawned fetch tasks.
    store: Arc<StoreClient>,
    /// Sender for fetch events; spawned tasks use a clone to report back.
    fetch_tx: mpsc::Sender<FetchEvent>,
}

impl AppState {
    pub fn new(config: Config, store: StoreClient, fetch_tx: mpsc::Sender<FetchEvent>) -> Self {
        let time_filter = config.ui.default_time_filter();
        AppState {
            config,
            records: Vec::new(),
            time_filter,
            fetch_status: FetchStatus::Idle,
            notice: None,
            last_refresh: None,
            fetch_generation: 0,
            current_fetch_task: None,
            store: Arc::new(store),
            fetch_tx,
        }
    }

    /// Cancel the in-flight fetch task, if any.
    pub fn cancel_fetch_task(&mut self) {
        if let Some(handle) = self.current_fetch_task.take() {
            handle.abort();
            info!("Cancelled previous fetch task");
        }
    }

    /// Start a refetch of the full record set.
    ///
    /// Aborts any in-flight fetch, bumps the generation counter, and spawns
    /// a task that runs the paginated store scan and reports a single
    /// `Loaded`/`Failed` event tagged with that generation.
    pub fn trigger_fetch(&mut self) {
        self.cancel_fetch_task();

        self.fetch_generation += 1;
        let generation = self.fetch_generation;
        self.fetch_status = FetchStatus::Loading;

        let store = Arc::clone(&self.store);
        let tx = self.fetch_tx.clone();

        let handle = tokio::spawn(async move {
            let event = match store.fetch_all().await {
                Ok(records) => FetchEvent::Loaded {
                    records,
                    generation,
                },
                Err(e) => FetchEvent::Failed {
                    message: e.to_string(),
                    generation,
                },
            };
            let _ = tx.send(event).await;
        });

        self.current_fetch_task = Some(handle);
        info!("Triggered store fetch (gen: {})", generation);
    }

    /// Apply a fetch event to the state.
    ///
    /// Returns `true` when the event was current and the state changed,
    /// `false` when it was stale and discarded.
    pub fn apply_fetch_event(&mut self, event: FetchEvent) -> bool {
        if event.generation() != self.fetch_generation {
            debug!(
                "Discarding stale fetch event (event gen: {}, current gen: {})",
                event.generation(),
                self.fetch_generation
            );
            return false;
        }

        match event {
            FetchEvent::Loaded { records, .. } => {
                let fetched = records.len();
                self.records = dedupe_records(records);
                self.fetch_status = FetchStatus::Loaded;
                self.notice = None;
                self.last_refresh = Some(Local::now());
                info!(
                    "Fetch complete: {} rows, {} after dedup",
                    fetched,
                    self.records.len()
                );
            }
            FetchEvent::Failed { message, .. } => {
                // Previous records stay on screen; only the notice changes.
                warn!("Fetch failed: {}", message);
                self.fetch_status = FetchStatus::Failed;
                self.notice = Some(format!("Failed to load dashboard data: {message}"));
            }
        }
        true
    }

    /// Build a `DashboardSnapshot` from the current state.
    ///
    /// Recomputes the whole derived pipeline (time filter, summary, chart
    /// stats, distributions) so the TUI can apply everything in one shot.
    pub fn build_snapshot(&self) -> DashboardSnapshot {
        self.build_snapshot_at(Local::now())
    }

    /// `build_snapshot` with an explicit clock, for deterministic tests.
    pub fn build_snapshot_at(&self, now: DateTime<Local>) -> DashboardSnapshot {
        let records = filter_records(&self.records, &self.time_filter, now);
        let summary = compute_summary(&records);
        let charts = compute_chart_stats(&records);
        let status_breakdown = distribution::call_status_distribution(&records);
        let top_countries = distribution::top_countries(&records, TOP_COUNTRY_LIMIT);

        DashboardSnapshot {
            time_filter: self.time_filter,
            records,
            total_records: self.records.len(),
            summary,
            charts,
            status_breakdown,
            top_countries,
            fetch_status: self.fetch_status,
            notice: self.notice.clone(),
            last_refresh: self.last_refresh,
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Triggers the initial fetch, then listens on two channels with
/// `tokio::select!`:
/// 1. Fetch events from spawned store-scan tasks
/// 2. User commands from the TUI
///
/// Pushes `UiUpdate` messages through `ui_tx` for the TUI render loop.
pub async fn run(
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // Initial snapshot so the TUI shows the configured filter immediately,
    // then the startup fetch.
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;
    state.trigger_fetch();
    let _ = ui_tx.send(UiUpdate::FetchStarted).await;

    loop {
        tokio::select! {
            // --- Fetch events ---
            fetch_event = fetch_rx.recv() => {
                match fetch_event {
                    Some(event) => {
                        if state.apply_fetch_event(event) {
                            let snapshot = state.build_snapshot();
                            let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
                        }
                    }
                    None => {
                        info!("Fetch channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    state.cancel_fetch_task();
    info!("Application event loop exiting");
    Ok(())
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SetTimeFilter(filter) => {
            if filter == state.time_filter {
                debug!("Time filter unchanged ({:?}), ignoring", filter);
                return;
            }
            info!("Time filter changed: {:?} -> {:?}", state.time_filter, filter);
            state.time_filter = filter;

            // Show the cached records under the new window right away, then
            // refetch so the view catches up with the store.
            let snapshot = state.build_snapshot();
            let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;

            state.trigger_fetch();
            let _ = ui_tx.send(UiUpdate::FetchStarted).await;
        }
        UserCommand::Refresh => {
            info!("Manual refresh requested");
            state.trigger_fetch();
            let _ = ui_tx.send(UiUpdate::FetchStarted).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
