// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the latest dashboard snapshot from
// the app orchestrator plus view-local state (active view, table query,
// selection, input modes). The orchestrator pushes `UiUpdate` messages over
// an mpsc channel; the TUI applies them to `ViewState` and re-renders at
// ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::analytics::table::{apply_query, TableQuery};
use crate::analytics::{ChartStats, SummaryStats, TimeFilter};
use crate::protocol::{DashboardSnapshot, FetchStatus, UiUpdate, UserCommand, ViewId};
use crate::store::CartRecord;

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the latest snapshot plus everything the renderer needs
/// that the orchestrator doesn't care about.
pub struct ViewState {
    // --- snapshot mirror ---
    /// The active time window (as of the last snapshot).
    pub time_filter: TimeFilter,
    /// Time-filtered records, store order.
    pub records: Vec<CartRecord>,
    /// Total deduplicated records across all time.
    pub total_records: usize,
    pub summary: SummaryStats,
    pub charts: ChartStats,
    pub status_breakdown: Vec<(String, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub fetch_status: FetchStatus,
    pub notice: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,

    // --- view-local state ---
    pub active_view: ViewId,
    /// Search / flag filters / sort applied to the Carts table.
    pub query: TableQuery,
    /// Selected row index into the queried table rows.
    pub selected_row: usize,
    /// Whether the detail overlay is open.
    pub detail_open: bool,
    /// Scroll offset inside the detail overlay.
    pub detail_scroll: usize,
    /// Whether the search input captures keystrokes.
    pub search_mode: bool,
    /// Whether the custom-range input captures keystrokes.
    pub range_mode: bool,
    /// Text being typed into the custom-range input.
    pub range_input: String,
    /// Parse error from the last range submission, shown in the filter bar.
    pub range_error: Option<String>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            time_filter: TimeFilter::Today,
            records: Vec::new(),
            total_records: 0,
            summary: SummaryStats::default(),
            charts: ChartStats::default(),
            status_breakdown: Vec::new(),
            top_countries: Vec::new(),
            fetch_status: FetchStatus::Idle,
            notice: None,
            last_refresh: None,
            active_view: ViewId::Overview,
            query: TableQuery::default(),
            selected_row: 0,
            detail_open: false,
            detail_scroll: 0,
            search_mode: false,
            range_mode: false,
            range_input: String::new(),
            range_error: None,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Apply a full dashboard snapshot from the app orchestrator.
    ///
    /// View-local state (query, selection, input modes) is left alone except
    /// for clamping the selection into the new row count.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.time_filter = snapshot.time_filter;
        self.records = snapshot.records;
        self.total_records = snapshot.total_records;
        self.summary = snapshot.summary;
        self.charts = snapshot.charts;
        self.status_breakdown = snapshot.status_breakdown;
        self.top_countries = snapshot.top_countries;
        self.fetch_status = snapshot.fetch_status;
        self.notice = snapshot.notice;
        self.last_refresh = snapshot.last_refresh;

        self.clamp_selection();
    }

    /// The Carts table rows after search/filters/sort.
    pub fn table_rows(&self) -> Vec<&CartRecord> {
        apply_query(&self.records, &self.query)
    }

    /// The record under the cursor, if any.
    pub fn selected_record(&self) -> Option<&CartRecord> {
        self.table_rows().get(self.selected_row).copied()
    }

    /// Keep the selection inside the current row count.
    pub fn clamp_selection(&mut self) {
        let rows = self.table_rows().len();
        if rows == 0 {
            self.selected_row = 0;
            self.detail_open = false;
        } else if self.selected_row >= rows {
            self.selected_row = rows - 1;
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::FetchStarted => {
            state.fetch_status = FetchStatus::Loading;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::filter_bar::render(frame, layout.filter_bar, state);

    match state.active_view {
        ViewId::Overview => widgets::summary_cards::render(frame, layout.main_panel, state),
        ViewId::Carts => widgets::cart_table::render(frame, layout.main_panel, state),
        ViewId::Analytics => widgets::charts::render(frame, layout.main_panel, state),
    }

    render_help_bar(frame, layout.help_bar, state);

    // Overlays last so they draw on top of the main panel.
    if state.detail_open {
        if let Some(record) = state.selected_record() {
            widgets::detail::render(frame, frame.area(), record, state.detail_scroll);
        }
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect, state: &ViewState) {
    let text = if state.search_mode {
        " type to search | Enter:Keep  Esc:Clear"
    } else if state.range_mode {
        " YYYY-MM-DD..YYYY-MM-DD | Enter:Apply  Esc:Cancel"
    } else if state.detail_open {
        " j/k:Scroll  Esc:Close"
    } else {
        match state.active_view {
            ViewId::Carts => {
                " q:Quit | 1-3:View | t/w/m/a/c:Window | /:Search s:Sort o:Order i/b/h:Flags | Enter:Detail | r:Refresh"
            }
            _ => " q:Quit | 1:Overview 2:Carts 3:Analytics | t/w/m/a/c:Window | r:Refresh",
        }
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Restore the terminal before the default panic output so the message
    // lands on a usable screen. Chain the original hook after ours.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    // ~30 fps render cadence.
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse / resize / focus events need no handling;
                        // resize is picked up on the next draw.
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
