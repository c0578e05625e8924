// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (view switching,
// table query edits, overlay control).

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::analytics::table::TriFilter;
use crate::analytics::TimeFilter;
use crate::protocol::{UserCommand, ViewId};

use super::ViewState;

/// Rows jumped by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (time filter changes, refresh, quit). Returns `None` when
/// the key press was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Text-entry modes capture printable characters before anything else.
    if view_state.search_mode {
        return handle_search_mode(key_event, view_state);
    }
    if view_state.range_mode {
        return handle_range_mode(key_event, view_state);
    }

    // Detail overlay: scroll and close only.
    if view_state.detail_open {
        return handle_detail_overlay(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        // View switching
        KeyCode::Char('1') => {
            view_state.active_view = ViewId::Overview;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_view = ViewId::Carts;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_view = ViewId::Analytics;
            None
        }

        // Time windows (app-level: each change triggers a refetch)
        KeyCode::Char('t') => Some(UserCommand::SetTimeFilter(TimeFilter::Today)),
        KeyCode::Char('w') => Some(UserCommand::SetTimeFilter(TimeFilter::Week)),
        KeyCode::Char('m') => Some(UserCommand::SetTimeFilter(TimeFilter::Month)),
        KeyCode::Char('a') => Some(UserCommand::SetTimeFilter(TimeFilter::All)),
        KeyCode::Char('c') => {
            view_state.range_mode = true;
            view_state.range_error = None;
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Refresh),

        // Search entry: only on the Carts view where it is relevant
        KeyCode::Char('/') => {
            if view_state.active_view == ViewId::Carts {
                view_state.search_mode = true;
            }
            None
        }

        // Tri-state flag filters (Carts view)
        KeyCode::Char('i') if view_state.active_view == ViewId::Carts => {
            view_state.query.interested = view_state.query.interested.next();
            view_state.clamp_selection();
            None
        }
        KeyCode::Char('b') if view_state.active_view == ViewId::Carts => {
            view_state.query.purchased = view_state.query.purchased.next();
            view_state.clamp_selection();
            None
        }
        KeyCode::Char('h') if view_state.active_view == ViewId::Carts => {
            view_state.query.ai_handled = view_state.query.ai_handled.next();
            view_state.clamp_selection();
            None
        }

        // Sorting (Carts view)
        KeyCode::Char('s') if view_state.active_view == ViewId::Carts => {
            view_state.query.sort_key = view_state.query.sort_key.next();
            None
        }
        KeyCode::Char('o') if view_state.active_view == ViewId::Carts => {
            view_state.query.direction = view_state.query.direction.toggled();
            None
        }

        // Selection movement (Carts view)
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.selected_row = view_state.selected_row.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            view_state.selected_row = view_state.selected_row.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            move_selection_down(view_state, PAGE_SIZE);
            None
        }

        // Detail overlay for the selected record
        KeyCode::Enter => {
            if view_state.active_view == ViewId::Carts && view_state.selected_record().is_some() {
                view_state.detail_open = true;
                view_state.detail_scroll = 0;
            }
            None
        }

        // Escape: clear the table query back to its defaults
        KeyCode::Esc => {
            view_state.query.search.clear();
            view_state.query.interested = TriFilter::All;
            view_state.query.purchased = TriFilter::All;
            view_state.query.ai_handled = TriFilter::All;
            view_state.clamp_selection();
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

fn move_selection_down(view_state: &mut ViewState, step: usize) {
    let rows = view_state.table_rows().len();
    if rows == 0 {
        view_state.selected_row = 0;
        return;
    }
    view_state.selected_row = (view_state.selected_row + step).min(rows - 1);
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while the search input is active.
///
/// - Printable characters extend the search text
/// - Backspace removes the last character
/// - Enter keeps the text and exits; Esc clears it and exits
fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.search_mode = false;
            view_state.query.search.clear();
            view_state.clamp_selection();
            None
        }
        KeyCode::Enter => {
            view_state.search_mode = false;
            None
        }
        KeyCode::Backspace => {
            view_state.query.search.pop();
            view_state.clamp_selection();
            None
        }
        KeyCode::Char(c) => {
            view_state.query.search.push(c);
            view_state.clamp_selection();
            None
        }
        _ => None,
    }
}

/// Handle key events while the custom-range input is active.
///
/// Enter parses `YYYY-MM-DD..YYYY-MM-DD`; on success the window command is
/// sent and the input closes, on failure the error stays visible and the
/// input remains open for correction.
fn handle_range_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.range_mode = false;
            view_state.range_input.clear();
            view_state.range_error = None;
            None
        }
        KeyCode::Enter => match parse_range(&view_state.range_input) {
            Ok((from, to)) => {
                view_state.range_mode = false;
                view_state.range_error = None;
                Some(UserCommand::SetTimeFilter(TimeFilter::Custom { from, to }))
            }
            Err(message) => {
                view_state.range_error = Some(message);
                None
            }
        },
        KeyCode::Backspace => {
            view_state.range_input.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.range_input.push(c);
            None
        }
        _ => None,
    }
}

/// Handle key events while the detail overlay is open.
fn handle_detail_overlay(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter => {
            view_state.detail_open = false;
            view_state.detail_scroll = 0;
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.detail_scroll = view_state.detail_scroll.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.detail_scroll += 1;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Parse a `YYYY-MM-DD..YYYY-MM-DD` range.
pub fn parse_range(input: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let trimmed = input.trim();
    let Some((from_str, to_str)) = trimmed.split_once("..") else {
        return Err("expected YYYY-MM-DD..YYYY-MM-DD".to_string());
    };

    let from = NaiveDate::parse_from_str(from_str.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid start date `{}`", from_str.trim()))?;
    let to = NaiveDate::parse_from_str(to_str.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid end date `{}`", to_str.trim()))?;

    if from > to {
        return Err("start date is after end date".to_string());
    }
    Ok((from, to))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
