// Status bar widget: fetch indicator, record counts, view tabs.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{FetchStatus, ViewId};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [fetch indicator] [record counts] [view tabs] [last refresh]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color, status_text) = fetch_indicator(state.fetch_status);
    spans.push(Span::styled(
        format!(" {} ", dot),
        Style::default().fg(dot_color),
    ));
    spans.push(Span::styled(status_text, Style::default().fg(Color::Gray)));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!(
            "{} carts in window / {} total",
            state.records.len(),
            state.total_records
        ),
        Style::default().fg(Color::White),
    ));

    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.extend(view_tab_spans(state.active_view));

    if let Some(refreshed) = state.last_refresh {
        spans.push(Span::styled(
            format!("| refreshed {}", refreshed.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the fetch indicator dot, its color, and a short status word.
pub fn fetch_indicator(status: FetchStatus) -> (&'static str, Color, &'static str) {
    match status {
        FetchStatus::Idle => ("●", Color::DarkGray, "idle"),
        FetchStatus::Loading => ("●", Color::Yellow, "loading"),
        FetchStatus::Loaded => ("●", Color::Green, "live"),
        FetchStatus::Failed => ("●", Color::Red, "error"),
    }
}

/// Build view tab spans with the active view highlighted.
/// E.g. "[1:Overview] [2:Carts] [3:Analytics]"
pub fn view_tab_spans(active: ViewId) -> Vec<Span<'static>> {
    let views = [
        (ViewId::Overview, "1:Overview"),
        (ViewId::Carts, "2:Carts"),
        (ViewId::Analytics, "3:Analytics"),
    ];

    let mut spans = Vec::new();
    for (view_id, label) in views {
        let style = if view_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}]", label), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_colors_per_status() {
        assert_eq!(fetch_indicator(FetchStatus::Loaded).1, Color::Green);
        assert_eq!(fetch_indicator(FetchStatus::Failed).1, Color::Red);
        assert_eq!(fetch_indicator(FetchStatus::Loading).1, Color::Yellow);
        assert_eq!(fetch_indicator(FetchStatus::Idle).1, Color::DarkGray);
    }

    #[test]
    fn active_view_tab_is_highlighted() {
        let spans = view_tab_spans(ViewId::Carts);
        // Three labels with separators interleaved.
        assert_eq!(spans.len(), 6);
        let active = spans
            .iter()
            .find(|s| s.content.contains("2:Carts"))
            .expect("carts tab present");
        assert_eq!(active.style.bg, Some(Color::White));
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
