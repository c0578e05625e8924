// Filter bar widget: time-window tabs, custom-range input, query summary.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::analytics::table::TriFilter;
use crate::analytics::TimeFilter;
use crate::protocol::ViewId;
use crate::tui::ViewState;

/// Render the filter bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.extend(window_tab_spans(&state.time_filter));

    if let TimeFilter::Custom { from, to } = &state.time_filter {
        spans.push(Span::styled(
            format!(" {from} .. {to} "),
            Style::default().fg(Color::Cyan),
        ));
    }

    if state.range_mode {
        spans.push(Span::styled(
            format!(" range: {}_", state.range_input),
            Style::default().fg(Color::Yellow),
        ));
        if let Some(ref error) = state.range_error {
            spans.push(Span::styled(
                format!(" ({error})"),
                Style::default().fg(Color::Red),
            ));
        }
    }

    // Table query summary only matters on the Carts view.
    if state.active_view == ViewId::Carts {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.extend(query_spans(state));
    }

    // A failed fetch leaves its notice here, next to the controls it affects.
    if let Some(ref notice) = state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Window & Filters"),
    );
    frame.render_widget(paragraph, area);
}

/// Build the time-window tab spans with the active window highlighted.
fn window_tab_spans(active: &TimeFilter) -> Vec<Span<'static>> {
    let windows: [(&str, &str); 5] = [
        ("t", "Today"),
        ("w", "Week"),
        ("m", "Month"),
        ("a", "All"),
        ("c", "Custom"),
    ];

    let active_label = active.label();
    let mut spans = Vec::new();
    for (shortcut, label) in windows {
        let style = if label == active_label {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{shortcut}:{label}]"), style));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Summarize the table query: search text, flag filters, sort order.
fn query_spans(state: &ViewState) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    if state.search_mode {
        spans.push(Span::styled(
            format!("search: {}_", state.query.search),
            Style::default().fg(Color::Yellow),
        ));
    } else if !state.query.search.is_empty() {
        spans.push(Span::styled(
            format!("search: \"{}\"", state.query.search),
            Style::default().fg(Color::Yellow),
        ));
    }

    for (name, filter) in [
        ("int", state.query.interested),
        ("buy", state.query.purchased),
        ("ai", state.query.ai_handled),
    ] {
        if filter != TriFilter::All {
            spans.push(Span::styled(
                format!(" {name}:{}", filter.label()),
                Style::default().fg(Color::Magenta),
            ));
        }
    }

    spans.push(Span::styled(
        format!(
            " sort:{}{}",
            state.query.sort_key.label(),
            state.query.direction.arrow()
        ),
        Style::default().fg(Color::Gray),
    ));

    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
