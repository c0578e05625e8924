// Carts table widget: the sortable/filterable record table.
//
// Columns: Customer, Product, Price (original + discounted), Location,
// Flags, Date. The rows come pre-queried from `ViewState::table_rows`; this
// widget windows them around the selection and highlights the cursor row.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::store::CartRecord;
use crate::tui::ViewState;

/// Render the carts table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rows_data = state.table_rows();

    // Rows that fit inside the block: border (2) + header (1).
    let visible = area.height.saturating_sub(3) as usize;
    let start = window_start(state.selected_row, rows_data.len(), visible);

    let header = Row::new(vec![
        Cell::from("Customer"),
        Cell::from("Product"),
        Cell::from("Price"),
        Cell::from("Location"),
        Cell::from("Flags"),
        Cell::from("Date"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = rows_data
        .iter()
        .enumerate()
        .skip(start)
        .take(visible.max(1))
        .map(|(i, record)| {
            let style = if i == state.selected_row {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(record.first_name.clone()),
                Cell::from(record.short_product_name.clone()),
                Cell::from(format!(
                    "${:.2} (${:.2})",
                    record.original_price,
                    record.recovered_price()
                )),
                Cell::from(format!("{}, {}", record.city, record.country)),
                Cell::from(flag_summary(record)),
                Cell::from(format_date(record)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Min(16),
        Constraint::Length(18),
        Constraint::Min(14),
        Constraint::Length(12),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(build_title(state, rows_data.len())),
    );

    frame.render_widget(table, area);
}

/// First visible row index: keep the selection inside the window, preferring
/// to scroll only when the cursor would fall off the bottom.
pub fn window_start(selected: usize, total: usize, visible: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    let max_start = total - visible;
    selected.saturating_sub(visible.saturating_sub(1)).min(max_start)
}

/// Compact flag column: AI-answered, interested, purchased.
/// Unset flags render as dashes so the columns stay aligned.
pub fn flag_summary(record: &CartRecord) -> String {
    let ai = if record.answered_by_ai { "AI" } else { "--" };
    let interested = if record.interested { "INT" } else { "---" };
    let bought = if record.bought_from_automation {
        "BUY"
    } else {
        "---"
    };
    format!("{ai} {interested} {bought}")
}

/// Date column: `YYYY-MM-DD`, or a dash when the timestamp is unparseable.
pub fn format_date(record: &CartRecord) -> String {
    match record.created_at_local() {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => "--".to_string(),
    }
}

/// Build the table title with the visible/selected counts.
fn build_title(state: &ViewState, row_count: usize) -> Line<'static> {
    let mut title = format!("Carts ({row_count}");
    if row_count != state.records.len() {
        title.push_str(&format!(" of {}", state.records.len()));
    }
    title.push(')');
    if row_count > 0 {
        title.push_str(&format!(" [{} selected]", state.selected_row + 1));
    }
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
