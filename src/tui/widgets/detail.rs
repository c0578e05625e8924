// Record detail overlay.
//
// Centered modal showing the full record behind a table row: customer and
// location, product and order, call outcome, and the conversation summary
// and transcript. Scrolls vertically; the transcript can be long.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::CartRecord;

/// Fraction of the screen the overlay occupies.
const WIDTH_PERCENT: u16 = 70;
const HEIGHT_PERCENT: u16 = 80;

/// Render the detail overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, record: &CartRecord, scroll: usize) {
    let overlay = centered_rect(area, WIDTH_PERCENT, HEIGHT_PERCENT);

    // Clear the area behind the dialog so it renders cleanly on top
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Cart Details ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(build_lines(record))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));

    frame.render_widget(paragraph, overlay);
}

/// Build the overlay's text content.
pub fn build_lines(record: &CartRecord) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    section(&mut lines, "Customer");
    field(&mut lines, "Name", &record.first_name);
    field(&mut lines, "Email", &record.email);
    field(&mut lines, "Phone", &record.phone);
    field(
        &mut lines,
        "Location",
        &format!("{}, {}", record.city, record.country),
    );

    section(&mut lines, "Product & Order");
    field(&mut lines, "Product", &record.product_name);
    field(
        &mut lines,
        "Original price",
        &format!("${:.2}", record.original_price),
    );
    field(
        &mut lines,
        "Discounted price",
        &format!("${:.2}", record.recovered_price()),
    );
    field(&mut lines, "Checkout ID", &record.checkout_id);
    field(&mut lines, "Created", &record.created_at);

    section(&mut lines, "Call Outcome");
    field(&mut lines, "Status", &record.call_status);
    flags_line(&mut lines, record);
    field(&mut lines, "End reason", &record.ended_reason);
    if !record.recording_url.is_empty() {
        field(&mut lines, "Recording", &record.recording_url);
    }

    if !record.summary.is_empty() || !record.transcript.is_empty() {
        section(&mut lines, "Conversation");
        if !record.summary.is_empty() {
            field(&mut lines, "Summary", &record.summary);
        }
        if !record.transcript.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Transcript:",
                Style::default().fg(Color::Gray),
            )));
            for transcript_line in record.transcript.lines() {
                lines.push(Line::from(Span::raw(format!("    {transcript_line}"))));
            }
        }
    }

    lines
}

fn section(lines: &mut Vec<Line<'static>>, title: &str) {
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("── {title} "),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
}

fn field(lines: &mut Vec<Line<'static>>, label: &str, value: &str) {
    let shown = if value.is_empty() { "--" } else { value };
    lines.push(Line::from(vec![
        Span::styled(format!("  {label}: "), Style::default().fg(Color::Gray)),
        Span::styled(shown.to_string(), Style::default().fg(Color::White)),
    ]));
}

/// One line of yes/no outcome flags, set flags highlighted green.
fn flags_line(lines: &mut Vec<Line<'static>>, record: &CartRecord) {
    let flags = [
        ("connected", record.call_successful),
        ("interested", record.interested),
        ("purchased", record.bought_from_automation),
        ("sms opt-in", record.agreed_to_get_sms),
        ("sms sent", record.received_sms),
        ("ai answered", record.answered_by_ai),
    ];

    let mut spans = vec![Span::styled("  Flags: ", Style::default().fg(Color::Gray))];
    for (label, set) in flags {
        let style = if set {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{label}] "), style));
    }
    lines.push(Line::from(spans));
}

/// Compute a centered rectangle covering the given percentages of `area`.
fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(height_percent)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(width_percent)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> CartRecord {
        CartRecord {
            call_id: "call_1".into(),
            first_name: "Marta".into(),
            email: "marta@example.com".into(),
            phone: "+34600111222".into(),
            city: "Sevilla".into(),
            country: "Spain".into(),
            product_name: "Ceramic Tagine & Serving Set".into(),
            original_price: 89.99,
            checkout_id: "chk_456".into(),
            created_at: "2026-03-14T09:26:53+00:00".into(),
            call_status: "ended".into(),
            call_successful: true,
            ended_reason: "customer-ended-call".into(),
            recording_url: "https://cdn.example.com/rec/1.mp3".into(),
            summary: "Customer agreed to buy.".into(),
            transcript: "AI: Hello\nCustomer: Hi".into(),
            interested: true,
            bought_from_automation: true,
            ..CartRecord::default()
        }
    }

    #[test]
    fn lines_cover_all_sections() {
        let text: String = build_lines(&full_record())
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.to_string())
                    .collect::<String>()
                    + "\n"
            })
            .collect();

        assert!(text.contains("Customer"));
        assert!(text.contains("Product & Order"));
        assert!(text.contains("Call Outcome"));
        assert!(text.contains("Conversation"));
        assert!(text.contains("Marta"));
        assert!(text.contains("$89.99"));
        assert!(text.contains("$80.99"));
        assert!(text.contains("https://cdn.example.com/rec/1.mp3"));
        assert!(text.contains("Customer: Hi"));
    }

    #[test]
    fn empty_fields_render_as_dashes_and_skip_conversation() {
        let record = CartRecord::default();
        let text: String = build_lines(&record)
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.to_string())
                    .collect::<String>()
                    + "\n"
            })
            .collect();

        assert!(text.contains("Name: --"));
        // No summary or transcript -> no Conversation section.
        assert!(!text.contains("Conversation"));
        // No recording URL -> no Recording field.
        assert!(!text.contains("Recording:"));
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(area, 70, 80);
        assert!(rect.x >= area.x && rect.y >= area.y);
        assert!(rect.x + rect.width <= area.width);
        assert!(rect.y + rect.height <= area.height);
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let record = full_record();
        terminal
            .draw(|frame| render(frame, frame.area(), &record, 0))
            .unwrap();
        // Deep scroll must not panic either.
        terminal
            .draw(|frame| render(frame, frame.area(), &record, 500))
            .unwrap();
    }
}
