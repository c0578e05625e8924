// Overview widget: the six summary stat cards in a 3x2 grid.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::analytics::SummaryStats;
use crate::tui::layout::summary_grid;
use crate::tui::ViewState;

/// One card's content: title, headline value, one-line description.
struct Card {
    title: &'static str,
    value: String,
    description: &'static str,
}

/// Render the Overview stat cards into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let cells = summary_grid(area);
    for (card, cell) in build_cards(&state.summary).into_iter().zip(cells) {
        render_card(frame, cell, &card);
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &Card) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", card.value),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", card.description),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(Span::styled(
                format!(" {} ", card.title),
                Style::default().fg(Color::Cyan),
            )),
    );
    frame.render_widget(paragraph, area);
}

/// Build the six cards from the summary stats.
///
/// Ratio cards read "n / total" against the carts in the active window.
fn build_cards(summary: &SummaryStats) -> Vec<Card> {
    let total = summary.total_carts;
    vec![
        Card {
            title: "Total Carts",
            value: total.to_string(),
            description: "Abandoned carts called in this window",
        },
        Card {
            title: "Successful Calls",
            value: format!("{} / {}", summary.successful_calls, total),
            description: "Calls that connected",
        },
        Card {
            title: "Automation Revenue",
            value: format!("${:.2}", summary.automation_revenue),
            description: "Recovered revenue (10% discount applied)",
        },
        Card {
            title: "Interested Customers",
            value: format!("{} / {}", summary.interested, total),
            description: "Customers who showed interest",
        },
        Card {
            title: "Agreed to SMS",
            value: format!("{} / {}", summary.agreed_to_sms, total),
            description: "Customers who opted in for SMS",
        },
        Card {
            title: "Answered & Purchased",
            value: format!("{} / {}", summary.answered_and_bought, total),
            description: "Answered in person and bought",
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
