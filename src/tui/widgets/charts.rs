// Analytics widget: daily time-series charts and categorical breakdowns.
//
// Layout (from `layout::charts_grid`):
//   revenue over time (full width)
//   interested/day + purchased    | sms opt-ins/day + purchased
//   ai vs human answered          | human-handled purchases
//   call status breakdown         | top countries

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::analytics::{ChartStats, DailyBucket};
use crate::tui::layout::charts_grid;
use crate::tui::ViewState;

/// Render the Analytics view into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let cells = charts_grid(area);
    let charts = &state.charts;

    render_revenue(frame, cells[0], charts);
    render_volume_vs_purchased(
        frame,
        cells[1],
        format!(
            "Interested / day - {} total, {} purchased ({}%)",
            charts.total_interested, charts.interested_purchased, charts.interest_purchase_rate
        ),
        &charts.days,
        |d| d.interested_total,
        |d| d.interested_purchased,
    );
    render_volume_vs_purchased(
        frame,
        cells[2],
        format!(
            "SMS opt-ins / day - {} total, {} purchased ({}%)",
            charts.total_sms, charts.sms_purchased, charts.sms_purchase_rate
        ),
        &charts.days,
        |d| d.sms_total,
        |d| d.sms_purchased,
    );
    render_ai_split(frame, cells[3], charts);
    render_manual_purchases(frame, cells[4], charts);
    render_breakdown(frame, cells[5], "Call Status", &state.status_breakdown);
    render_breakdown(frame, cells[6], "Top Countries", &state.top_countries);
}

// ---------------------------------------------------------------------------
// Time-series charts
// ---------------------------------------------------------------------------

fn render_revenue(frame: &mut Frame, area: Rect, charts: &ChartStats) {
    let title = format!("Automation Revenue Over Time - ${:.2} total", charts.total_revenue);
    if charts.days.is_empty() {
        render_empty(frame, area, &title);
        return;
    }

    let points = day_points(&charts.days, |d| d.revenue);
    let datasets = vec![Dataset::default()
        .name("revenue $")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];

    let max_y = max_value(&points);
    let chart = Chart::new(datasets)
        .block(titled_block(&title))
        .x_axis(date_axis(&charts.days))
        .y_axis(value_axis(max_y, "$"));
    frame.render_widget(chart, area);
}

/// A daily-volume bar series with a purchased-count line over it.
fn render_volume_vs_purchased(
    frame: &mut Frame,
    area: Rect,
    title: String,
    days: &[DailyBucket],
    volume: fn(&DailyBucket) -> u32,
    purchased: fn(&DailyBucket) -> u32,
) {
    if days.is_empty() {
        render_empty(frame, area, &title);
        return;
    }

    let volume_points = day_points(days, |d| volume(d) as f64);
    let purchased_points = day_points(days, |d| purchased(d) as f64);

    let datasets = vec![
        Dataset::default()
            .name("carts")
            .marker(symbols::Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(Color::Blue))
            .data(&volume_points),
        Dataset::default()
            .name("purchased")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&purchased_points),
    ];

    let max_y = max_value(&volume_points);
    let chart = Chart::new(datasets)
        .block(titled_block(&title))
        .x_axis(date_axis(days))
        .y_axis(value_axis(max_y, ""));
    frame.render_widget(chart, area);
}

fn render_ai_split(frame: &mut Frame, area: Rect, charts: &ChartStats) {
    let title = format!(
        "AI vs Human Answered - {} AI / {} human",
        charts.total_ai, charts.total_non_ai
    );
    if charts.days.is_empty() {
        render_empty(frame, area, &title);
        return;
    }

    let ai_points = day_points(&charts.days, |d| d.ai_total as f64);
    let human_points = day_points(&charts.days, |d| d.non_ai_total as f64);

    let datasets = vec![
        Dataset::default()
            .name("AI")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&ai_points),
        Dataset::default()
            .name("human")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&human_points),
    ];

    let max_y = max_value(&ai_points).max(max_value(&human_points));
    let chart = Chart::new(datasets)
        .block(titled_block(&title))
        .x_axis(date_axis(&charts.days))
        .y_axis(value_axis(max_y, ""));
    frame.render_widget(chart, area);
}

fn render_manual_purchases(frame: &mut Frame, area: Rect, charts: &ChartStats) {
    let title = format!(
        "Human-Handled Purchases - {} total",
        charts.total_manual_purchases
    );
    if charts.days.is_empty() {
        render_empty(frame, area, &title);
        return;
    }

    let points = day_points(&charts.days, |d| d.manual_purchased as f64);
    let datasets = vec![Dataset::default()
        .name("purchases")
        .marker(symbols::Marker::HalfBlock)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(Color::Magenta))
        .data(&points)];

    let max_y = max_value(&points);
    let chart = Chart::new(datasets)
        .block(titled_block(&title))
        .x_axis(date_axis(&charts.days))
        .y_axis(value_axis(max_y, ""));
    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Categorical breakdowns
// ---------------------------------------------------------------------------

fn render_breakdown(frame: &mut Frame, area: Rect, title: &str, entries: &[(String, usize)]) {
    if entries.is_empty() {
        render_empty(frame, area, title);
        return;
    }

    let bars: Vec<Bar> = entries
        .iter()
        .map(|(name, count)| {
            Bar::default()
                .value(*count as u64)
                .label(truncate_label(name, 10))
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(title))
        .bar_width(10)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

/// Truncate a label to `max` characters, marking the cut with `…`.
pub fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Map the daily buckets to `(day index, value)` chart points.
fn day_points(days: &[DailyBucket], value: impl Fn(&DailyBucket) -> f64) -> Vec<(f64, f64)> {
    days.iter()
        .enumerate()
        .map(|(i, day)| (i as f64, value(day)))
        .collect()
}

fn max_value(points: &[(f64, f64)]) -> f64 {
    points.iter().map(|(_, y)| *y).fold(0.0, f64::max)
}

fn titled_block(title: &str) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(Span::styled(
        format!(" {title} "),
        Style::default().fg(Color::Cyan),
    ))
}

/// X axis spanning the day indices, labeled with the first/middle/last dates.
fn date_axis(days: &[DailyBucket]) -> Axis<'static> {
    let max_x = (days.len().saturating_sub(1)).max(1) as f64;
    let mut labels: Vec<String> = Vec::new();
    if let Some(first) = days.first() {
        labels.push(first.date.format("%b %d").to_string());
    }
    if days.len() > 2 {
        labels.push(days[days.len() / 2].date.format("%b %d").to_string());
    }
    if days.len() > 1 {
        if let Some(last) = days.last() {
            labels.push(last.date.format("%b %d").to_string());
        }
    }

    Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, max_x])
        .labels(labels)
}

/// Y axis from zero to a padded maximum, labeled at 0 / mid / max.
fn value_axis(max_y: f64, unit: &str) -> Axis<'static> {
    let top = if max_y <= 0.0 { 1.0 } else { max_y * 1.1 };
    let labels = vec![
        format!("0{unit}"),
        format!("{:.0}{unit}", top / 2.0),
        format!("{top:.0}{unit}"),
    ];
    Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, top])
        .labels(labels)
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str) {
    let paragraph = Paragraph::new("no data in this window")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
        .block(titled_block(title));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute_chart_stats;
    use crate::store::CartRecord;

    fn record_on(day: &str, interested: bool, sms: bool, ai: bool, bought: bool) -> CartRecord {
        CartRecord {
            call_id: "c".into(),
            created_at: format!("{day}T10:00:00"),
            interested,
            agreed_to_get_sms: sms,
            answered_by_ai: ai,
            bought_from_automation: bought,
            original_price: 50.0,
            call_status: "ended".into(),
            country: "Portugal".into(),
            ..CartRecord::default()
        }
    }

    fn populated_state() -> ViewState {
        let records = vec![
            record_on("2026-03-12", true, false, true, true),
            record_on("2026-03-13", true, true, false, false),
            record_on("2026-03-14", false, true, false, true),
        ];
        let mut state = ViewState::default();
        state.charts = compute_chart_stats(&records);
        state.status_breakdown = crate::analytics::distribution::call_status_distribution(&records);
        state.top_countries = crate::analytics::distribution::top_countries(&records, 5);
        state
    }

    #[test]
    fn day_points_index_by_day() {
        let state = populated_state();
        let points = day_points(&state.charts.days, |d| d.revenue);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].0, 0.0);
        assert_eq!(points[2].0, 2.0);
    }

    #[test]
    fn max_value_of_empty_is_zero() {
        assert_eq!(max_value(&[]), 0.0);
        assert_eq!(max_value(&[(0.0, 3.0), (1.0, 7.0)]), 7.0);
    }

    #[test]
    fn truncate_label_behaviour() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("exactly-10", 10), "exactly-10");
        assert_eq!(truncate_label("customer-ended-call", 10), "customer-…");
    }

    #[test]
    fn render_does_not_panic_with_data() {
        let backend = ratatui::backend::TestBackend::new(140, 45);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = populated_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_empty() {
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_single_day_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let records = vec![record_on("2026-03-14", true, true, true, true)];
        let mut state = ViewState::default();
        state.charts = compute_chart_stats(&records);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
