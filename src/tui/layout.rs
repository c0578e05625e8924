// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                               |
// +--------------------------------------------------+
// | Filter Bar (3 rows)                              |
// +--------------------------------------------------+
// | Main Panel (fill)                                |
// |   Overview | Carts | Analytics                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                 |
// +--------------------------------------------------+
//
// Overlays (record detail, quit confirmation) render centered on top of
// the main panel and are not part of the fixed layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: fetch status, record counts, view tabs.
    pub status_bar: Rect,
    /// Second zone: time-filter tabs and the table query summary.
    pub filter_bar: Rect,
    /// View-switched content area.
    pub main_panel: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(3), // filter bar
            Constraint::Min(10),   // main panel
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        filter_bar: vertical[1],
        main_panel: vertical[2],
        help_bar: vertical[3],
    }
}

/// Split the Overview main panel into a 3x2 grid of stat-card cells.
pub fn summary_grid(area: Rect) -> Vec<Rect> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut cells = Vec::with_capacity(6);
    for row in rows.iter() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(*row);
        cells.extend(cols.iter().copied());
    }
    cells
}

/// Split the Analytics main panel into chart cells: a full-width revenue row
/// followed by three two-column rows.
pub fn charts_grid(area: Rect) -> Vec<Rect> {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(28), // revenue (full width)
            Constraint::Percentage(24),
            Constraint::Percentage(24),
            Constraint::Percentage(24),
        ])
        .split(area);

    let mut cells = vec![rows[0]];
    for row in rows.iter().skip(1) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);
        cells.extend(cols.iter().copied());
    }
    cells
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// A reasonable terminal size for testing.
    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("filter_bar", layout.filter_bar),
            ("main_panel", layout.main_panel),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn layout_fixed_row_heights() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.filter_bar.height, 3);
        assert_eq!(layout.help_bar.height, 1);
    }

    #[test]
    fn layout_zones_stack_vertically() {
        let layout = build_layout(test_area());
        assert!(layout.status_bar.y < layout.filter_bar.y);
        assert!(layout.filter_bar.y < layout.main_panel.y);
        assert!(layout.main_panel.y < layout.help_bar.y);
    }

    #[test]
    fn layout_fits_within_area() {
        let area = test_area();
        let layout = build_layout(area);
        for rect in [
            layout.status_bar,
            layout.filter_bar,
            layout.main_panel,
            layout.help_bar,
        ] {
            assert!(rect.x + rect.width <= area.width, "{rect:?} exceeds width");
            assert!(rect.y + rect.height <= area.height, "{rect:?} exceeds height");
        }
    }

    #[test]
    fn summary_grid_has_six_cells() {
        let layout = build_layout(test_area());
        let cells = summary_grid(layout.main_panel);
        assert_eq!(cells.len(), 6);
        for cell in &cells {
            assert!(cell.width > 0 && cell.height > 0);
        }
    }

    #[test]
    fn charts_grid_has_seven_cells_with_wide_first() {
        let layout = build_layout(test_area());
        let cells = charts_grid(layout.main_panel);
        assert_eq!(cells.len(), 7);
        // Revenue row spans the full panel width; the others are half-width.
        assert_eq!(cells[0].width, layout.main_panel.width);
        assert!(cells[1].width < cells[0].width);
    }

    #[test]
    fn layout_small_terminal_still_valid() {
        let area = Rect::new(0, 0, 40, 16);
        let layout = build_layout(area);
        for rect in [
            layout.status_bar,
            layout.filter_bar,
            layout.main_panel,
            layout.help_bar,
        ] {
            assert!(rect.width > 0 && rect.height > 0, "{rect:?} has zero area");
        }
    }
}
