use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Pad or truncate a value so it occupies exactly `width` characters. Every
/// table in the app is rendered as monospaced text, so consistent cell widths
/// are what keep the columns aligned.
pub(crate) fn fit_cell(text: &str, width: usize) -> String {
    let mut cell: String = text.chars().take(width).collect();
    let used = cell.chars().count();
    if used < width {
        cell.push_str(&" ".repeat(width - used));
    }
    cell
}

/// Format a score the way the tables show it: whole numbers without a
/// trailing `.0`, everything else with however many decimals it carries.
pub(crate) fn display_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Render a completion percentage as a fixed-width block-character bar.
pub(crate) fn rate_bar(rate: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let clamped = rate.clamp(0.0, 100.0);
    let filled = (((clamped / 100.0) * width as f64).round() as usize).min(width);
    let mut bar = String::with_capacity(width * 3);
    bar.push_str(&"█".repeat(filled));
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_padded_and_truncated() {
        assert_eq!(fit_cell("abc", 5), "abc  ");
        assert_eq!(fit_cell("abcdefgh", 5), "abcde");
        assert_eq!(fit_cell("", 3), "   ");
    }

    #[test]
    fn whole_scores_drop_the_decimal_point() {
        assert_eq!(display_score(10.0), "10");
        assert_eq!(display_score(12.5), "12.5");
        assert_eq!(display_score(0.0), "0");
    }

    #[test]
    fn rate_bars_scale_with_the_percentage() {
        assert_eq!(rate_bar(100.0, 4), "████");
        assert_eq!(rate_bar(50.0, 4), "██░░");
        assert_eq!(rate_bar(0.0, 4), "░░░░");
    }
}
