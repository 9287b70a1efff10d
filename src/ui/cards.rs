//! Counter list rendering.
//!
//! Displays a table of all counters in the active namespace with totals,
//! the current granularity, a sparkline trend, and fetch status.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Card, CardState, ListState};
use crate::ui::common::format_count;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Width of the sparkline column in cells.
const SPARKLINE_WIDTH: usize = 12;

/// Render the counter list for the active namespace.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match &app.list {
        ListState::Loading => {
            render_message(frame, app, area, "Loading counters...", Style::default());
            return;
        }
        ListState::Failed(err) => {
            let style = Style::default().fg(app.theme.failed);
            render_message(frame, app, area, &format!("Error: {} (r to retry)", err), style);
            return;
        }
        ListState::Ready => {}
    }

    if app.cards.is_empty() {
        let style = Style::default().add_modifier(Modifier::DIM);
        render_message(frame, app, area, "No data in this namespace", style);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Counter"),
        Cell::from("Total"),
        Cell::from("View"),
        Cell::from("Trend"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app.cards.iter().map(|card| card_row(app, card)).collect();

    let widths = [
        Constraint::Fill(3),                          // Counter id
        Constraint::Length(8),                        // Total
        Constraint::Length(10),                       // View
        Constraint::Length(SPARKLINE_WIDTH as u16),   // Trend
        Constraint::Min(10),                          // Status
    ];

    let selected = app.selected.min(app.cards.len().saturating_sub(1));

    let title = format!(
        " Counters ({}) [{}/{}] ",
        app.cards.len(),
        selected + 1,
        app.cards.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn card_row<'a>(app: &App, card: &'a Card) -> Row<'a> {
    let status_style = app.theme.status_style(&card.state);
    let status = match &card.state {
        CardState::Loading => "loading".to_string(),
        CardState::Ready => "ready".to_string(),
        CardState::Failed(_) => "failed".to_string(),
    };

    let total = match card.state {
        CardState::Loading => "...".to_string(),
        _ => card.total().map(format_count).unwrap_or_else(|| "-".to_string()),
    };

    let trend = card
        .current_series()
        .map(|s| spark_cell(&s.hits))
        .unwrap_or_else(|| " ".repeat(SPARKLINE_WIDTH));

    Row::new(vec![
        Cell::from(card.id.clone()),
        Cell::from(total),
        Cell::from(card.mode.label()),
        Cell::from(Span::styled(trend, Style::default().fg(app.theme.chart))),
        Cell::from(status).style(status_style),
    ])
}

fn render_message(frame: &mut Frame, app: &App, area: Rect, message: &str, style: Style) {
    let block = Block::default()
        .title(" Counters ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {}", message), style)),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render hit counts as a fixed-width character sparkline, scaled to the
/// largest value in view.
fn spark_cell(hits: &[u64]) -> String {
    if hits.is_empty() {
        return " ".repeat(SPARKLINE_WIDTH);
    }

    // Take the most recent values that fit the column
    let tail: Vec<u64> =
        hits.iter().rev().take(SPARKLINE_WIDTH).rev().copied().collect();
    let max = tail.iter().copied().max().unwrap_or(0);

    let mut out: String = tail
        .iter()
        .map(|&v| {
            if max == 0 {
                SPARKLINE_CHARS[0]
            } else {
                let level = (v * 7 + max / 2) / max;
                SPARKLINE_CHARS[level.min(7) as usize]
            }
        })
        .collect();

    // Left-pad so short series stay right-aligned like the chart
    while out.chars().count() < SPARKLINE_WIDTH {
        out.insert(0, ' ');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_scales_to_max() {
        let cell = spark_cell(&[0, 5, 10]);
        let chars: Vec<char> = cell.chars().collect();
        assert_eq!(chars.len(), SPARKLINE_WIDTH);
        assert_eq!(chars[SPARKLINE_WIDTH - 3], '▁');
        assert_eq!(chars[SPARKLINE_WIDTH - 1], '█');
    }

    #[test]
    fn sparkline_all_zero_is_flat() {
        let cell = spark_cell(&[0, 0, 0]);
        assert!(cell.trim_start().chars().all(|c| c == '▁'));
    }

    #[test]
    fn sparkline_truncates_to_most_recent() {
        let hits: Vec<u64> = (0..30).collect();
        let cell = spark_cell(&hits);
        assert_eq!(cell.chars().count(), SPARKLINE_WIDTH);
        // The most recent (largest) value ends the line at full height
        assert_eq!(cell.chars().last(), Some('█'));
    }

    #[test]
    fn sparkline_empty_is_blank() {
        assert_eq!(spark_cell(&[]), " ".repeat(SPARKLINE_WIDTH));
    }
}
