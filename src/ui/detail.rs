//! Counter detail overlay rendering.
//!
//! Displays a modal overlay with one counter's all-time total, a
//! granularity selector, a bar chart of the selected sequence, and the
//! per-bucket label/value table.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table, Tabs},
    Frame,
};

use crate::app::{App, CardState};
use crate::data::{ChartSeries, Mode};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Render the counter detail as a modal overlay.
///
/// Shows the selected counter's total, the four granularity tabs, the
/// chart for the active granularity, and the bucket breakdown with its
/// mean.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(card) = app.selected_card() else {
        return;
    };

    // Width: 95% of screen, clamped to [MIN_OVERLAY_WIDTH, 120]
    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 120);
    // Height: 90% of screen, clamped to [MIN_OVERLAY_HEIGHT, 30]
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 30);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(4), // Header with counter info
        Constraint::Length(1), // Granularity tabs
        Constraint::Min(6),    // Chart
        Constraint::Length(4), // Bucket table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(&card.state);
    let status_label = match &card.state {
        CardState::Loading => "Loading",
        CardState::Ready => "Ready",
        CardState::Failed(_) => "Failed",
    };

    let total = header_total_text(&card.state, card.total());

    let header_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} ", card.id),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            Span::raw(" Total: "),
            Span::styled(total, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("    Status: "),
            Span::styled(status_label, status_style.add_modifier(Modifier::BOLD)),
        ]),
    ];

    let header_block = Block::default()
        .title(" Counter Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== GRANULARITY TABS =====
    let titles: Vec<Line> = Mode::ALL
        .iter()
        .enumerate()
        .map(|(i, m)| Line::from(format!(" {}:{} ", i + 1, m.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(card.mode.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, chunks[1]);

    // ===== CHART + BUCKETS =====
    match &card.state {
        CardState::Failed(err) => {
            render_error(frame, app, chunks[2], err);
        }
        CardState::Loading if card.current_series().is_none() => {
            let block = chart_block(app, "");
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Loading...",
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), chunks[2]);
        }
        _ => {
            if let Some(series) = card.current_series() {
                render_chart(frame, app, chunks[2], card.mode, series);
                // Realtime trades the per-bucket columns for a one-line
                // summary of the rolling minute
                if card.mode == Mode::Realtime {
                    render_realtime_summary(frame, app, chunks[3], series);
                } else {
                    render_buckets(frame, app, chunks[3], series);
                }
            }
        }
    }

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " 1-4/←→:granularity  r:retry  Esc:close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[4]);
}

fn chart_block(app: &App, title: &str) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect, mode: Mode, series: &ChartSeries) {
    let title = if mode == Mode::Realtime {
        " Realtime ".to_string()
    } else {
        format!(" {} ({} hits) ", mode.label(), series.total_hits())
    };

    let chart = Sparkline::default()
        .block(chart_block(app, &title))
        .data(series.hits.iter().copied())
        .style(Style::default().fg(app.theme.chart));

    frame.render_widget(chart, area);
}

/// Render the rolling-minute summary shown instead of bucket columns in
/// realtime mode.
fn render_realtime_summary(frame: &mut Frame, app: &App, area: Rect, series: &ChartSeries) {
    let summary = format!(
        " Over the last minute ({}) received {} hits",
        Local::now().format("%-I:%M %p"),
        series.total_hits()
    );

    let lines = vec![Line::from(Span::styled(
        summary,
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the two-row bucket table: labels on top, hit counts below, with
/// a trailing mean column.
fn render_buckets(frame: &mut Frame, app: &App, area: Rect, series: &ChartSeries) {
    // Only the most recent buckets fit; keep labels and values aligned
    let cell_width: u16 = 5;
    let visible = ((area.width.saturating_sub(10)) / cell_width).max(1) as usize;
    let skip = series.hits.len().saturating_sub(visible);

    let mut label_cells: Vec<Cell> = series
        .labels
        .iter()
        .skip(skip)
        .map(|l| Cell::from(Span::styled(l.clone(), Style::default().fg(app.theme.label))))
        .collect();
    label_cells.push(Cell::from(Span::styled("mean", Style::default().fg(app.theme.label))));

    let mut value_cells: Vec<Cell> = series
        .hits
        .iter()
        .skip(skip)
        .map(|&v| {
            let style = if v == 0 {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Cell::from(Span::styled(hit_cell_text(v), style))
        })
        .collect();
    value_cells.push(Cell::from(Span::styled(
        series.mean().to_string(),
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
    )));

    let column_count = label_cells.len();
    let mut widths = vec![Constraint::Length(cell_width); column_count];
    if let Some(last) = widths.last_mut() {
        *last = Constraint::Length(6);
    }

    let table = Table::new([Row::new(label_cells), Row::new(value_cells)], widths)
        .column_spacing(0)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(table, area);
}

fn render_error(frame: &mut Frame, app: &App, area: Rect, err: &str) {
    let block = chart_block(app, " Fetch failed ");
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", err),
            Style::default().fg(app.theme.failed),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press r to retry",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Bucket cell text: zero counts render as a dash.
fn hit_cell_text(v: u64) -> String {
    if v == 0 {
        "-".to_string()
    } else {
        v.to_string()
    }
}

/// Header total text. The overlay has room for the exact all-time count,
/// so it is never abbreviated here (the list column is).
fn header_total_text(state: &CardState, total: Option<u64>) -> String {
    match state {
        CardState::Loading => "...".to_string(),
        _ => total.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_buckets_render_as_dash() {
        assert_eq!(hit_cell_text(0), "-");
        assert_eq!(hit_cell_text(7), "7");
    }

    #[test]
    fn header_total_is_exact_not_abbreviated() {
        assert_eq!(
            header_total_text(&CardState::Ready, Some(1_234_567)),
            "1234567"
        );
        assert_eq!(header_total_text(&CardState::Loading, None), "...");
        assert_eq!(header_total_text(&CardState::Failed("boom".into()), None), "-");
    }
}
