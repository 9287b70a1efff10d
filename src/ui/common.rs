//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, namespace prompt, and
//! help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, ListState};

/// Render the header bar with the active namespace and counter overview.
///
/// Displays: namespace, counter counts by state, the data source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ns) = app.store.get() else {
        let line = Line::from(vec![
            Span::styled(" HITWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| No namespace selected"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let total = app.cards.len();
    let ready = app.ready_count();
    let failed = app.failed_count();

    // Overall status indicator
    let status_style = if failed > 0 {
        Style::default().fg(app.theme.failed)
    } else if ready < total {
        Style::default().fg(app.theme.loading)
    } else {
        Style::default().fg(app.theme.ready)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("HITWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(ns.to_string(), Style::default().fg(app.theme.highlight)),
        Span::raw(" │ "),
        Span::styled(format!("{}", total), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" counters │ "),
        Span::styled(format!("{}", ready), Style::default().fg(app.theme.ready)),
        Span::raw(" ready "),
        if failed > 0 {
            Span::styled(
                format!("{}", failed),
                Style::default().fg(app.theme.failed).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" failed │ "),
        Span::raw(app.source_description().to_string()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Format a count for display (e.g., 1234 -> "1.2K", 1234567 -> "1.2M").
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render the status bar at the bottom.
///
/// Shows context-sensitive controls. Also displays temporary status
/// messages and list fetch errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match &app.list {
        ListState::Failed(err) => format!(" Error: {} | r:retry n:namespace q:quit", err),
        ListState::Loading => " Loading... | q:quit".to_string(),
        ListState::Ready => {
            // Context-sensitive controls
            let controls = if app.input_active {
                "Type namespace | Enter:apply Esc:cancel"
            } else if app.show_detail {
                "1-4/←→:granularity ↑↓:counter r:retry Esc:back q:quit"
            } else {
                "↑↓:select Enter:detail 1-4:granularity n:namespace r:reload ?:help q:quit"
            };
            format!(" {}", controls)
        }
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the namespace entry prompt as a centered modal.
pub fn render_namespace_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let prompt_width = 44u16.min(area.width.saturating_sub(4));
    let prompt_height = 5u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(prompt_width)) / 2;
    let y = area.y + (area.height.saturating_sub(prompt_height)) / 2;
    let prompt_area = Rect::new(x, y, prompt_width, prompt_height);

    let block = Block::default()
        .title(" Namespace ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let lines = vec![
        Line::from(vec![
            Span::raw(" > "),
            Span::styled(app.input_text.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("_", Style::default().fg(app.theme.highlight)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Enter:apply Esc:cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    frame.render_widget(Clear, prompt_area);
    frame.render_widget(Paragraph::new(lines).block(block), prompt_area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Select counter"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Counter detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Granularity",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1         Realtime (last minute)"),
        Line::from("  2         Day (hourly)"),
        Line::from("  3         Month (daily)"),
        Line::from("  4         Year (monthly)"),
        Line::from("  ←/→ h/l   Cycle (in detail)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  n         Switch namespace"),
        Line::from("  r         Retry / reload"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay, responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(1_234_567), "1.2M");
    }
}
