// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod config;
mod data;
mod events;
mod source;
mod store;
mod ui;

use app::App;
use source::{ApiClient, CounterSource, HttpSource};
use store::{FileSync, NamespaceStore};

#[derive(Parser, Debug)]
#[command(name = "hitwatch")]
#[command(about = "Dashboard TUI for time-bucketed hit counters served by an incr API")]
struct Args {
    /// Base URL of the incr API server
    #[arg(short, long)]
    url: Option<String>,

    /// Namespace to open on startup (overrides the persisted selection)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File persisting the last selected namespace
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Realtime poll interval in milliseconds
    #[arg(short, long)]
    refresh: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Layered settings: defaults, file, environment, then CLI flags on top
    let mut settings = config::Settings::load(args.config.as_deref())?;
    if let Some(url) = args.url {
        settings.url = url;
    }
    if let Some(ns) = args.namespace {
        settings.namespace = Some(ns);
    }
    if let Some(path) = args.state_file {
        settings.state_file = path;
    }
    if let Some(ms) = args.refresh {
        settings.refresh_ms = ms.max(1);
    }

    // Build a tokio runtime for HTTP fetches; the TUI loop itself stays
    // synchronous and drains completed fetches via the source channel.
    let rt = tokio::runtime::Runtime::new()?;

    let client = ApiClient::new(&settings.url)?;
    let source = Box::new(HttpSource::new(client, rt.handle().clone()));

    let mut store =
        NamespaceStore::new().with_sync(Box::new(FileSync::new(&settings.state_file)));
    match settings.namespace.as_deref() {
        // An explicit namespace wins and becomes the persisted selection
        Some(ns) => store.set(ns),
        None => store.restore(),
    }

    run_tui(source, store, Duration::from_millis(settings.refresh_ms))
}

/// Run the TUI over the given counter source
fn run_tui(
    source: Box<dyn CounterSource>,
    store: NamespaceStore,
    refresh: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, store, refresh);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Apply any fetches that completed since the last frame
        app.pump_source();

        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                frame.render_widget(paragraph, resize_message_area(area));
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(8),    // Counter list
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with namespace overview
            ui::common::render_header(frame, app, chunks[0]);

            // Render the counter list
            ui::cards::render(frame, app, chunks[1]);

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[2]);

            // Render detail overlay if active
            if app.show_detail {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render namespace prompt if active
            if app.input_active {
                ui::common::render_namespace_prompt(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            handle_loop_event(app, event);
        }
    }

    Ok(())
}

/// Vertically centered band for the resize message. Must stay in bounds
/// even on degenerate terminal heights.
fn resize_message_area(area: ratatui::layout::Rect) -> ratatui::layout::Rect {
    let y = (area.height / 2).saturating_sub(2);
    let height = 5u16.min(area.height.saturating_sub(y));
    ratatui::layout::Rect::new(0, y, area.width, height)
}

fn handle_loop_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => events::handle_key_event(app, key),
        Event::Mouse(mouse) => {
            // Content starts after header (1) + table border (1),
            // the table header row is skipped inside the handler
            events::handle_mouse_event(app, mouse, 2);
        }
        Event::Resize(_, _) => {
            // Terminal will redraw on next iteration
        }
        _ => {}
    }
}
