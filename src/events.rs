//! Terminal event handling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, CardState};
use crate::data::Mode;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the namespace prompt is open, capture text input
    if app.input_active {
        handle_namespace_input(app, key);
        return;
    }

    // If the card detail overlay is shown, handle overlay-specific keys
    if app.show_detail {
        handle_detail_keys(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Open card detail
        KeyCode::Enter => app.enter_detail(),

        // Mode selection applies to the selected card even from the list
        KeyCode::Char('1') => app.set_mode(Mode::Realtime),
        KeyCode::Char('2') => app.set_mode(Mode::Day),
        KeyCode::Char('3') => app.set_mode(Mode::Month),
        KeyCode::Char('4') => app.set_mode(Mode::Year),

        // Switch namespace
        KeyCode::Char('n') => app.start_namespace_input(),

        // Retry a failed fetch / reload the list
        KeyCode::Char('r') => app.retry(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle keys while the card detail overlay is open
fn handle_detail_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => app.close_detail(),

        // Mode selection
        KeyCode::Char('1') => app.set_mode(Mode::Realtime),
        KeyCode::Char('2') => app.set_mode(Mode::Day),
        KeyCode::Char('3') => app.set_mode(Mode::Month),
        KeyCode::Char('4') => app.set_mode(Mode::Year),
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(card) = app.selected_card() {
                let prev = card.mode.prev();
                app.set_mode(prev);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(card) = app.selected_card() {
                let next = card.mode.next();
                app.set_mode(next);
            }
        }

        // Allow scrolling through cards while the overlay is open
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        // Retry the card if it failed
        KeyCode::Char('r') => {
            if matches!(
                app.selected_card().map(|c| &c.state),
                Some(CardState::Failed(_))
            ) {
                app.retry();
            }
        }

        _ => {}
    }
}

/// Handle key input while the namespace prompt is open
fn handle_namespace_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Submit
        KeyCode::Enter => app.submit_namespace(),

        // Cancel (stays open if no namespace is selected yet)
        KeyCode::Esc => app.cancel_namespace_input(),

        // Clear and cancel
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_namespace_input();
        }

        // Backspace
        KeyCode::Backspace => app.input_pop(),

        // Type characters
        KeyCode::Char(c) => app.input_push(c),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select a card row
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                if item_row < app.cards.len() {
                    app.selected = item_row;
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.close_detail(),

        _ => {}
    }
}
