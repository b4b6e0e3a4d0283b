//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Each screen has its own
//! keymap; adding a keybinding is a single match arm in the matching
//! function below.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_home_key`] or
//!    [`handle_form_key`] that calls it.
//! 3. Update the help text in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Route};
use crate::forms::AuthMode;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.route {
        Route::Home => handle_home_key(app, key),
        Route::Auth(mode) => handle_form_key(app, mode, key),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc if app.detail_open => app.close_detail(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Tab | KeyCode::Char('l') => app.cycle_label(true),
        KeyCode::BackTab | KeyCode::Char('h') => app.cycle_label(false),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('n') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('p') | KeyCode::PageUp => app.previous_page(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('L') => app.goto(Route::Auth(AuthMode::Login)),
        KeyCode::Char('R') => app.goto(Route::Auth(AuthMode::Register)),
        KeyCode::Char('o') => app.logout(),
        _ => {}
    }
}

fn handle_form_key(app: &mut App, mode: AuthMode, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.goto(Route::Home),
        KeyCode::Enter => app.submit_form(mode),
        KeyCode::Tab | KeyCode::Down => app.form_mut(mode).focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form_mut(mode).focus_previous(),
        KeyCode::Backspace => app.form_mut(mode).pop_char(),
        KeyCode::Char(c) => app.form_mut(mode).push_char(c),
        _ => {}
    }
}
