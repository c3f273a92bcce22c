use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::email::Mailbox;
use crate::terminal::compose::FormAction;
use crate::terminal::state::{AppState, Panel};

/// Applies one key press. Returns `true` when the user asked to quit.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }

    // the compose form owns every other key while it is visible
    if state.panel == Panel::Compose {
        match handle_compose_keys(key, state) {
            FormAction::Submit => state.send_email(),
            FormAction::Escape => state.back(),
            FormAction::None => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('i') => state.load_mailbox(Mailbox::Inbox),
        KeyCode::Char('s') => state.load_mailbox(Mailbox::Sent),
        KeyCode::Char('a') => state.load_mailbox(Mailbox::Archive),
        KeyCode::Char('c') => state.compose_email(),
        _ => match state.panel {
            Panel::Emails => handle_list_keys(key, state),
            Panel::Detail => handle_detail_keys(key, state),
            Panel::Compose => {}
        },
    }
    false
}

fn handle_list_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Home => state.select_first(),
        KeyCode::End => state.select_last(),
        KeyCode::Enter => state.open_selected(),
        KeyCode::Char('g') => state.reload(),
        _ => {}
    }
}

fn handle_detail_keys(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => state.back(),
        KeyCode::Char('r') => state.reply(),
        KeyCode::Char('e') => state.toggle_archive(),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_body(1),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_body(-1),
        KeyCode::PageDown => state.scroll_body(10),
        KeyCode::PageUp => state.scroll_body(-10),
        _ => {}
    }
}

fn handle_compose_keys(key: KeyEvent, state: &mut AppState) -> FormAction {
    let form = &mut state.compose;
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return FormAction::Escape,
        KeyCode::Char('s') if ctrl => return FormAction::Submit,
        KeyCode::Tab => form.focus_next(),
        KeyCode::BackTab => form.focus_prev(),
        KeyCode::Enter => form.enter(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !ctrl => form.insert_char(c),
        _ => {}
    }
    FormAction::None
}
