//! Key routing for the chat screen.
//!
//! Global chords (quit, theme, reset) work in every mode. Option-select mode
//! gets the next look via [`super::modes`]; everything else edits the input,
//! submits it, or scrolls the transcript.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{AppAction, AppActionDispatcher};
use crate::utils::line_editor::map_key_event_to_action;

use super::modes::handle_option_select_key;
use super::AppHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Exit,
    Handled,
    NotHandled,
}

impl KeyResult {
    fn from_changed(changed: bool) -> Self {
        if changed {
            KeyResult::Handled
        } else {
            KeyResult::NotHandled
        }
    }
}

/// Utility function to wrap to previous index in a circular manner
pub fn wrap_previous_index(current: usize, total: usize) -> Option<usize> {
    if total == 0 {
        None
    } else if current == 0 {
        Some(total - 1)
    } else {
        Some(current - 1)
    }
}

/// Utility function to wrap to next index in a circular manner
pub fn wrap_next_index(current: usize, total: usize) -> Option<usize> {
    if total == 0 {
        None
    } else {
        Some((current + 1) % total)
    }
}

pub async fn handle_key_event(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    key: &KeyEvent,
) -> KeyResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return KeyResult::Exit,
            KeyCode::Char('t') => {
                dispatcher.dispatch_many([AppAction::ToggleTheme]);
                return KeyResult::Handled;
            }
            KeyCode::Char('n') => {
                dispatcher.dispatch_many([AppAction::ResetSession]);
                return KeyResult::Handled;
            }
            _ => {}
        }
    }

    if app.read(|app| app.ui.in_option_select()).await {
        return handle_option_select_key(app, dispatcher, key).await;
    }

    match key.code {
        KeyCode::Enter => submit_input(app, dispatcher).await,
        KeyCode::Tab => {
            let entered = app.update(|app| app.ui.enter_option_select()).await;
            KeyResult::from_changed(entered)
        }
        KeyCode::Up => scroll(app, -1).await,
        KeyCode::Down => scroll(app, 1).await,
        KeyCode::PageUp => {
            let page = page_size(app).await;
            scroll(app, -page).await
        }
        KeyCode::PageDown => {
            let page = page_size(app).await;
            scroll(app, page).await
        }
        _ => match map_key_event_to_action(key) {
            Some(edit) => {
                let changed = app
                    .update(|app| !app.loading.is_loading() && app.ui.edit_input(edit))
                    .await;
                KeyResult::from_changed(changed)
            }
            None => KeyResult::NotHandled,
        },
    }
}

/// Queue the typed text. The box is cleared by the reducer, and only if the
/// send is still accepted when the action is applied.
async fn submit_input(app: &AppHandle, dispatcher: &AppActionDispatcher) -> KeyResult {
    let text = app
        .read(|app| {
            app.loading
                .accepts(app.ui.input_text())
                .then(|| app.ui.input_text().to_string())
        })
        .await;

    match text {
        Some(text) => {
            dispatcher.submit_input(&text);
            KeyResult::Handled
        }
        None => KeyResult::NotHandled,
    }
}

pub(super) async fn scroll(app: &AppHandle, lines: i32) -> KeyResult {
    app.update(|app| app.ui.scroll_by(lines)).await;
    KeyResult::Handled
}

async fn page_size(app: &AppHandle) -> i32 {
    app.read(|app| i32::from(app.ui.transcript_area.height).saturating_sub(1).max(1))
        .await
}
