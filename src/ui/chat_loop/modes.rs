//! Option-select mode and option activation.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::core::app::{App, AppActionDispatcher, OptionHotspot};
use crate::ui::bubble::{render_bubble, BubbleContext};
use crate::ui::layout::LayoutEngine;

use super::keybindings::{wrap_next_index, wrap_previous_index, KeyResult};
use super::AppHandle;

pub(super) async fn handle_option_select_key(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    key: &KeyEvent,
) -> KeyResult {
    match key.code {
        KeyCode::Esc => {
            app.update(|app| app.ui.exit_option_select()).await;
            KeyResult::Handled
        }
        KeyCode::Tab | KeyCode::Up | KeyCode::Char('k') => {
            step_selection(app, wrap_previous_index).await
        }
        KeyCode::BackTab | KeyCode::Down | KeyCode::Char('j') => {
            step_selection(app, wrap_next_index).await
        }
        KeyCode::Enter => {
            let activated = app
                .update(|app| {
                    let Some(hotspot) = app.ui.selected_hotspot().cloned() else {
                        return false;
                    };
                    app.ui.exit_option_select();
                    activate_option(app, &hotspot, dispatcher)
                })
                .await;
            if activated {
                KeyResult::Handled
            } else {
                KeyResult::NotHandled
            }
        }
        _ => KeyResult::NotHandled,
    }
}

async fn step_selection(app: &AppHandle, step: fn(usize, usize) -> Option<usize>) -> KeyResult {
    app.update(|app| {
        let total = app.ui.option_hotspots.len();
        let current = app.ui.selected_option().unwrap_or(0);
        match step(current, total) {
            Some(next) => {
                app.ui.select_option(next);
                KeyResult::Handled
            }
            None => {
                app.ui.exit_option_select();
                KeyResult::NotHandled
            }
        }
    })
    .await
}

/// Fire the option a hotspot points at.
///
/// The bubble is rendered again with a handler that submits through the
/// dispatcher, so activation goes through exactly the same path as a click on
/// a freshly drawn bubble.
pub(super) fn activate_option(
    app: &App,
    hotspot: &OptionHotspot,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let Some(message) = app.conversation.get(hotspot.message_index) else {
        return false;
    };
    let submit = |text: &str| dispatcher.submit(text);
    let ctx = BubbleContext {
        theme: &app.ui.theme,
        on_option: Some(&submit),
        width: Some(LayoutEngine::bubble_width(
            app.ui.transcript_area.width as usize,
        )),
    };
    let bubble = render_bubble(message, &ctx);
    match bubble.options.get(hotspot.option_index) {
        Some(option) => {
            debug!(
                message = hotspot.message_index,
                option = hotspot.option_index,
                prefix = %option.prefix,
                "option activated"
            );
            option.activate();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppAction;
    use crate::core::message::Role;
    use crate::ui::chat_loop::keybindings::handle_key_event;
    use crate::utils::test_utils::create_test_app;
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::sync::Arc;
    use tokio::sync::{mpsc, Mutex};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// App with two option-bearing model messages laid out at 80 columns.
    fn app_with_options() -> App {
        let mut app = create_test_app();
        app.conversation
            .push(Role::Model, "¿Qué notas?\n1. Tensión\n2. Calma");
        app.conversation.push(Role::User, "1. Tensión");
        app.conversation
            .push(Role::Model, "¿Dónde?\na) En los hombros\nb) En la mandíbula");

        let noop = |_: &str| {};
        let layout = LayoutEngine::layout_messages(
            app.conversation.messages(),
            &app.ui.theme,
            80,
            Some(&noop),
        );
        app.ui.set_transcript_layout(
            Rect::new(0, 2, 80, 40),
            layout.lines.len(),
            layout.option_hotspots,
        );
        app
    }

    fn setup() -> (AppHandle, AppActionDispatcher, mpsc::UnboundedReceiver<AppAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = AppHandle::new(Arc::new(Mutex::new(app_with_options())));
        (app, AppActionDispatcher::new(tx), rx)
    }

    #[tokio::test]
    async fn tab_cycles_from_newest_towards_oldest() {
        let (app, dispatcher, _rx) = setup();
        handle_key_event(&app, &dispatcher, &key(KeyCode::Tab)).await;
        assert_eq!(app.read(|app| app.ui.selected_option()).await, Some(3));

        handle_key_event(&app, &dispatcher, &key(KeyCode::Tab)).await;
        assert_eq!(app.read(|app| app.ui.selected_option()).await, Some(2));

        handle_key_event(&app, &dispatcher, &key(KeyCode::Down)).await;
        handle_key_event(&app, &dispatcher, &key(KeyCode::Down)).await;
        assert_eq!(app.read(|app| app.ui.selected_option()).await, Some(0));

        handle_key_event(&app, &dispatcher, &key(KeyCode::Esc)).await;
        assert!(!app.read(|app| app.ui.in_option_select()).await);
    }

    #[tokio::test]
    async fn enter_submits_option_content_and_keeps_draft() {
        let (app, dispatcher, mut rx) = setup();
        app.update(|app| {
            app.ui.input = crate::utils::line_editor::LineEditorState::with_text("borrador");
        })
        .await;

        handle_key_event(&app, &dispatcher, &key(KeyCode::Tab)).await;
        let result = handle_key_event(&app, &dispatcher, &key(KeyCode::Enter)).await;
        assert_eq!(result, KeyResult::Handled);

        match rx.try_recv() {
            Ok(AppAction::SubmitMessage {
                message,
                from_input,
            }) => {
                assert_eq!(message, "En la mandíbula");
                assert!(!from_input);
            }
            _ => panic!("expected SubmitMessage"),
        }
        assert_eq!(
            app.read(|app| app.ui.input_text().to_string()).await,
            "borrador"
        );
        assert!(!app.read(|app| app.ui.in_option_select()).await);
    }

    #[test]
    fn activation_of_a_vanished_message_is_refused() {
        let app = create_test_app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);
        let hotspot = OptionHotspot {
            message_index: 7,
            option_index: 0,
            rows: 0..1,
        };
        assert!(!activate_option(&app, &hotspot, &dispatcher));
        assert!(rx.try_recv().is_err());
    }
}
