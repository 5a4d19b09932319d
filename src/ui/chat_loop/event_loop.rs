//! Event polling, dispatching, and UI rendering loop.
//!
//! Terminal input is read on a dedicated task and forwarded over a channel.
//! Each pass of the main loop draws (capped at 60 fps), routes pending input,
//! applies queued [`AppAction`]s and spawns the backend requests they produce.
//! Backend completions come back as actions through the same dispatcher.

use std::{
    error::Error,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Size;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::core::app::{
    apply_actions, App, AppAction, AppActionDispatcher, AppCommand, RequestParams,
};
use crate::core::backend::ChatBackend;
use crate::ui::renderer::ui;
use crate::utils::line_editor::LineEditAction;

use super::keybindings::{handle_key_event, scroll, KeyResult};
use super::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use super::modes::activate_option;
use super::AppHandle;

const MAX_FPS: u64 = 60;
const MOUSE_SCROLL_LINES: i32 = 3;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

async fn is_exit_requested(app: &AppHandle) -> bool {
    app.read(|app| app.ui.exit_requested).await
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    dispatcher: &AppActionDispatcher,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let submit = |text: &str| dispatcher.submit(text);
    let mut terminal_guard = terminal.lock().await;
    app.update(|app| terminal_guard.draw(|f| ui(f, app, Some(&submit))))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key_event(app, dispatcher, &key).await == KeyResult::Exit {
                    app.update(|app| app.ui.exit_requested = true).await;
                    outcome.exit_requested = true;
                    break;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                handle_paste_event(app, text).await;
            }
            UiEvent::Crossterm(Event::Mouse(mouse)) => {
                handle_mouse_event(app, dispatcher, mouse).await;
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

async fn handle_paste_event(app: &AppHandle, text: String) {
    app.update(|app| {
        if !app.loading.is_loading() {
            app.ui.edit_input(LineEditAction::Paste(text));
        }
    })
    .await;
}

async fn handle_mouse_event(app: &AppHandle, dispatcher: &AppActionDispatcher, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            scroll(app, -MOUSE_SCROLL_LINES).await;
        }
        MouseEventKind::ScrollDown => {
            scroll(app, MOUSE_SCROLL_LINES).await;
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.update(|app| click_option(app, dispatcher, mouse.column, mouse.row))
                .await;
        }
        _ => {}
    }
}

/// Activate the option under a click, if there is one.
fn click_option(app: &mut App, dispatcher: &AppActionDispatcher, column: u16, row: u16) -> bool {
    let Some(hotspot) = app.ui.hotspot_at(column, row).cloned() else {
        return false;
    };
    app.ui.exit_option_select();
    activate_option(app, &hotspot, dispatcher)
}

fn spawn_request(
    backend: Arc<dyn ChatBackend>,
    dispatcher: AppActionDispatcher,
    params: RequestParams,
) {
    tokio::spawn(async move {
        let action = params.execute(backend.as_ref()).await;
        dispatcher.dispatch_many([action]);
    });
}

async fn drain_action_queue(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    backend: &Arc<dyn ChatBackend>,
    action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(action) = action_rx.try_recv() {
        pending.push(action);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    for cmd in commands {
        match cmd {
            AppCommand::SendMessage(params) => {
                debug!(request_id = params.request_id, "spawning chat request");
                spawn_request(backend.clone(), dispatcher.clone(), params);
            }
        }
    }
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

/// Run the interactive session until the user quits.
///
/// The opening prompt is queued before the first frame, so the transcript
/// starts out in the loading state.
pub async fn run_chat(app: App, backend: Arc<dyn ChatBackend>) -> Result<(), Box<dyn Error>> {
    let app = AppHandle::new(Arc::new(Mutex::new(app)));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppAction>();
    let action_dispatcher = AppActionDispatcher::new(action_tx);
    action_dispatcher.dispatch_many([AppAction::Bootstrap]);

    let terminal = setup_terminal()?;
    info!("terminal ready");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if is_exit_requested(&app).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &action_dispatcher,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let term_size = current_terminal_size(&terminal).await;
        let resized = app
            .update(|app| {
                let changed = app.ui.last_term_size != term_size;
                app.ui.last_term_size = term_size;
                changed
            })
            .await;
        if resized {
            request_redraw = true;
        }

        let event_outcome = process_ui_events(&app, &mut event_rx, &action_dispatcher).await;
        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }
        if event_outcome.events_processed {
            request_redraw = true;
        }

        let actions_applied =
            drain_action_queue(&app, &action_dispatcher, &backend, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        // Keeps the loading ellipsis moving.
        if app.read(|app| app.loading.is_loading()).await {
            request_redraw = true;
        }

        let idle = !event_outcome.events_processed && !actions_applied && !request_redraw;
        if idle {
            tokio::time::sleep(Duration::from_millis(16)).await;
        } else if request_redraw {
            tokio::time::sleep(frame_duration.saturating_sub(last_draw.elapsed())).await;
        }
    };

    event_reader_handle.abort();
    restore_terminal(&terminal).await?;
    info!("terminal restored");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::OPENING_PROMPT;
    use crate::core::loading::LoadingState;
    use crate::core::message::Role;
    use crate::ui::layout::LayoutEngine;
    use crate::utils::test_utils::{create_test_app, ScriptedBackend};
    use ratatui::crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn new_app_handle(app: App) -> AppHandle {
        AppHandle::new(Arc::new(Mutex::new(app)))
    }

    /// Drain until the loading state settles or the attempts run out.
    async fn settle(
        app: &AppHandle,
        dispatcher: &AppActionDispatcher,
        backend: &Arc<dyn ChatBackend>,
        action_rx: &mut mpsc::UnboundedReceiver<AppAction>,
    ) {
        for _ in 0..200 {
            drain_action_queue(app, dispatcher, backend, action_rx).await;
            if !app.read(|app| app.loading.is_loading()).await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("request never completed");
    }

    #[tokio::test]
    async fn bootstrap_request_round_trips_through_the_queue() {
        let app = new_app_handle(create_test_app());
        let scripted = Arc::new(ScriptedBackend::new([Ok("¿Cómo te llamas?")]));
        let backend: Arc<dyn ChatBackend> = scripted.clone();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);

        dispatcher.dispatch_many([AppAction::Bootstrap]);
        assert!(drain_action_queue(&app, &dispatcher, &backend, &mut rx).await);
        assert_eq!(
            app.read(|app| app.loading).await,
            LoadingState::Loading
        );

        settle(&app, &dispatcher, &backend, &mut rx).await;

        assert_eq!(scripted.calls(), vec![(0, OPENING_PROMPT.to_string())]);
        let texts = app
            .read(|app| {
                app.conversation
                    .iter()
                    .map(|m| (m.role(), m.text().to_string()))
                    .collect::<Vec<_>>()
            })
            .await;
        assert_eq!(texts, vec![(Role::Model, "¿Cómo te llamas?".to_string())]);
    }

    #[tokio::test]
    async fn empty_queue_reports_nothing_applied() {
        let app = new_app_handle(create_test_app());
        let backend: Arc<dyn ChatBackend> = Arc::new(ScriptedBackend::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);
        assert!(!drain_action_queue(&app, &dispatcher, &backend, &mut rx).await);
    }

    #[tokio::test]
    async fn ctrl_c_requests_exit() {
        let app = new_app_handle(create_test_app());
        let (tx, _rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event_tx
            .send(UiEvent::Crossterm(Event::Key(event::KeyEvent::new(
                event::KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))))
            .expect("send");

        let outcome = process_ui_events(&app, &mut event_rx, &dispatcher).await;
        assert!(outcome.exit_requested);
        assert!(is_exit_requested(&app).await);
    }

    #[tokio::test]
    async fn paste_is_flattened_and_ignored_while_loading() {
        let app = new_app_handle(create_test_app());
        handle_paste_event(&app, "uno\ndos".to_string()).await;
        assert_eq!(
            app.read(|app| app.ui.input_text().to_string()).await,
            "uno dos"
        );

        app.update(|app| app.loading = LoadingState::Loading).await;
        handle_paste_event(&app, " tres".to_string()).await;
        assert_eq!(
            app.read(|app| app.ui.input_text().to_string()).await,
            "uno dos"
        );
    }

    #[test]
    fn clicking_an_option_submits_its_content() {
        let mut app = create_test_app();
        app.conversation
            .push(Role::Model, "¿Qué sientes?\n1. Miedo\n2. Curiosidad");
        let noop = |_: &str| {};
        let layout =
            LayoutEngine::layout_messages(app.conversation.messages(), &app.ui.theme, 80, Some(&noop));
        app.ui
            .set_transcript_layout(Rect::new(0, 2, 80, 20), layout.lines.len(), layout.option_hotspots);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);

        // Header on screen row 2, question on 3, first option on 4.
        assert!(!click_option(&mut app, &dispatcher, 10, 3));
        assert!(click_option(&mut app, &dispatcher, 10, 5));
        match rx.try_recv() {
            Ok(AppAction::SubmitMessage { message, .. }) => assert_eq!(message, "Curiosidad"),
            _ => panic!("expected SubmitMessage"),
        }
    }
}
