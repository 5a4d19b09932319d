use super::*;
use crate::core::message::Role;
use crate::ui::bubble::{render_bubble, BubbleContext};
use crate::utils::test_utils::{create_test_app, ScriptedBackend};
use tokio::sync::mpsc;

fn expect_send(command: Option<AppCommand>) -> RequestParams {
    match command {
        Some(AppCommand::SendMessage(params)) => params,
        None => panic!("expected a request to be issued"),
    }
}

async fn run(app: &mut App, params: RequestParams, backend: &ScriptedBackend) {
    let outcome = params.execute(backend).await;
    assert!(apply_action(app, outcome).is_none());
}

async fn bootstrapped_app(backend: &ScriptedBackend) -> App {
    let mut app = create_test_app();
    let params = expect_send(apply_action(&mut app, AppAction::Bootstrap));
    run(&mut app, params, backend).await;
    app
}

fn texts(app: &App) -> Vec<(Role, String)> {
    app.conversation
        .iter()
        .map(|m| (m.role(), m.text().to_string()))
        .collect()
}

#[tokio::test]
async fn bootstrap_reply_is_the_first_message() {
    let backend = ScriptedBackend::new([Ok("Bienvenido. ¿Cuál es tu nombre?")]);
    let mut app = create_test_app();

    let params = expect_send(apply_action(&mut app, AppAction::Bootstrap));
    assert_eq!(params.kind, RequestKind::Bootstrap);
    assert_eq!(params.prompt, OPENING_PROMPT);
    assert!(app.loading.is_loading());
    assert!(app.conversation.is_empty());

    run(&mut app, params, &backend).await;

    assert_eq!(
        texts(&app),
        vec![(Role::Model, "Bienvenido. ¿Cuál es tu nombre?".to_string())]
    );
    assert_eq!(app.loading, LoadingState::Idle);
    assert_eq!(app.session.turns().len(), 2);
    assert_eq!(app.session.turns()[0].content, OPENING_PROMPT);
}

#[tokio::test]
async fn bootstrap_failure_shows_fallback_and_stays_usable() {
    let backend = ScriptedBackend::new([Err("offline")]);
    let app = bootstrapped_app(&backend).await;

    assert_eq!(
        texts(&app),
        vec![(Role::Model, BOOTSTRAP_FALLBACK.to_string())]
    );
    assert_eq!(app.loading, LoadingState::Idle);
    assert!(app.session.turns().is_empty());
}

#[tokio::test]
async fn submitting_ana_round_trip() {
    let backend = ScriptedBackend::new([Ok("¿Cuál es tu nombre?"), Ok("Hola Ana. Paso 1...")]);
    let mut app = bootstrapped_app(&backend).await;
    assert_eq!(app.loading, LoadingState::Idle);

    let params = expect_send(apply_action(
        &mut app,
        AppAction::SubmitMessage {
            message: "Ana".into(),
            from_input: true,
        },
    ));
    assert_eq!(app.loading, LoadingState::Loading);
    assert_eq!(
        app.conversation.last().map(|m| (m.role(), m.text())),
        Some((Role::User, "Ana"))
    );
    assert_eq!(app.conversation.len(), 2);

    // A second submission while loading changes nothing.
    assert!(app.submit("Otra cosa").is_none());
    assert_eq!(app.conversation.len(), 2);
    assert_eq!(app.loading, LoadingState::Loading);

    run(&mut app, params, &backend).await;

    assert_eq!(app.loading, LoadingState::Idle);
    assert_eq!(app.conversation.len(), 3);
    let last = app.conversation.last().expect("model reply");
    assert_eq!(last.role(), Role::Model);
    assert_eq!(last.text(), "Hola Ana. Paso 1...");

    // Backend saw the opening exchange as history.
    assert_eq!(backend.calls()[1], (2, "Ana".to_string()));
}

#[tokio::test]
async fn failure_keeps_user_message_and_retry_is_a_fresh_send() {
    let backend = ScriptedBackend::new([Ok("¿Nombre?"), Err("503"), Ok("Hola Ana.")]);
    let mut app = bootstrapped_app(&backend).await;

    let params = expect_send(app.submit("Ana"));
    run(&mut app, params, &backend).await;

    assert_eq!(app.loading, LoadingState::Error);
    assert_eq!(app.conversation.len(), 2);
    assert_eq!(app.conversation.last().map(|m| m.text()), Some("Ana"));
    assert_eq!(app.session.turns().len(), 2, "failed exchange is not committed");

    let params = expect_send(app.submit("  Ana  "));
    assert_eq!(app.loading, LoadingState::Loading);
    assert_eq!(app.conversation.len(), 3);
    run(&mut app, params, &backend).await;

    assert_eq!(app.loading, LoadingState::Idle);
    assert_eq!(
        texts(&app)[1..],
        [
            (Role::User, "Ana".to_string()),
            (Role::User, "Ana".to_string()),
            (Role::Model, "Hola Ana.".to_string()),
        ]
    );
    assert_eq!(app.session.turns().len(), 4);
}

#[tokio::test]
async fn blank_submissions_are_ignored() {
    let backend = ScriptedBackend::new([Ok("¿Nombre?")]);
    let mut app = bootstrapped_app(&backend).await;

    assert!(app.submit("").is_none());
    assert!(app.submit(" \t ").is_none());
    assert_eq!(app.conversation.len(), 1);
    assert_eq!(app.loading, LoadingState::Idle);
}

#[tokio::test]
async fn empty_reply_is_replaced_with_notice() {
    let backend = ScriptedBackend::new([Ok("¿Nombre?"), Ok("   ")]);
    let mut app = bootstrapped_app(&backend).await;

    let params = expect_send(app.submit("Ana"));
    run(&mut app, params, &backend).await;

    assert_eq!(
        app.conversation.last().map(|m| m.text()),
        Some(EMPTY_REPLY_FALLBACK)
    );
    assert_eq!(app.loading, LoadingState::Idle);
}

#[tokio::test]
async fn stale_outcomes_are_ignored() {
    let backend = ScriptedBackend::new([Ok("¿Nombre?")]);
    let mut app = bootstrapped_app(&backend).await;

    let first = expect_send(app.submit("Ana"));
    app.fail_request(first.request_id, "timeout");
    let second = expect_send(app.submit("Ana"));
    assert_ne!(first.request_id, second.request_id);

    apply_action(
        &mut app,
        AppAction::ReplyReceived {
            request_id: first.request_id,
            prompt: "Ana".into(),
            reply: "tarde".into(),
        },
    );
    assert!(app.loading.is_loading());
    assert!(app.is_current_request(second.request_id));
    assert_eq!(app.conversation.len(), 3);
}

#[tokio::test]
async fn option_activation_submits_like_enter() {
    let backend = ScriptedBackend::new([Ok("Elige:\n1. Salúdate a ti mismo\n2. Ignóralo")]);
    let mut app = bootstrapped_app(&backend).await;
    app.ui.input = crate::utils::line_editor::LineEditorState::with_text("borrador");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = AppActionDispatcher::new(tx);
    let sink = |text: &str| dispatcher.submit(text);
    let theme = app.ui.theme.clone();
    let model_message = app.conversation.get(0).expect("bootstrap message").clone();
    let bubble = render_bubble(
        &model_message,
        &BubbleContext {
            theme: &theme,
            on_option: Some(&sink),
            width: Some(60),
        },
    );
    bubble.options[0].activate();

    let action = rx.try_recv().expect("activation dispatched");
    assert!(apply_actions(&mut app, [action]).len() == 1);

    assert_eq!(
        app.conversation.last().map(|m| (m.role(), m.text())),
        Some((Role::User, "Salúdate a ti mismo"))
    );
    assert!(app.loading.is_loading());
    assert_eq!(app.ui.input_text(), "borrador");
}

#[tokio::test]
async fn reset_clears_everything_and_bootstraps_again() {
    let backend = ScriptedBackend::new([Ok("¿Nombre?"), Ok("Hola Ana."), Ok("De nuevo: ¿nombre?")]);
    let mut app = bootstrapped_app(&backend).await;
    let params = expect_send(app.submit("Ana"));

    assert!(
        apply_action(&mut app, AppAction::ResetSession).is_none(),
        "reset is refused while loading"
    );
    run(&mut app, params, &backend).await;

    let params = expect_send(apply_action(&mut app, AppAction::ResetSession));
    assert!(app.conversation.is_empty());
    assert!(app.session.turns().is_empty());
    assert_eq!(params.kind, RequestKind::Bootstrap);
    run(&mut app, params, &backend).await;

    assert_eq!(
        texts(&app),
        vec![(Role::Model, "De nuevo: ¿nombre?".to_string())]
    );
    assert_eq!(backend.calls()[2], (0, OPENING_PROMPT.to_string()));
}

#[test]
fn toggle_theme_switches_kind() {
    let mut app = create_test_app();
    let before = app.ui.theme.kind;
    apply_action(&mut app, AppAction::ToggleTheme);
    assert_ne!(app.ui.theme.kind, before);
}

#[tokio::test]
async fn typed_text_survives_a_rejected_submission() {
    let backend = ScriptedBackend::new([Ok("Elige:\n1. Miedo\n2. Calma")]);
    let mut app = bootstrapped_app(&backend).await;
    app.ui.input = crate::utils::line_editor::LineEditorState::with_text("mi respuesta");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = AppActionDispatcher::new(tx);
    // An option click queued ahead of Enter in the same frame.
    dispatcher.submit("Miedo");
    dispatcher.submit_input("mi respuesta");

    let mut queued = Vec::new();
    while let Ok(action) = rx.try_recv() {
        queued.push(action);
    }
    let commands = apply_actions(&mut app, queued);

    assert_eq!(commands.len(), 1);
    assert_eq!(
        app.conversation.last().map(|m| (m.role(), m.text())),
        Some((Role::User, "Miedo"))
    );
    assert_eq!(app.ui.input_text(), "mi respuesta");
}

#[tokio::test]
async fn accepted_typed_submission_clears_input() {
    let backend = ScriptedBackend::new([Ok("¿Cuál es tu nombre?")]);
    let mut app = bootstrapped_app(&backend).await;
    app.ui.input = crate::utils::line_editor::LineEditorState::with_text("Ana");

    expect_send(apply_action(
        &mut app,
        AppAction::SubmitMessage {
            message: "Ana".into(),
            from_input: true,
        },
    ));
    assert_eq!(app.ui.input_text(), "");
}
