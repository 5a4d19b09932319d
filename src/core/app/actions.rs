use tokio::sync::mpsc;
use tracing::debug;

use super::App;
use crate::core::backend::ChatBackend;
use crate::core::session::ChatSession;

pub enum AppAction {
    /// Send the hidden opening prompt.
    Bootstrap,
    ResetSession,
    /// Typed input and activated options both arrive here. `from_input`
    /// clears the input box once the send is accepted.
    SubmitMessage {
        message: String,
        from_input: bool,
    },
    ReplyReceived {
        request_id: u64,
        prompt: String,
        reply: String,
    },
    RequestFailed {
        request_id: u64,
        error: String,
    },
    ToggleTheme,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch_many<I>(&self, actions: I)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(action);
        }
    }

    /// Submit `message` exactly as the Enter key would, leaving the input
    /// box alone.
    pub fn submit(&self, message: &str) {
        self.dispatch_many([AppAction::SubmitMessage {
            message: message.to_string(),
            from_input: false,
        }]);
    }

    /// Submit the text typed in the input box.
    pub fn submit_input(&self, message: &str) {
        self.dispatch_many([AppAction::SubmitMessage {
            message: message.to_string(),
            from_input: true,
        }]);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// The hidden opening prompt; failure falls back to a canned greeting.
    Bootstrap,
    Message,
}

/// Everything a background task needs to run one exchange.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub request_id: u64,
    pub kind: RequestKind,
    pub prompt: String,
    /// Session as it was when the request was made.
    pub session: ChatSession,
}

impl RequestParams {
    /// Run the exchange and produce the action that completes it.
    pub async fn execute(self, backend: &dyn ChatBackend) -> AppAction {
        debug!(request_id = self.request_id, kind = ?self.kind, "executing chat request");
        match backend.send_message(&self.session, &self.prompt).await {
            Ok(reply) => AppAction::ReplyReceived {
                request_id: self.request_id,
                prompt: self.prompt,
                reply: reply.text,
            },
            Err(err) => AppAction::RequestFailed {
                request_id: self.request_id,
                error: err.to_string(),
            },
        }
    }
}

pub enum AppCommand {
    SendMessage(RequestParams),
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for action in actions {
        if let Some(cmd) = apply_action(app, action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::Bootstrap => app.bootstrap(),
        AppAction::ResetSession => app.reset_session(),
        AppAction::SubmitMessage {
            message,
            from_input: false,
        } => app.submit(&message),
        AppAction::SubmitMessage {
            message,
            from_input: true,
        } => app.submit_typed(&message),
        AppAction::ReplyReceived {
            request_id,
            prompt,
            reply,
        } => {
            app.complete_request(request_id, prompt, reply);
            None
        }
        AppAction::RequestFailed { request_id, error } => {
            app.fail_request(request_id, &error);
            None
        }
        AppAction::ToggleTheme => {
            app.toggle_theme();
            None
        }
    }
}
