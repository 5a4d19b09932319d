//! Application state and the operations that change it.
//!
//! [`App`] aggregates the visible [`Conversation`], the backend-side
//! [`ChatSession`], the [`LoadingState`] gate and the terminal UI state.
//! Everything that happens to it arrives as an [`AppAction`]; anything it
//! needs done in the background leaves as an [`AppCommand`].

pub mod actions;
pub mod ui_state;

#[cfg(test)]
mod tests;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::core::constants::{BOOTSTRAP_FALLBACK, EMPTY_REPLY_FALLBACK, OPENING_PROMPT};
use crate::core::conversation::Conversation;
use crate::core::loading::{LoadingEvent, LoadingState};
use crate::core::message::Role;
use crate::core::session::ChatSession;
use crate::ui::theme::Theme;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand, RequestKind,
    RequestParams,
};
pub use ui_state::{OptionHotspot, UiMode, UiState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    id: u64,
    kind: RequestKind,
}

pub struct App {
    pub conversation: Conversation,
    pub session: ChatSession,
    pub loading: LoadingState,
    pub ui: UiState,
    /// Shown in the header, e.g. `gemini-2.5-flash · generativelanguage.googleapis.com`.
    pub provider_label: String,
    next_request_id: u64,
    pending: Option<PendingRequest>,
}

impl App {
    pub fn new(session: ChatSession, theme: Theme, provider_label: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::new(),
            session,
            loading: LoadingState::Idle,
            ui: UiState::new(theme),
            provider_label: provider_label.into(),
            next_request_id: 0,
            pending: None,
        }
    }

    /// Send the hidden opening prompt. Nothing is added to the transcript
    /// until the reply (or the fallback) arrives.
    pub fn bootstrap(&mut self) -> Option<AppCommand> {
        if !self.transition(LoadingEvent::Submit) {
            return None;
        }
        info!("starting diagnostic session");
        Some(AppCommand::SendMessage(
            self.begin_request(RequestKind::Bootstrap, OPENING_PROMPT),
        ))
    }

    /// Submit user text, typed or chosen from an option.
    ///
    /// A no-op while a request is in flight or when the text is blank.
    pub fn submit(&mut self, text: &str) -> Option<AppCommand> {
        let text = text.trim();
        if !self.loading.accepts(text) {
            debug!(state = ?self.loading, "submission ignored");
            return None;
        }
        if !self.transition(LoadingEvent::Submit) {
            return None;
        }

        self.conversation.push(Role::User, text);
        self.ui.exit_option_select();
        self.ui.scroll_to_bottom();
        Some(AppCommand::SendMessage(
            self.begin_request(RequestKind::Message, text),
        ))
    }

    /// Submit the input box's text. The box is cleared only when the send
    /// goes ahead, so a rejected submission keeps what was typed.
    pub fn submit_typed(&mut self, text: &str) -> Option<AppCommand> {
        let command = self.submit(text)?;
        self.ui.clear_input();
        Some(command)
    }

    /// Clear the transcript and the model's history, then bootstrap again.
    pub fn reset_session(&mut self) -> Option<AppCommand> {
        if self.loading.is_loading() {
            debug!("reset ignored while a request is in flight");
            return None;
        }
        info!(messages = self.conversation.len(), "resetting session");
        self.conversation.clear();
        self.session.reset();
        self.ui.reset_view();
        self.loading = LoadingState::Idle;
        self.bootstrap()
    }

    pub fn complete_request(&mut self, request_id: u64, prompt: String, reply: String) {
        let Some(pending) = self.take_pending(request_id) else {
            return;
        };

        let reply = if reply.trim().is_empty() {
            EMPTY_REPLY_FALLBACK.to_string()
        } else {
            reply
        };
        debug!(
            request_id,
            kind = ?pending.kind,
            chars = reply.chars().count(),
            "reply received"
        );

        self.session.commit_exchange(prompt, reply.clone());
        self.conversation.push(Role::Model, reply);
        self.transition(LoadingEvent::ReplyReceived);
        self.ui.scroll_to_bottom();
    }

    pub fn fail_request(&mut self, request_id: u64, error: &str) {
        let Some(pending) = self.take_pending(request_id) else {
            return;
        };
        warn!(request_id, kind = ?pending.kind, %error, "chat request failed");

        match pending.kind {
            RequestKind::Bootstrap => {
                self.conversation.push(Role::Model, BOOTSTRAP_FALLBACK);
                self.transition(LoadingEvent::ReplyReceived);
            }
            RequestKind::Message => {
                self.transition(LoadingEvent::RequestFailed);
            }
        }
        self.ui.scroll_to_bottom();
    }

    pub fn toggle_theme(&mut self) {
        self.ui.theme = self.ui.theme.toggled();
        debug!(theme = self.ui.theme.kind.as_str(), "theme toggled");
    }

    pub fn is_current_request(&self, request_id: u64) -> bool {
        self.pending.is_some_and(|pending| pending.id == request_id)
    }

    fn begin_request(&mut self, kind: RequestKind, prompt: &str) -> RequestParams {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some(PendingRequest {
            id: request_id,
            kind,
        });
        RequestParams {
            request_id,
            kind,
            prompt: prompt.to_string(),
            session: self.session.clone(),
        }
    }

    fn take_pending(&mut self, request_id: u64) -> Option<PendingRequest> {
        if !self.is_current_request(request_id) {
            debug!(request_id, "ignoring stale request outcome");
            return None;
        }
        self.pending.take()
    }

    fn transition(&mut self, event: LoadingEvent) -> bool {
        match self.loading.apply(event) {
            Ok(state) => {
                debug!(?event, ?state, "loading state changed");
                self.ui.loading_started = state.is_loading().then(Instant::now);
                true
            }
            Err(rejected) => {
                warn!(%rejected, "loading transition rejected");
                false
            }
        }
    }
}
