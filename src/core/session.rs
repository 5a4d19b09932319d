//! Backend-side conversation context.
//!
//! The transcript the user sees and the history the model sees are kept
//! apart: the hidden opening prompt lives here but not in the transcript, and
//! an exchange is only committed once the model has answered it.

use crate::api::ChatMessage;
use crate::core::message::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    system_prompt: String,
    model: String,
    temperature: f32,
    turns: Vec<Turn>,
}

impl ChatSession {
    pub fn new(system_prompt: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            model: model.into(),
            temperature,
            turns: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Record a completed exchange.
    pub fn commit_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::User,
            content: prompt.into(),
        });
        self.turns.push(Turn {
            role: Role::Model,
            content: reply.into(),
        });
    }

    /// Forget every committed turn; the system prompt and settings stay.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    /// Wire messages for sending `text` on top of the committed history.
    pub fn request_messages(&self, text: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() + 2);
        if !self.system_prompt.is_empty() {
            messages.push(ChatMessage::new("system", self.system_prompt.clone()));
        }
        messages.extend(
            self.turns
                .iter()
                .map(|turn| ChatMessage::new(turn.role.to_api_role(), turn.content.clone())),
        );
        messages.push(ChatMessage::new("user", text));
        messages
    }
}
