use crate::core::message::{Message, MessageId, Role};

/// Append-only transcript. Insertion order is display order.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a message with a fresh id and append it.
    pub fn push(&mut self, role: Role, text: impl Into<String>) -> &Message {
        self.next_id += 1;
        let message = Message::new(MessageId::new(self.next_id), role, text);
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message. Ids keep increasing so stale references never
    /// alias a new message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_increasing_ids() {
        let mut conversation = Conversation::new();
        let first = conversation.push(Role::Model, "Hola").id();
        let second = conversation.push(Role::User, "Ana").id();
        assert!(second > first);
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.last().map(Message::text), Some("Ana"));
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut conversation = Conversation::new();
        let before = conversation.push(Role::Model, "uno").id();
        conversation.clear();
        assert!(conversation.is_empty());
        let after = conversation.push(Role::Model, "dos").id();
        assert_ne!(before, after);
    }
}
