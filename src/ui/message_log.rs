#[cfg(test)]
#[path = "message_log_test.rs"]
mod message_log_test;

use crate::common::ChatMessage;

/// Ordered, append-only message history of the current room.
///
/// The only mutations are a wholesale replace (history replay) and a single
/// append (live message). Each one raises a scroll request that the renderer
/// consumes once.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
    scroll_pending: bool,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, history: Vec<ChatMessage>) {
        self.messages = history;
        self.scroll_pending = true;
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.scroll_pending = true;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// `true` once after every mutation.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}

/// How a message is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVariant {
    Own,
    Other,
    System,
}

/// System notices win over self-authorship.
pub fn classify(message: &ChatMessage, self_user: &str) -> MessageVariant {
    if message.is_system() {
        MessageVariant::System
    } else if message.user == self_user {
        MessageVariant::Own
    } else {
        MessageVariant::Other
    }
}
