use serde::{Deserialize, Serialize};

/// Sender name the server uses for its own notices (joins, clears, ...).
pub const SYSTEM_USER: &str = "System";

/// Domain model đại diện một tin nhắn chat.
///
/// Messages are produced by the server, both for the history replay and for
/// live events. `time` is already formatted server-side and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user: String,
    pub text: String,
    pub time: String,
}

impl ChatMessage {
    pub fn new(user: impl Into<String>, text: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            text: text.into(),
            time: time.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.user == SYSTEM_USER
    }
}

/// `{roomId, user}` payload shared by `join-room` and `clear-chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUser {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub user: String,
}

/// Payload of `send-message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub user: String,
    pub text: String,
}
