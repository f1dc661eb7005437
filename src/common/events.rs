use crate::common::types::ChatMessage;

/// Sự kiện từ tầng mạng gửi lên UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// Handshake finished and `join-room` has been written to the socket.
    Connected,
    /// `chat-history`: full backlog, replaces the local log.
    History(Vec<ChatMessage>),
    /// `new-message`
    MessageReceived(ChatMessage),
    /// `connect_error` or a failed connection attempt.
    ConnectError(String),
    /// An established connection went away.
    Disconnected(String),
}
