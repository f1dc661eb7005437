use crate::common::types::{OutgoingMessage, RoomUser};

/// Lệnh UI gửi xuống tầng mạng.
///
/// `join-room` is not a command: the connection task announces the join itself
/// right after each successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCommand {
    SendMessage(OutgoingMessage),
    /// Yêu cầu server xoá lịch sử phòng (chỉ user đặc quyền mới thấy nút này)
    ClearChat(RoomUser),
}
