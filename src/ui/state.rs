#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use chrono::{DateTime, Utc};

use crate::common::NetworkEvent;

use super::message_log::MessageLog;

const MAX_DEBUG_EVENTS: usize = 100;

/// Debug event để hiển thị thông tin kết nối
#[derive(Debug, Clone)]
pub struct DebugEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: &'static str,
    pub message: String,
}

/// Trạng thái cục bộ của UI.
#[derive(Debug, Default)]
pub struct AppState {
    pub messages: MessageLog,
    pub input_text: String,
    pub debug_events: Vec<DebugEvent>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Connected => {
                self.add_debug_event("CONNECTED", "Joined room".to_owned());
            }
            NetworkEvent::History(history) => {
                self.add_debug_event("HISTORY", format!("{} messages", history.len()));
                self.messages.replace(history);
            }
            NetworkEvent::MessageReceived(message) => {
                self.add_debug_event("MESSAGE", format!("from {}", message.user));
                self.messages.push(message);
            }
            NetworkEvent::ConnectError(reason) => self.add_debug_event("CONNECT_ERROR", reason),
            NetworkEvent::Disconnected(reason) => self.add_debug_event("DISCONNECTED", reason),
        }
    }

    pub fn add_debug_event(&mut self, event_type: &'static str, message: String) {
        self.debug_events.push(DebugEvent {
            timestamp: Utc::now(),
            event_type,
            message,
        });

        // Giữ tối đa 100 events để không chiếm quá nhiều bộ nhớ
        if self.debug_events.len() > MAX_DEBUG_EVENTS {
            self.debug_events.remove(0);
        }
    }
}
