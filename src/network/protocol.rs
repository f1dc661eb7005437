//! Engine.IO v4 / Socket.IO v5 text packet codec.
//!
//! Every websocket text frame is one Engine.IO packet: a single type digit
//! followed by an optional payload. Type `4` (message) wraps a Socket.IO
//! packet, which again starts with a type digit, then an optional namespace
//! (`/admin,`), an optional ack id and finally a JSON payload.
//!
//! Only the default namespace and text packets are used by the chat backend.

#[cfg(test)]
#[path = "protocol_test.rs"]
mod protocol_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{ChatMessage, NetworkCommand, NetworkEvent, RoomUser};

pub const EVENT_JOIN_ROOM: &str = "join-room";
pub const EVENT_SEND_MESSAGE: &str = "send-message";
pub const EVENT_CLEAR_CHAT: &str = "clear-chat";
pub const EVENT_CHAT_HISTORY: &str = "chat-history";
pub const EVENT_NEW_MESSAGE: &str = "new-message";

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("empty packet")]
    Empty,
    #[error("unknown engine.io packet type `{0}`")]
    UnknownEngineType(char),
    #[error("unknown socket.io packet type `{0}`")]
    UnknownSocketType(char),
    #[error("binary socket.io packets are not supported")]
    BinaryUnsupported,
    #[error("malformed packet: {0}")]
    Malformed(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Payload of the Engine.IO open packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// Longest silence tolerated before the connection is considered dead.
    pub fn heartbeat_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect,
    Disconnect,
    Event { name: String, args: Vec<Value> },
    Ack { id: u64, args: Vec<Value> },
    ConnectError(String),
}

/// Decode one websocket text frame.
pub fn decode(text: &str) -> Result<EnginePacket, ProtocolError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(ProtocolError::Empty)?;
    let rest = chars.as_str();

    let packet = match kind {
        '0' => EnginePacket::Open(serde_json::from_str(rest)?),
        '1' => EnginePacket::Close,
        '2' => EnginePacket::Ping,
        '3' => EnginePacket::Pong,
        '4' => EnginePacket::Message(decode_socket(rest)?),
        '5' => EnginePacket::Upgrade,
        '6' => EnginePacket::Noop,
        other => return Err(ProtocolError::UnknownEngineType(other)),
    };
    Ok(packet)
}

fn decode_socket(text: &str) -> Result<SocketPacket, ProtocolError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(ProtocolError::Empty)?;
    let mut rest = chars.as_str();

    if matches!(kind, '5' | '6') {
        return Err(ProtocolError::BinaryUnsupported);
    }

    if rest.starts_with('/') {
        rest = match rest.split_once(',') {
            Some((_namespace, tail)) => tail,
            None => "",
        };
    }

    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    let (ack_id, payload) = rest.split_at(digits);
    let ack_id = if ack_id.is_empty() {
        None
    } else {
        Some(
            ack_id
                .parse::<u64>()
                .map_err(|err| ProtocolError::Malformed(format!("ack id: {err}")))?,
        )
    };

    let packet = match kind {
        '0' => SocketPacket::Connect,
        '1' => SocketPacket::Disconnect,
        '2' => {
            let mut args = parse_array(payload)?;
            if args.is_empty() {
                return Err(ProtocolError::Malformed("event without a name".to_owned()));
            }
            let name = match args.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(ProtocolError::Malformed(format!(
                        "event name must be a string, got {other}"
                    )));
                }
            };
            SocketPacket::Event { name, args }
        }
        '3' => {
            let id = ack_id.ok_or_else(|| ProtocolError::Malformed("ack without id".to_owned()))?;
            SocketPacket::Ack {
                id,
                args: parse_array(payload)?,
            }
        }
        '4' => SocketPacket::ConnectError(connect_error_message(payload)?),
        other => return Err(ProtocolError::UnknownSocketType(other)),
    };
    Ok(packet)
}

fn parse_array(payload: &str) -> Result<Vec<Value>, ProtocolError> {
    match serde_json::from_str::<Value>(payload)? {
        Value::Array(items) => Ok(items),
        other => Err(ProtocolError::Malformed(format!(
            "expected a JSON array, got {other}"
        ))),
    }
}

fn connect_error_message(payload: &str) -> Result<String, ProtocolError> {
    if payload.is_empty() {
        return Ok("connection refused".to_owned());
    }
    let message = match serde_json::from_str::<Value>(payload)? {
        Value::String(message) => message,
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => Value::Object(map).to_string(),
        },
        other => other.to_string(),
    };
    Ok(message)
}

/// Map an inbound Socket.IO event to what the UI cares about.
///
/// Returns `Ok(None)` for events the chat client does not listen to.
pub fn decode_event(name: &str, args: Vec<Value>) -> Result<Option<NetworkEvent>, ProtocolError> {
    if name != EVENT_CHAT_HISTORY && name != EVENT_NEW_MESSAGE {
        return Ok(None);
    }
    let payload = args
        .into_iter()
        .next()
        .ok_or_else(|| ProtocolError::Malformed(format!("`{name}` without payload")))?;

    let event = if name == EVENT_CHAT_HISTORY {
        NetworkEvent::History(serde_json::from_value::<Vec<ChatMessage>>(payload)?)
    } else {
        NetworkEvent::MessageReceived(serde_json::from_value::<ChatMessage>(payload)?)
    };
    Ok(Some(event))
}

pub fn encode_connect() -> String {
    "40".to_owned()
}

pub fn encode_disconnect() -> String {
    "41".to_owned()
}

pub fn encode_pong() -> String {
    "3".to_owned()
}

pub fn encode_event<T: Serialize>(name: &str, payload: &T) -> Result<String, ProtocolError> {
    Ok(format!("42{}", serde_json::to_string(&(name, payload))?))
}

pub fn encode_join(join: &RoomUser) -> Result<String, ProtocolError> {
    encode_event(EVENT_JOIN_ROOM, join)
}

pub fn encode_command(command: &NetworkCommand) -> Result<String, ProtocolError> {
    match command {
        NetworkCommand::SendMessage(message) => encode_event(EVENT_SEND_MESSAGE, message),
        NetworkCommand::ClearChat(request) => encode_event(EVENT_CLEAR_CHAT, request),
    }
}

pub fn command_name(command: &NetworkCommand) -> &'static str {
    match command {
        NetworkCommand::SendMessage(_) => EVENT_SEND_MESSAGE,
        NetworkCommand::ClearChat(_) => EVENT_CLEAR_CHAT,
    }
}
