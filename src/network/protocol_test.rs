use super::*;

use crate::common::OutgoingMessage;

// =============================================================
// Engine.IO framing
// =============================================================

#[test]
fn decode_open_handshake() {
    let packet = decode(
        r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#,
    )
    .unwrap();

    let EnginePacket::Open(handshake) = packet else {
        panic!("expected open packet, got {packet:?}");
    };
    assert_eq!(handshake.sid, "lv_VI97HAXpY6yYWAAAC");
    assert_eq!(handshake.ping_interval, 25_000);
    assert_eq!(handshake.max_payload, Some(1_000_000));
    assert_eq!(handshake.heartbeat_window(), Duration::from_secs(45));
}

#[test]
fn heartbeat_window_saturates_on_huge_intervals() {
    let packet = decode(&format!(
        r#"0{{"sid":"x","pingInterval":{max},"pingTimeout":{max}}}"#,
        max = u64::MAX
    ))
    .unwrap();

    let EnginePacket::Open(handshake) = packet else {
        panic!("expected open packet, got {packet:?}");
    };
    assert_eq!(handshake.heartbeat_window(), Duration::from_millis(u64::MAX));
}

#[test]
fn decode_heartbeat_and_control_packets() {
    assert_eq!(decode("1").unwrap(), EnginePacket::Close);
    assert_eq!(decode("2").unwrap(), EnginePacket::Ping);
    assert_eq!(decode("3").unwrap(), EnginePacket::Pong);
    assert_eq!(decode("6").unwrap(), EnginePacket::Noop);
}

#[test]
fn decode_rejects_empty_and_unknown_packets() {
    assert!(matches!(decode(""), Err(ProtocolError::Empty)));
    assert!(matches!(decode("9"), Err(ProtocolError::UnknownEngineType('9'))));
    assert!(matches!(decode("47"), Err(ProtocolError::UnknownSocketType('7'))));
}

// =============================================================
// Socket.IO packets
// =============================================================

#[test]
fn decode_connect_ack_with_sid() {
    assert_eq!(
        decode(r#"40{"sid":"wZX3oN0bSVIhsaknAAAI"}"#).unwrap(),
        EnginePacket::Message(SocketPacket::Connect)
    );
}

#[test]
fn decode_event_with_payload() {
    let packet = decode(r#"42["new-message",{"user":"bob","text":"hi","time":"10:01"}]"#).unwrap();
    let EnginePacket::Message(SocketPacket::Event { name, args }) = packet else {
        panic!("expected event packet");
    };
    assert_eq!(name, "new-message");
    assert_eq!(args.len(), 1);
    assert_eq!(args[0]["user"], "bob");
}

#[test]
fn decode_event_skips_namespace_and_ack_id() {
    let packet = decode(r#"42/admin,13["ping-room","room-1"]"#).unwrap();
    assert_eq!(
        packet,
        EnginePacket::Message(SocketPacket::Event {
            name: "ping-room".to_owned(),
            args: vec![Value::String("room-1".to_owned())],
        })
    );
}

#[test]
fn decode_ack_requires_id() {
    assert_eq!(
        decode(r#"437["ok"]"#).unwrap(),
        EnginePacket::Message(SocketPacket::Ack {
            id: 7,
            args: vec![Value::String("ok".to_owned())],
        })
    );
    assert!(matches!(decode(r#"43["ok"]"#), Err(ProtocolError::Malformed(_))));
}

#[test]
fn decode_connect_error_message() {
    assert_eq!(
        decode(r#"44{"message":"Not authorized"}"#).unwrap(),
        EnginePacket::Message(SocketPacket::ConnectError("Not authorized".to_owned()))
    );
    assert_eq!(
        decode("44").unwrap(),
        EnginePacket::Message(SocketPacket::ConnectError("connection refused".to_owned()))
    );
}

#[test]
fn decode_rejects_binary_and_nameless_events() {
    assert!(matches!(
        decode(r#"451-["upload",{"_placeholder":true,"num":0}]"#),
        Err(ProtocolError::BinaryUnsupported)
    ));
    assert!(matches!(decode("42[]"), Err(ProtocolError::Malformed(_))));
    assert!(matches!(decode("42[1,2]"), Err(ProtocolError::Malformed(_))));
    assert!(matches!(decode("42{"), Err(ProtocolError::InvalidJson(_))));
}

// =============================================================
// Chat events
// =============================================================

#[test]
fn decode_event_maps_history_in_order() {
    let args = vec![serde_json::json!([
        {"user": "System", "text": "alice joined", "time": "10:00"},
        {"user": "bob", "text": "hi", "time": "10:01"},
    ])];

    let event = decode_event(EVENT_CHAT_HISTORY, args).unwrap();
    assert_eq!(
        event,
        Some(NetworkEvent::History(vec![
            ChatMessage::new("System", "alice joined", "10:00"),
            ChatMessage::new("bob", "hi", "10:01"),
        ]))
    );
}

#[test]
fn decode_event_maps_new_message() {
    let args = vec![serde_json::json!({"user": "alice", "text": "line one\nline two", "time": "10:02"})];
    assert_eq!(
        decode_event(EVENT_NEW_MESSAGE, args).unwrap(),
        Some(NetworkEvent::MessageReceived(ChatMessage::new(
            "alice",
            "line one\nline two",
            "10:02"
        )))
    );
}

#[test]
fn decode_event_ignores_unknown_events() {
    assert_eq!(decode_event("typing", vec![Value::Null]).unwrap(), None);
}

#[test]
fn decode_event_requires_payload() {
    assert!(matches!(
        decode_event(EVENT_NEW_MESSAGE, Vec::new()),
        Err(ProtocolError::Malformed(_))
    ));
}

// =============================================================
// Encoding
// =============================================================

#[test]
fn encode_control_packets() {
    assert_eq!(encode_connect(), "40");
    assert_eq!(encode_disconnect(), "41");
    assert_eq!(encode_pong(), "3");
}

#[test]
fn encode_join_uses_camel_case_room_id() {
    let join = RoomUser {
        room_id: "room-1".to_owned(),
        user: "alice".to_owned(),
    };
    assert_eq!(
        encode_join(&join).unwrap(),
        r#"42["join-room",{"roomId":"room-1","user":"alice"}]"#
    );
}

#[test]
fn encode_commands() {
    let send = NetworkCommand::SendMessage(OutgoingMessage {
        room_id: "room-1".to_owned(),
        user: "alice".to_owned(),
        text: "hello\nthere".to_owned(),
    });
    assert_eq!(
        encode_command(&send).unwrap(),
        r#"42["send-message",{"roomId":"room-1","user":"alice","text":"hello\nthere"}]"#
    );
    assert_eq!(command_name(&send), EVENT_SEND_MESSAGE);

    let clear = NetworkCommand::ClearChat(RoomUser {
        room_id: "room-1".to_owned(),
        user: "amitoj".to_owned(),
    });
    assert_eq!(
        encode_command(&clear).unwrap(),
        r#"42["clear-chat",{"roomId":"room-1","user":"amitoj"}]"#
    );
}
