use super::*;

use std::sync::{Arc, Mutex};

use crate::common::ChatMessage;

// =============================================================
// Fixtures
// =============================================================

/// Records every connection request instead of opening a socket.
#[derive(Clone, Default)]
struct FakeConnector {
    requests: Arc<Mutex<Vec<ConnectRequest>>>,
}

impl FakeConnector {
    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Push an event as if the server had sent it on connection `index`.
    fn emit(&self, index: usize, event: NetworkEvent) -> bool {
        self.requests.lock().unwrap()[index].events.try_send(event).is_ok()
    }

    fn sent(&self, index: usize) -> Vec<NetworkCommand> {
        let mut requests = self.requests.lock().unwrap();
        let mut commands = Vec::new();
        while let Ok(command) = requests[index].commands.try_recv() {
            commands.push(command);
        }
        commands
    }

    fn commands_closed(&self, index: usize) -> bool {
        let mut requests = self.requests.lock().unwrap();
        matches!(
            requests[index].commands.try_recv(),
            Err(TryRecvError::Disconnected)
        )
    }
}

impl Connector for FakeConnector {
    fn connect(&self, request: ConnectRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

fn session_for(user: &str) -> (Session<FakeConnector>, FakeConnector) {
    let connector = FakeConnector::default();
    let session = Session::new(
        connector.clone(),
        SessionIdentity {
            room_id: "room-1".to_owned(),
            user: user.to_owned(),
        },
        Some("amitoj".to_owned()),
    );
    (session, connector)
}

// =============================================================
// Activation
// =============================================================

#[test]
fn activation_opens_one_connection_with_join_identity() {
    let (mut session, connector) = session_for("alice");

    assert!(session.activate());
    assert_eq!(session.state(), SessionState::Joining);
    assert_eq!(connector.count(), 1);

    let requests = connector.requests.lock().unwrap();
    assert_eq!(
        requests[0].join,
        RoomUser {
            room_id: "room-1".to_owned(),
            user: "alice".to_owned(),
        }
    );
    assert_eq!(Some(requests[0].id), session.connection_id());
}

#[test]
fn repeated_activation_is_a_no_op() {
    let (mut session, connector) = session_for("alice");

    assert!(session.activate());
    assert!(!session.activate());
    assert_eq!(connector.count(), 1);

    connector.emit(0, NetworkEvent::Connected);
    session.poll_events();
    assert_eq!(session.state(), SessionState::Active);
    assert!(!session.activate());
    assert_eq!(connector.count(), 1);
}

#[test]
fn handlers_are_bound_before_the_connector_runs() {
    let (mut session, connector) = session_for("alice");
    session.activate();

    // History pushed the instant the connection exists still reaches the session.
    assert!(connector.emit(
        0,
        NetworkEvent::History(vec![ChatMessage::new("System", "alice joined", "10:00")])
    ));
    assert_eq!(session.poll_events().len(), 1);
}

// =============================================================
// Events and state
// =============================================================

#[test]
fn events_are_drained_in_delivery_order() {
    let (mut session, connector) = session_for("alice");
    session.activate();

    let history = vec![
        ChatMessage::new("System", "alice joined", "10:00"),
        ChatMessage::new("bob", "hi", "10:01"),
    ];
    connector.emit(0, NetworkEvent::Connected);
    connector.emit(0, NetworkEvent::History(history.clone()));
    connector.emit(
        0,
        NetworkEvent::MessageReceived(ChatMessage::new("alice", "hello", "10:02")),
    );

    assert_eq!(
        session.poll_events(),
        vec![
            NetworkEvent::Connected,
            NetworkEvent::History(history),
            NetworkEvent::MessageReceived(ChatMessage::new("alice", "hello", "10:02")),
        ]
    );
    assert!(session.poll_events().is_empty());
}

#[test]
fn connect_error_is_non_terminal() {
    let (mut session, connector) = session_for("alice");
    session.activate();
    connector.emit(0, NetworkEvent::Connected);
    session.poll_events();

    connector.emit(0, NetworkEvent::ConnectError("websocket error".to_owned()));
    session.poll_events();
    assert_eq!(session.state(), SessionState::Errored);

    connector.emit(0, NetworkEvent::Connected);
    session.poll_events();
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn stopped_connection_task_is_reported_once() {
    let (mut session, connector) = session_for("alice");
    session.activate();
    connector.emit(0, NetworkEvent::Connected);
    session.poll_events();

    // The task owned the only event sender; dropping it is the task exiting.
    connector.requests.lock().unwrap().clear();

    assert_eq!(
        session.poll_events(),
        vec![NetworkEvent::Disconnected("connection task stopped".to_owned())]
    );
    assert_eq!(session.state(), SessionState::Errored);
    assert!(session.poll_events().is_empty());
    assert_eq!(session.state(), SessionState::Errored);
}

// =============================================================
// Deactivation
// =============================================================

#[test]
fn deactivation_releases_both_channels() {
    let (mut session, connector) = session_for("alice");
    session.activate();
    connector.emit(0, NetworkEvent::Connected);
    session.poll_events();

    session.deactivate();

    assert_eq!(session.state(), SessionState::Inactive);
    assert_eq!(session.connection_id(), None);
    assert!(!connector.emit(
        0,
        NetworkEvent::MessageReceived(ChatMessage::new("bob", "late", "10:05"))
    ));
    assert!(connector.commands_closed(0));
    assert!(session.poll_events().is_empty());
}

#[test]
fn reactivation_starts_from_a_clean_slate() {
    let (mut session, connector) = session_for("alice");
    session.activate();
    session.deactivate();

    assert!(session.activate());
    assert_eq!(connector.count(), 2);
    assert_eq!(session.state(), SessionState::Joining);

    assert!(!connector.emit(0, NetworkEvent::Connected));
    assert!(connector.emit(
        1,
        NetworkEvent::MessageReceived(ChatMessage::new("bob", "hi", "10:01"))
    ));
    assert_eq!(session.poll_events().len(), 1);
}

#[test]
fn dropping_the_session_closes_the_connection() {
    let (mut session, connector) = session_for("alice");
    session.activate();

    drop(session);

    assert!(connector.commands_closed(0));
    assert!(!connector.emit(0, NetworkEvent::Connected));
}

#[test]
fn deactivating_an_inactive_session_is_harmless() {
    let (mut session, connector) = session_for("alice");
    session.deactivate();
    assert_eq!(session.state(), SessionState::Inactive);
    assert_eq!(connector.count(), 0);
}

// =============================================================
// Outgoing messages
// =============================================================

#[test]
fn blank_text_is_never_sent() {
    let (mut session, connector) = session_for("alice");
    session.activate();

    for text in ["", " ", "\n\t  \n"] {
        assert_eq!(session.send_message(text), Ok(false));
    }
    assert!(connector.sent(0).is_empty());
}

#[test]
fn send_message_emits_room_user_and_text() {
    let (mut session, connector) = session_for("alice");
    session.activate();

    assert_eq!(session.send_message("hello\nworld"), Ok(true));
    assert_eq!(
        connector.sent(0),
        vec![NetworkCommand::SendMessage(OutgoingMessage {
            room_id: "room-1".to_owned(),
            user: "alice".to_owned(),
            text: "hello\nworld".to_owned(),
        })]
    );
}

#[test]
fn send_message_requires_an_active_session() {
    let (session, _connector) = session_for("alice");
    assert_eq!(session.send_message("hello"), Err(SessionError::Inactive));
}

#[test]
fn send_message_reports_a_stopped_connection() {
    let (mut session, connector) = session_for("alice");
    session.activate();
    connector.requests.lock().unwrap().clear();

    assert_eq!(session.send_message("hello"), Err(SessionError::Closed));
}

// =============================================================
// Clear history
// =============================================================

#[test]
fn privileged_user_clears_history_once() {
    let (mut session, connector) = session_for("amitoj");
    session.activate();

    assert!(session.can_clear_history());
    assert_eq!(session.clear_history(), Ok(()));
    assert_eq!(
        connector.sent(0),
        vec![NetworkCommand::ClearChat(RoomUser {
            room_id: "room-1".to_owned(),
            user: "amitoj".to_owned(),
        })]
    );
}

#[test]
fn other_users_cannot_clear_history() {
    let (mut session, connector) = session_for("alice");
    session.activate();

    assert!(!session.can_clear_history());
    assert_eq!(session.clear_history(), Err(SessionError::NotPrivileged));
    assert!(connector.sent(0).is_empty());
}

#[test]
fn no_privileged_identity_means_no_clear_control() {
    let connector = FakeConnector::default();
    let session = Session::new(
        connector,
        SessionIdentity {
            room_id: "room-1".to_owned(),
            user: "amitoj".to_owned(),
        },
        None,
    );
    assert!(!session.can_clear_history());
}
