//! Client-side session: one connection, one room, one user, bound to the
//! lifetime of a mounted chat view.
//!
//! The session is an owned handle. Activation binds the inbound event channel
//! and only then asks the [`Connector`] for a connection, which announces the
//! join; deactivation (or drop) releases the event channel and the command
//! channel together, so a connection can never outlive its listeners.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

pub mod connector;
pub mod state;

pub use connector::{ConnectRequest, Connector, SocketConnector};
pub use state::SessionState;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use uuid::Uuid;

use crate::common::{NetworkCommand, NetworkEvent, OutgoingMessage, RoomUser};

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session is not active")]
    Inactive,
    #[error("only the privileged user can clear the chat")]
    NotPrivileged,
    #[error("outgoing queue is full")]
    Busy,
    #[error("connection task has stopped")]
    Closed,
}

/// Room and display name of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub room_id: String,
    pub user: String,
}

struct Connection {
    id: Uuid,
    commands: mpsc::Sender<NetworkCommand>,
    events: mpsc::Receiver<NetworkEvent>,
    /// Set once the connection task has exited on its own.
    stopped: bool,
}

pub struct Session<C: Connector = SocketConnector> {
    identity: SessionIdentity,
    privileged_user: Option<String>,
    connector: C,
    state: SessionState,
    connection: Option<Connection>,
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C, identity: SessionIdentity, privileged_user: Option<String>) -> Self {
        Self {
            identity,
            privileged_user,
            connector,
            state: SessionState::Inactive,
            connection: None,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn user(&self) -> &str {
        &self.identity.user
    }

    pub fn room_id(&self) -> &str {
        &self.identity.room_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn connection_id(&self) -> Option<Uuid> {
        self.connection.as_ref().map(|connection| connection.id)
    }

    /// Start the connection. Returns `false` (and does nothing) when the
    /// session is already live.
    pub fn activate(&mut self) -> bool {
        let Some(next) = self.state.activate() else {
            log::debug!("Session for {} already {}", self.identity.user, self.state);
            return false;
        };

        let (event_sender, events) = mpsc::channel(CHANNEL_CAPACITY);
        let (commands, command_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let id = Uuid::new_v4();
        self.connection = Some(Connection {
            id,
            commands,
            events,
            stopped: false,
        });
        self.state = next;

        log::info!(
            "Activating session {id} for {} in {}",
            self.identity.user,
            self.identity.room_id
        );
        self.connector.connect(ConnectRequest {
            id,
            join: self.room_user(),
            events: event_sender,
            commands: command_receiver,
        });
        true
    }

    /// Tear the connection down. Safe to call in any state.
    pub fn deactivate(&mut self) {
        let Some(next) = self.state.deactivate() else {
            return;
        };
        if let Some(connection) = self.connection.take() {
            log::info!("Deactivating session {}", connection.id);
        }
        self.state = next;
    }

    /// Drain inbound events without blocking, updating the session state.
    pub fn poll_events(&mut self) -> Vec<NetworkEvent> {
        let mut drained = Vec::new();
        let Some(connection) = self
            .connection
            .as_mut()
            .filter(|connection| !connection.stopped)
        else {
            return drained;
        };

        loop {
            match connection.events.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Connection {} stopped unexpectedly", connection.id);
                    connection.stopped = true;
                    drained.push(NetworkEvent::Disconnected(
                        "connection task stopped".to_owned(),
                    ));
                    break;
                }
            }
        }

        for event in &drained {
            if let NetworkEvent::ConnectError(message) = event {
                log::error!("Socket error: {message}");
            }
            if let Some(next) = self.state.on_event(event) {
                log::debug!("Session {} -> {}", self.state, next);
                self.state = next;
            }
        }
        drained
    }

    /// Post a message. Blank text is ignored and reported as `Ok(false)`.
    ///
    /// Nothing is appended locally; the server echoes the message back.
    pub fn send_message(&self, text: &str) -> Result<bool, SessionError> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        self.dispatch(NetworkCommand::SendMessage(OutgoingMessage {
            room_id: self.identity.room_id.clone(),
            user: self.identity.user.clone(),
            text: text.to_owned(),
        }))?;
        Ok(true)
    }

    pub fn can_clear_history(&self) -> bool {
        self.privileged_user.as_deref() == Some(self.identity.user.as_str())
    }

    pub fn clear_history(&self) -> Result<(), SessionError> {
        if !self.can_clear_history() {
            return Err(SessionError::NotPrivileged);
        }
        self.dispatch(NetworkCommand::ClearChat(self.room_user()))
    }

    fn dispatch(&self, command: NetworkCommand) -> Result<(), SessionError> {
        let connection = self.connection.as_ref().ok_or(SessionError::Inactive)?;
        connection.commands.try_send(command).map_err(|err| match err {
            TrySendError::Full(_) => SessionError::Busy,
            TrySendError::Closed(_) => SessionError::Closed,
        })
    }

    fn room_user(&self) -> RoomUser {
        RoomUser {
            room_id: self.identity.room_id.clone(),
            user: self.identity.user.clone(),
        }
    }
}

impl<C: Connector> Drop for Session<C> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
