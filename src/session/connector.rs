use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::{NetworkCommand, NetworkEvent, RoomUser};
use crate::network::{ClientOptions, SocketClient};

/// Everything a connection needs, handed over by [`super::Session::activate`].
///
/// `events` is already bound to the session's receiver when this is built.
pub struct ConnectRequest {
    pub id: Uuid,
    pub join: RoomUser,
    pub events: mpsc::Sender<NetworkEvent>,
    pub commands: mpsc::Receiver<NetworkCommand>,
}

/// Opens the underlying connection for a session.
///
/// The connection must announce `join-room` itself and must stop once the
/// command channel closes.
pub trait Connector {
    fn connect(&self, request: ConnectRequest);
}

/// Spawns a [`SocketClient`] on the tokio runtime.
#[derive(Clone)]
pub struct SocketConnector {
    options: ClientOptions,
    runtime: Handle,
}

impl SocketConnector {
    pub fn new(options: ClientOptions, runtime: Handle) -> Self {
        Self { options, runtime }
    }
}

impl Connector for SocketConnector {
    fn connect(&self, request: ConnectRequest) {
        let ConnectRequest {
            id,
            join,
            events,
            commands,
        } = request;
        let client = SocketClient::new(self.options.clone(), join, events, commands);

        self.runtime.spawn(async move {
            client.run().await;
            log::debug!("Connection {id} finished");
        });
    }
}
