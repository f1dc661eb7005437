#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::protocol::{self, EnginePacket, Handshake, ProtocolError, SocketPacket};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const SOCKET_IO_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("websocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("handshake failed: {0}")]
    Handshake(String),
    #[error("{0}")]
    Rejected(String),
    #[error("timed out")]
    Timeout,
    #[error("websocket closed")]
    Closed,
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Turn the configured server address into the Engine.IO websocket endpoint.
pub fn socket_io_url(server_url: &str) -> Result<String, TransportError> {
    let trimmed = server_url.trim().trim_end_matches('/');
    let Some((scheme, rest)) = trimmed.split_once("://") else {
        return Err(TransportError::InvalidUrl(server_url.to_owned()));
    };
    let scheme = match scheme.to_ascii_lowercase().as_str() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(TransportError::InvalidUrl(server_url.to_owned())),
    };
    if rest.is_empty() {
        return Err(TransportError::InvalidUrl(server_url.to_owned()));
    }
    Ok(format!("{scheme}://{rest}{SOCKET_IO_PATH}"))
}

/// Open the websocket and run the Engine.IO + Socket.IO connect handshake.
pub async fn open(url: &str) -> Result<(WsStream, Handshake), TransportError> {
    let (mut socket, _response) = connect_async(url).await?;

    let handshake = match next_packet(&mut socket).await? {
        EnginePacket::Open(handshake) => handshake,
        other => {
            return Err(TransportError::Handshake(format!(
                "expected open packet, got {other:?}"
            )));
        }
    };

    send_text(&mut socket, protocol::encode_connect()).await?;

    loop {
        match next_packet(&mut socket).await? {
            EnginePacket::Message(SocketPacket::Connect) => return Ok((socket, handshake)),
            EnginePacket::Message(SocketPacket::ConnectError(message)) => {
                return Err(TransportError::Rejected(message));
            }
            EnginePacket::Ping => send_text(&mut socket, protocol::encode_pong()).await?,
            EnginePacket::Close => return Err(TransportError::Closed),
            other => log::debug!("Ignoring {other:?} during handshake"),
        }
    }
}

/// Next Engine.IO packet; websocket-level control frames are skipped.
pub async fn next_packet(socket: &mut WsStream) -> Result<EnginePacket, TransportError> {
    loop {
        match socket.next().await {
            Some(Ok(Message::Text(text))) => return Ok(protocol::decode(text.as_str())?),
            Some(Ok(Message::Close(_))) | None => return Err(TransportError::Closed),
            Some(Ok(_)) => {}
            Some(Err(err)) => return Err(err.into()),
        }
    }
}

pub async fn send_text(socket: &mut WsStream, text: String) -> Result<(), TransportError> {
    socket.send(Message::text(text)).await?;
    Ok(())
}

/// Leave the default namespace and close the websocket. Errors are ignored,
/// the peer may already be gone.
pub async fn close(socket: &mut WsStream) {
    if let Err(err) = send_text(socket, protocol::encode_disconnect()).await {
        log::debug!("Disconnect packet not delivered: {err}");
    }
    if let Err(err) = socket.close(None).await {
        log::debug!("Websocket close failed: {err}");
    }
}
