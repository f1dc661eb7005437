#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep, sleep_until, timeout};

use crate::common::{NetworkCommand, NetworkEvent, RoomUser};
use crate::config::AppConfig;

use super::protocol::{self, EnginePacket, SocketPacket};
use super::transport::{self, TransportError, WsStream};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Engine.IO websocket endpoint, see [`transport::socket_io_url`].
    pub url: String,
    pub reconnect: bool,
    pub reconnect_delay: Duration,
    pub reconnect_delay_max: Duration,
    pub connect_timeout: Duration,
}

impl ClientOptions {
    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        Ok(Self {
            url: transport::socket_io_url(&config.server_url)?,
            reconnect: config.reconnect,
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            reconnect_delay_max: Duration::from_millis(
                config.reconnect_delay_max_ms.max(config.reconnect_delay_ms),
            ),
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
        })
    }
}

/// Doubled back-off, capped at `max`.
fn next_delay(delay: Duration, max: Duration) -> Duration {
    delay.checked_mul(2).unwrap_or(max).min(max)
}

fn heartbeat_deadline(window: Duration) -> Instant {
    let now = Instant::now();
    // Roughly 30 years, the same horizon tokio uses for "never".
    now.checked_add(window)
        .unwrap_or_else(|| now + Duration::from_secs(86400 * 365 * 30))
}

/// Why a connected session ended.
#[derive(Debug)]
enum SessionEnd {
    /// Command channel closed: the owning session was deactivated.
    Shutdown,
    /// The server sent a Socket.IO disconnect. Not retried.
    ServerDisconnect,
    Lost(String),
}

/// Owns one websocket for one activated session.
///
/// Nothing reaches the UI except through `event_sender`, which exists before
/// the task is spawned, so `chat-history` can never arrive ahead of a
/// listener.
pub struct SocketClient {
    options: ClientOptions,
    join: RoomUser,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
}

impl SocketClient {
    pub fn new(
        options: ClientOptions,
        join: RoomUser,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        Self {
            options,
            join,
            event_sender,
            command_receiver,
        }
    }

    pub async fn run(mut self) {
        let mut delay = self.options.reconnect_delay;
        log::info!("Socket event loop started for room {}", self.join.room_id);

        loop {
            match self.connect_and_run().await {
                Ok(SessionEnd::Shutdown) => break,
                Ok(SessionEnd::ServerDisconnect) => {
                    log::info!("Server ended the session; not reconnecting");
                    if self
                        .notify(NetworkEvent::Disconnected("io server disconnect".to_owned()))
                        .await
                    {
                        self.wait_for_shutdown().await;
                    }
                    break;
                }
                Ok(SessionEnd::Lost(reason)) => {
                    log::warn!("Connection lost: {reason}");
                    delay = self.options.reconnect_delay;
                    if !self.notify(NetworkEvent::Disconnected(reason)).await {
                        break;
                    }
                }
                Err(err) => {
                    log::error!("Socket error: {err}");
                    if !self.notify(NetworkEvent::ConnectError(err.to_string())).await {
                        break;
                    }
                }
            }

            if !self.options.reconnect {
                self.wait_for_shutdown().await;
                break;
            }

            log::info!("Reconnecting in {delay:?}");
            if self.until_shutdown(sleep(delay)).await.is_none() {
                break;
            }
            delay = next_delay(delay, self.options.reconnect_delay_max);
        }

        log::info!("Socket event loop stopped for room {}", self.join.room_id);
    }

    /// Errors before the handshake completes are returned as `Err`; anything
    /// after it ends the session with [`SessionEnd::Lost`].
    async fn connect_and_run(&mut self) -> Result<SessionEnd, TransportError> {
        let url = self.options.url.clone();
        let connect_timeout = self.options.connect_timeout;
        log::info!("Connecting to {url}");

        let opened = self
            .until_shutdown(async move { timeout(connect_timeout, transport::open(&url)).await })
            .await;
        let Some(opened) = opened else {
            return Ok(SessionEnd::Shutdown);
        };
        let (mut socket, handshake) = opened.map_err(|_| TransportError::Timeout)??;
        log::info!("Connected with sid {}", handshake.sid);

        if let Err(err) = transport::send_text(&mut socket, protocol::encode_join(&self.join)?).await {
            return Ok(SessionEnd::Lost(err.to_string()));
        }
        log::info!("Joined {} as {}", self.join.room_id, self.join.user);
        if !self.notify(NetworkEvent::Connected).await {
            transport::close(&mut socket).await;
            return Ok(SessionEnd::Shutdown);
        }

        let heartbeat = handshake.heartbeat_window();
        let deadline = sleep_until(heartbeat_deadline(heartbeat));
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    let Some(command) = command else {
                        transport::close(&mut socket).await;
                        return Ok(SessionEnd::Shutdown);
                    };
                    if let Err(end) = Self::write_command(&mut socket, &command).await {
                        return Ok(end);
                    }
                }
                packet = transport::next_packet(&mut socket) => {
                    deadline.as_mut().reset(heartbeat_deadline(heartbeat));
                    match packet {
                        Ok(packet) => {
                            if let Some(end) = self.handle_packet(&mut socket, packet).await {
                                return Ok(end);
                            }
                        }
                        Err(err) => return Ok(SessionEnd::Lost(err.to_string())),
                    }
                }
                () = &mut deadline => {
                    return Ok(SessionEnd::Lost("ping timeout".to_owned()));
                }
            }
        }
    }

    async fn write_command(socket: &mut WsStream, command: &NetworkCommand) -> Result<(), SessionEnd> {
        let packet = match protocol::encode_command(command) {
            Ok(packet) => packet,
            Err(err) => {
                log::warn!("Failed to encode {}: {err}", protocol::command_name(command));
                return Ok(());
            }
        };
        match transport::send_text(socket, packet).await {
            Ok(()) => {
                log::debug!("Emitted {}", protocol::command_name(command));
                Ok(())
            }
            Err(err) => Err(SessionEnd::Lost(err.to_string())),
        }
    }

    async fn handle_packet(&mut self, socket: &mut WsStream, packet: EnginePacket) -> Option<SessionEnd> {
        match packet {
            EnginePacket::Ping => {
                if let Err(err) = transport::send_text(socket, protocol::encode_pong()).await {
                    return Some(SessionEnd::Lost(err.to_string()));
                }
            }
            EnginePacket::Close => return Some(SessionEnd::Lost("transport close".to_owned())),
            EnginePacket::Message(SocketPacket::Event { name, args }) => {
                match protocol::decode_event(&name, args) {
                    Ok(Some(event)) => {
                        if !self.notify(event).await {
                            transport::close(socket).await;
                            return Some(SessionEnd::Shutdown);
                        }
                    }
                    Ok(None) => log::debug!("Ignoring event `{name}`"),
                    Err(err) => log::warn!("Malformed `{name}` event: {err}"),
                }
            }
            EnginePacket::Message(SocketPacket::Disconnect) => {
                return Some(SessionEnd::ServerDisconnect);
            }
            EnginePacket::Message(SocketPacket::ConnectError(message)) => {
                log::error!("Socket error: {message}");
                if !self.notify(NetworkEvent::ConnectError(message)).await {
                    transport::close(socket).await;
                    return Some(SessionEnd::Shutdown);
                }
            }
            other => log::debug!("Ignoring {other:?}"),
        }
        None
    }

    /// Forward an event to the session. `false` once the session dropped its
    /// receiver.
    async fn notify(&self, event: NetworkEvent) -> bool {
        self.event_sender.send(event).await.is_ok()
    }

    /// Drive `future` while watching the command channel. Commands that show
    /// up meanwhile are dropped; `None` means the session went away first.
    async fn until_shutdown<F: Future>(&mut self, future: F) -> Option<F::Output> {
        tokio::pin!(future);
        loop {
            tokio::select! {
                output = &mut future => return Some(output),
                command = self.command_receiver.recv() => match command {
                    Some(command) => log::warn!(
                        "Dropping {} while disconnected",
                        protocol::command_name(&command)
                    ),
                    None => return None,
                },
            }
        }
    }

    async fn wait_for_shutdown(&mut self) {
        while let Some(command) = self.command_receiver.recv().await {
            log::warn!(
                "Dropping {} while disconnected",
                protocol::command_name(&command)
            );
        }
    }
}
