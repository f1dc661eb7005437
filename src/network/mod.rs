pub mod client;
pub mod protocol;
pub mod transport;

pub use client::{ClientOptions, SocketClient};
pub use transport::TransportError;
