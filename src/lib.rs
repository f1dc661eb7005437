//! Desktop client for a Socket.IO room chat.
//!
//! `session` owns the connection lifecycle, `network` speaks the wire
//! protocol, `ui` renders the room with egui.

pub mod common;
pub mod config;
pub mod network;
pub mod session;
pub mod ui;
