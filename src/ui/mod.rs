pub mod app;
pub mod components;
pub mod message_log;
pub mod state;

pub use app::ChatApp;
