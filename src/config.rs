#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/chat.json";
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";
pub const DEFAULT_ROOM_ID: &str = "room-1";
pub const DEFAULT_USER: &str = "def-user";
pub const DEFAULT_PRIVILEGED_USER: &str = "amitoj";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub room_id: String,
    /// Name used when the name entry is submitted empty.
    pub default_user: String,
    /// Identity that gets the "Clear Chat" control. Client-side only: any
    /// client can claim this name, the server has to enforce its own rules.
    pub privileged_user: Option<String>,
    /// Last submitted name, prefilled on the next start.
    pub last_user: Option<String>,
    pub reconnect: bool,
    pub reconnect_delay_ms: u64,
    pub reconnect_delay_max_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            room_id: DEFAULT_ROOM_ID.to_owned(),
            default_user: DEFAULT_USER.to_owned(),
            privileged_user: Some(DEFAULT_PRIVILEGED_USER.to_owned()),
            last_user: None,
            reconnect: true,
            reconnect_delay_ms: 1_000,
            reconnect_delay_max_ms: 5_000,
            connect_timeout_ms: 20_000,
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

/// Store the submitted display name so the next start can prefill it.
pub fn remember_user(path: &str, user: &str) {
    let mut config = load_config(path);
    if config.last_user.as_deref() == Some(user) {
        return;
    }
    config.last_user = Some(user.to_owned());

    if let Err(err) = save_config(path, &config) {
        log::error!("Failed to write config {}: {err}", path);
    } else {
        log::info!("Remembered user {} in {}", user, path);
    }
}
