use clap::Parser;
use dotenvy::dotenv;
use eframe::egui;
use room_chat::config;
use room_chat::network::{ClientOptions, TransportError};
use room_chat::session::SocketConnector;
use room_chat::ui::ChatApp;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("invalid connection settings: {0}")]
    Transport(#[from] TransportError),
    #[error("UI failed: {0}")]
    Ui(#[from] eframe::Error),
}

#[derive(Parser)]
#[command(name = "room_chat", version, about = "Real-time room chat client")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Chat server address, e.g. http://localhost:3001
    #[arg(long, env = "CHAT_SERVER_URL")]
    server_url: Option<String>,
    #[arg(long, env = "CHAT_ROOM")]
    room: Option<String>,
    /// Skip the name entry screen
    #[arg(long, env = "CHAT_USER")]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(server_url) = cli.server_url {
        app_config.server_url = server_url;
    }
    if let Some(room) = cli.room {
        app_config.room_id = room;
    }

    let options = ClientOptions::from_config(&app_config)?;
    log::info!(
        "Chat client for room {} via {}",
        app_config.room_id,
        options.url
    );
    let connector = SocketConnector::new(options, tokio::runtime::Handle::current());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
        ..Default::default()
    };
    let config_path = cli.config;
    let user = cli.user;

    eframe::run_native(
        "Room Chat",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(ChatApp::new(
                cc,
                app_config,
                config_path,
                user,
                connector,
            )))
        }),
    )?;
    Ok(())
}
