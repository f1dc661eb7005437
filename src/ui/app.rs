use std::time::Duration;

use eframe::egui;

use crate::config::{self, AppConfig};
use crate::session::{Session, SessionIdentity, SocketConnector};

use super::components::{
    chat_area, debug_panel, input_bar, name_prompt,
    sidebar::{self, SidebarActions, SidebarInfo},
};
use super::state::AppState;

/// Network events are polled on repaint; this bounds the latency while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum Screen {
    /// Waiting for a display name; no session exists yet.
    NamePrompt(String),
    Chat(ChatView),
}

pub struct ChatApp {
    config: AppConfig,
    config_path: String,
    connector: SocketConnector,
    screen: Screen,
}

impl ChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        config_path: String,
        user: Option<String>,
        connector: SocketConnector,
    ) -> Self {
        let prefill = config.last_user.clone().unwrap_or_default();
        let mut app = Self {
            config,
            config_path,
            connector,
            screen: Screen::NamePrompt(prefill),
        };
        if let Some(user) = user {
            let name = name_prompt::resolve_user_name(&user, &app.config.default_user);
            app.screen = Screen::Chat(app.mount(name));
        }
        app
    }

    fn mount(&self, user: String) -> ChatView {
        let identity = SessionIdentity {
            room_id: self.config.room_id.clone(),
            user,
        };
        let session = Session::new(
            self.connector.clone(),
            identity,
            self.config.privileged_user.clone(),
        );
        ChatView::mount(session)
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut joined = None;
        let mut left = None;

        match &mut self.screen {
            Screen::NamePrompt(name_input) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if let Some(input) = name_prompt::render(ui, name_input) {
                        joined = Some(name_prompt::resolve_user_name(
                            &input,
                            &self.config.default_user,
                        ));
                    }
                });
            }
            Screen::Chat(view) => {
                if view.show(ctx) == ViewAction::Leave {
                    left = Some(view.session.user().to_owned());
                }
                ctx.request_repaint_after(POLL_INTERVAL);
            }
        }

        if let Some(user) = joined {
            config::remember_user(&self.config_path, &user);
            self.screen = Screen::Chat(self.mount(user));
        }
        if let Some(user) = left {
            // Dropping the view drops its session, which tears the connection down.
            self.screen = Screen::NamePrompt(user);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewAction {
    None,
    Leave,
}

/// A mounted chat view. Owns its session for exactly as long as it exists.
struct ChatView {
    session: Session,
    state: AppState,
}

impl ChatView {
    fn mount(mut session: Session) -> Self {
        session.activate();
        Self {
            session,
            state: AppState::new(),
        }
    }

    fn show(&mut self, ctx: &egui::Context) -> ViewAction {
        for event in self.session.poll_events() {
            self.state.apply(event);
        }

        let mut action = ViewAction::None;

        egui::SidePanel::left("room_sidebar")
            .resizable(true)
            .default_width(180.0)
            .show(ctx, |ui| {
                let info = SidebarInfo {
                    room_id: self.session.room_id(),
                    user: self.session.user(),
                    state: self.session.state(),
                    can_clear: self.session.can_clear_history(),
                };
                let actions: SidebarActions = sidebar::render(ui, &info);
                if actions.clear_chat {
                    self.clear_chat();
                }
                if actions.leave {
                    action = ViewAction::Leave;
                }
            });

        egui::SidePanel::right("debug_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                debug_panel::render(
                    ui,
                    &self.state,
                    self.session.state(),
                    self.session.connection_id(),
                );
            });

        egui::TopBottomPanel::bottom("input_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            if input_bar::render(ui, &mut self.state.input_text) {
                self.send_input();
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            chat_area::render(ui, &mut self.state.messages, self.session.user());
        });

        action
    }

    fn send_input(&mut self) {
        match self.session.send_message(&self.state.input_text) {
            Ok(true) => self.state.input_text.clear(),
            Ok(false) => {}
            Err(err) => log::warn!("Failed to send message: {err}"),
        }
    }

    fn clear_chat(&self) {
        if let Err(err) = self.session.clear_history() {
            log::warn!("Failed to clear chat: {err}");
        }
    }
}
