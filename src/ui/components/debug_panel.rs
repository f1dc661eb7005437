use eframe::egui;

use crate::session::SessionState;
use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState, session: SessionState, connection: Option<uuid::Uuid>) {
    ui.heading("Debug Info");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Session:");
        ui.label(session.to_string());
    });
    ui.horizontal(|ui| {
        ui.label("Connection:");
        match connection {
            Some(id) => ui.label(egui::RichText::new(id.to_string()).small().monospace()),
            None => ui.label(egui::RichText::new("none").weak()),
        };
    });
    ui.horizontal(|ui| {
        ui.label("Messages:");
        ui.label(format!("{}", state.messages.len()));
    });

    ui.separator();

    // Hiển thị log events gần đây
    ui.label("Recent Events:");
    egui::ScrollArea::vertical()
        .id_salt("debug_events")
        .max_height(240.0)
        .show(ui, |ui| {
            for event in state.debug_events.iter().rev().take(20) {
                let time_str = event.timestamp.format("%H:%M:%S");
                let color = match event.event_type {
                    "CONNECTED" => egui::Color32::GREEN,
                    "CONNECT_ERROR" | "DISCONNECTED" => egui::Color32::RED,
                    "HISTORY" => egui::Color32::YELLOW,
                    _ => egui::Color32::WHITE,
                };

                ui.horizontal(|ui| {
                    ui.colored_label(color, format!("[{}]", time_str));
                    ui.label(&event.message);
                });
            }
        });
}
