use eframe::egui;

use crate::session::SessionState;

#[derive(Default)]
pub struct SidebarActions {
    pub clear_chat: bool,
    pub leave: bool,
}

pub struct SidebarInfo<'a> {
    pub room_id: &'a str,
    pub user: &'a str,
    pub state: SessionState,
    pub can_clear: bool,
}

pub fn render(ui: &mut egui::Ui, info: &SidebarInfo<'_>) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("Room");
    ui.separator();

    ui.horizontal(|ui| {
        ui.label("Room:");
        ui.colored_label(egui::Color32::LIGHT_BLUE, info.room_id);
    });
    ui.horizontal(|ui| {
        ui.label("You are:");
        ui.colored_label(egui::Color32::LIGHT_GREEN, info.user);
    });

    ui.horizontal(|ui| {
        let color = match info.state {
            SessionState::Active => egui::Color32::GREEN,
            SessionState::Joining => egui::Color32::YELLOW,
            SessionState::Errored => egui::Color32::RED,
            SessionState::Inactive => egui::Color32::GRAY,
        };
        ui.colored_label(color, "●");
        ui.label(egui::RichText::new(info.state.to_string()).weak());
    });

    ui.separator();
    if ui.button("Leave room").clicked() {
        actions.leave = true;
    }

    if info.can_clear {
        ui.add_space(12.0);
        let clear = egui::Button::new(egui::RichText::new("Clear Chat").color(egui::Color32::WHITE))
            .fill(egui::Color32::from_rgb(220, 38, 38));
        if ui.add(clear).clicked() {
            actions.clear_chat = true;
        }
    }

    actions
}
