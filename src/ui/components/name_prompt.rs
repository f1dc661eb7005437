use eframe::egui;

/// Name entry shown before a session exists. Returns the submitted text.
pub fn render(ui: &mut egui::Ui, name_input: &mut String) -> Option<String> {
    let mut submit = false;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.heading("Enter your name");
        ui.add_space(8.0);

        let response = ui.add(
            egui::TextEdit::singleline(name_input)
                .hint_text("Display name")
                .desired_width(240.0),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submit = true;
        }
        if ui.button("Join").clicked() {
            submit = true;
        }
    });

    submit.then(|| name_input.clone())
}

/// Empty input falls back to `default_user`.
pub fn resolve_user_name(input: &str, default_user: &str) -> String {
    let name = input.trim();
    if name.is_empty() {
        default_user.to_owned()
    } else {
        name.to_owned()
    }
}
