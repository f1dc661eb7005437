use eframe::egui;

/// Multi-line input. Enter submits, Shift+Enter inserts a newline.
///
/// Returns `true` when the user asked to send; the caller decides whether the
/// text is worth sending and clears it.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> bool {
    let input_id = ui.make_persistent_id("message_input");
    let has_focus = ui.memory(|memory| memory.has_focus(input_id));
    let shift = ui.input(|input| input.modifiers.shift);

    // Must run before the TextEdit sees the key, otherwise it inserts "\n".
    let mut send = has_focus
        && !shift
        && ui.input_mut(|input| input.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

    ui.horizontal(|ui| {
        let button_width = 64.0;
        ui.add(
            egui::TextEdit::multiline(input_text)
                .id(input_id)
                .desired_rows(1)
                .hint_text("Type a message…")
                .desired_width(ui.available_width() - button_width),
        );
        if ui.button("Send").clicked() {
            send = true;
        }
    });

    ui.label(egui::RichText::new("Enter to send · Shift + Enter for new line").small().weak());
    send
}
