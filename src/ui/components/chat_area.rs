use eframe::egui;

use crate::common::ChatMessage;
use crate::ui::message_log::{MessageLog, MessageVariant, classify};

const BUBBLE_WIDTH_RATIO: f32 = 0.75;
const OWN_FILL: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const OTHER_FILL: egui::Color32 = egui::Color32::from_rgb(55, 65, 81);
const SYSTEM_FILL: egui::Color32 = egui::Color32::from_rgb(69, 26, 26);
const SYSTEM_TEXT: egui::Color32 = egui::Color32::from_rgb(252, 165, 165);

pub fn render(ui: &mut egui::Ui, log: &mut MessageLog, self_user: &str) {
    let follow = log.take_scroll_request();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if log.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
                return;
            }

            let last = log.len() - 1;
            for (index, message) in log.iter().enumerate() {
                let response = render_message(ui, message, classify(message, self_user));
                if follow && index == last {
                    // Animated according to the style's scroll settings.
                    response.scroll_to_me(Some(egui::Align::BOTTOM));
                }
                ui.add_space(4.0);
            }
        });
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage, variant: MessageVariant) -> egui::Response {
    let align = match variant {
        MessageVariant::Own => egui::Align::Max,
        MessageVariant::Other => egui::Align::Min,
        MessageVariant::System => egui::Align::Center,
    };
    let fill = match variant {
        MessageVariant::Own => OWN_FILL,
        MessageVariant::Other => OTHER_FILL,
        MessageVariant::System => SYSTEM_FILL,
    };
    let max_width = ui.available_width() * BUBBLE_WIDTH_RATIO;

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                if variant == MessageVariant::System {
                    ui.label(
                        egui::RichText::new(message.text.as_str())
                            .italics()
                            .color(SYSTEM_TEXT),
                    );
                    return;
                }

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(message.user.as_str()).small().strong());
                    ui.label(egui::RichText::new(message.time.as_str()).small().weak());
                });
                ui.label(egui::RichText::new(message.text.as_str()).color(egui::Color32::WHITE));
            });
    })
    .response
}
