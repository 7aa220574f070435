use egui::{Color32, Context, RichText};

use crate::api::ApiStatus;
use crate::events::{AppEvent, UiEvent};
use crate::ui::UiEventSender;

pub struct TopPanel {
    status: ApiStatus,
    models_ready: bool,
}

impl Default for TopPanel {
    fn default() -> Self {
        Self {
            status: ApiStatus::Checking,
            models_ready: false,
        }
    }
}

impl TopPanel {
    pub fn show(&mut self, ctx: &Context, sender: &mut UiEventSender) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🧸 Toy Forge");
                ui.separator();
                ui.label(
                    RichText::new("Turn a photo into a collectible toy figure")
                        .color(Color32::LIGHT_BLUE),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button("🔄")
                        .on_hover_text("Re-check the generation service")
                        .clicked()
                    {
                        sender.instant(UiEvent::CheckHealth);
                    }

                    let badge = ui.label(
                        RichText::new(format!("{} {}", self.status.icon(), self.status.label()))
                            .color(self.status.color()),
                    );

                    if self.status == ApiStatus::Healthy {
                        let detail = if self.models_ready {
                            "Analysis and 3D pipelines loaded"
                        } else {
                            "Service reachable, models still loading"
                        };
                        badge.on_hover_text(detail);
                    }
                });
            });
        });
    }

    pub fn on_app_event(&mut self, ev: &AppEvent) {
        if let AppEvent::ApiStatusChanged {
            status,
            models_ready,
        } = ev
        {
            self.status = *status;
            self.models_ready = *models_ready;
        }
    }
}
