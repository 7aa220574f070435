use std::sync::Arc;

use chrono::{DateTime, Local};
use egui::{Color32, Context, RichText, TextureHandle, Ui};
use log::warn;

use tf_core::GenerationMode;
use tf_core::api::GenerationResult;

use crate::events::{AppEvent, UiEvent};
use crate::ui::UiEventSender;

#[derive(Default)]
pub struct ResultPanel {
    mode: Option<GenerationMode>,
    step: usize,
    generating: bool,

    result: Option<GenerationResult>,
    error: Option<String>,
    finished_at: Option<DateTime<Local>>,

    preview_bytes: Option<Arc<Vec<u8>>>,
    preview: Option<TextureHandle>,
    preview_error: Option<String>,
}

impl ResultPanel {
    pub fn show(&mut self, ctx: &Context, sender: &mut UiEventSender) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.generating {
                self.progress_ui(ui);
                return;
            }

            if let Some(error) = self.error.clone() {
                self.error_ui(ui, &error);
            }

            if self.result.is_some() {
                self.decode_preview(ctx);
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        self.result_ui(ui, sender);
                    });
            } else if self.error.is_none() {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.heading("No toy yet");
                    ui.label("Pick a person photo and a style guide, write a prompt,");
                    ui.label("then hit Generate Toy.");
                });
            }
        });
    }

    fn progress_ui(&self, ui: &mut Ui) {
        let Some(mode) = self.mode else {
            return;
        };
        let steps = mode.steps();

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);

            egui::Frame::new()
                .fill(Color32::from_rgb(30, 50, 80))
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::same(16))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.heading("Generating...");
                    });
                    ui.add_space(8.0);

                    for (index, label) in steps.iter().enumerate() {
                        let (icon, color) = if index < self.step {
                            ("✅", Color32::GREEN)
                        } else if index == self.step {
                            ("⚡", Color32::YELLOW)
                        } else {
                            ("⏳", Color32::GRAY)
                        };
                        ui.label(RichText::new(format!("{icon} {label}")).color(color));
                    }

                    ui.add_space(8.0);
                    ui.add(
                        egui::ProgressBar::new(self.step as f32 / steps.len() as f32)
                            .desired_width(280.0)
                            .show_percentage()
                            .animate(true),
                    );
                });
        });
    }

    fn error_ui(&self, ui: &mut Ui, error: &str) {
        egui::Frame::new()
            .fill(Color32::from_rgb(60, 20, 20))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("❌").size(20.0));
                    ui.vertical(|ui| {
                        ui.label(RichText::new("Generation failed").strong().color(Color32::RED));
                        ui.label(RichText::new(error).color(Color32::LIGHT_RED));
                        ui.label(
                            RichText::new("Adjust your inputs and submit again.")
                                .small()
                                .color(Color32::GRAY),
                        );
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn result_ui(&self, ui: &mut Ui, sender: &mut UiEventSender) {
        let Some(result) = &self.result else {
            return;
        };

        ui.horizontal(|ui| {
            ui.heading("🧸 Your Toy");
            if let Some(at) = &self.finished_at {
                ui.label(
                    RichText::new(format!("completed at {}", at.format("%H:%M:%S")))
                        .small()
                        .color(Color32::GRAY),
                );
            }
        });
        ui.separator();

        ui.vertical_centered(|ui| {
            if let Some(texture) = &self.preview {
                ui.add(egui::Image::new(texture).max_height(320.0));
            } else if let Some(message) = &self.preview_error {
                ui.label(RichText::new("🖼 Toy image unavailable").color(Color32::GRAY));
                ui.label(RichText::new(message).small().color(Color32::GRAY));
            } else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading toy image...").color(Color32::GRAY));
                });
            }
        });

        ui.add_space(10.0);

        analysis_block(ui, "👤 Person Analysis", &result.person_description);
        ui.add_space(6.0);
        analysis_block(ui, "🎨 Style Analysis", &result.style_description);

        if let Some(model) = &result.model_result {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Downloads").size(16.0));
                if let Some(id) = &model.model_id {
                    ui.label(
                        RichText::new(format!("model {id}"))
                            .small()
                            .color(Color32::GRAY),
                    );
                }
            });

            for (kind, path) in model.files.artifacts() {
                let file_name = path.rsplit('/').next().unwrap_or(path);

                egui::Frame::new()
                    .fill(Color32::from_gray(30))
                    .stroke(egui::Stroke::new(1.0, Color32::from_gray(60)))
                    .corner_radius(egui::CornerRadius::same(5))
                    .inner_margin(egui::Margin::same(10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(kind.icon()).size(20.0));
                            ui.vertical(|ui| {
                                ui.label(RichText::new(kind.label()).strong());
                                ui.label(RichText::new(file_name).small().color(Color32::GRAY));
                            });
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("⬇ Download").clicked() {
                                        sender.instant(UiEvent::OpenArtifact(path.to_string()));
                                    }
                                },
                            );
                        });
                    });
                ui.add_space(5.0);
            }
        }
    }

    /// Turn fetched image bytes into a texture once they arrive.
    fn decode_preview(&mut self, ctx: &Context) {
        if self.preview.is_some() {
            return;
        }
        let Some(bytes) = &self.preview_bytes else {
            return;
        };

        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                self.preview =
                    Some(ctx.load_texture("toy-image", pixels, egui::TextureOptions::LINEAR));
            }
            Err(e) => {
                warn!("could not decode toy image: {e}");
                self.preview_bytes = None;
            }
        }
    }

    pub fn on_app_event(&mut self, ev: &AppEvent) {
        match ev {
            AppEvent::GenerationStarted(mode) => {
                self.mode = Some(*mode);
                self.step = 0;
                self.generating = true;
                self.result = None;
                self.error = None;
                self.finished_at = None;
                self.preview = None;
                self.preview_bytes = None;
                self.preview_error = None;
            }
            AppEvent::GenerationProgress { step } => {
                self.step = *step;
            }
            AppEvent::GenerationFinished(result) => {
                self.generating = false;
                self.result = Some(result.clone());
                self.finished_at = Some(Local::now());
            }
            AppEvent::GenerationFailed(message) => {
                self.generating = false;
                self.error = Some(message.clone());
            }
            AppEvent::PreviewLoaded(bytes) => {
                self.preview_bytes = Some(bytes.clone());
                self.preview_error = None;
            }
            AppEvent::PreviewFailed(message) => {
                self.preview_error = Some(message.clone());
            }
            AppEvent::FormCleared => {
                *self = Self::default();
            }
            _ => {}
        }
    }
}

fn analysis_block(ui: &mut Ui, title: &str, body: &str) {
    egui::Frame::new()
        .fill(Color32::from_gray(25))
        .corner_radius(egui::CornerRadius::same(5))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            ui.add_space(4.0);
            ui.label(body);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_failure_replaces_the_pending_state() {
        let mut panel = ResultPanel::default();
        panel.on_app_event(&AppEvent::GenerationStarted(GenerationMode::Full));
        panel.on_app_event(&AppEvent::PreviewFailed("connection refused".into()));
        assert_eq!(panel.preview_error.as_deref(), Some("connection refused"));

        // A late successful fetch still wins
        panel.on_app_event(&AppEvent::PreviewLoaded(Arc::new(vec![1, 2, 3])));
        assert!(panel.preview_error.is_none());
        assert!(panel.preview_bytes.is_some());
    }

    #[test]
    fn test_new_generation_clears_a_stale_preview_failure() {
        let mut panel = ResultPanel::default();
        panel.on_app_event(&AppEvent::PreviewFailed("boom".into()));
        panel.on_app_event(&AppEvent::GenerationStarted(GenerationMode::ImageOnly));
        assert!(panel.preview_error.is_none());
    }
}
