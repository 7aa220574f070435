use std::path::Path;

use egui::{Color32, Context, RichText, TextEdit, TextureHandle, Ui};
use log::warn;

use tf_core::upload::{self, UploadedImage};
use tf_core::{GenerationMode, ImageSlot, OutputFormat, ToyForm};

use crate::api::ApiStatus;
use crate::events::{AppEvent, UiEvent};
use crate::ui::UiEventSender;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

pub struct FormPanel {
    form: ToyForm,
    person_preview: Option<TextureHandle>,
    style_preview: Option<TextureHandle>,
    intake_error: Option<String>,
    is_generating: bool,
    api_status: ApiStatus,
}

impl Default for FormPanel {
    fn default() -> Self {
        Self {
            form: ToyForm::default(),
            person_preview: None,
            style_preview: None,
            intake_error: None,
            is_generating: false,
            api_status: ApiStatus::Checking,
        }
    }
}

impl FormPanel {
    pub fn show(&mut self, ctx: &Context, sender: &mut UiEventSender) {
        egui::SidePanel::left("form_panel")
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(4.0);

                    let person_rect = self.slot_ui(ui, ImageSlot::Person);
                    ui.add_space(8.0);
                    let style_rect = self.slot_ui(ui, ImageSlot::StyleGuide);

                    if let Some(err) = &self.intake_error {
                        ui.label(RichText::new(err).small().color(Color32::RED));
                    }

                    ui.separator();

                    // === Prompt ===
                    ui.heading(RichText::new("✨ Prompt").size(16.0));
                    ui.add_space(5.0);
                    let text_edit = TextEdit::multiline(&mut self.form.prompt)
                        .desired_width(f32::INFINITY)
                        .desired_rows(3)
                        .hint_text("e.g., a cute chibi figure holding a skateboard");
                    ui.add(text_edit);

                    ui.separator();

                    // === Mode & format ===
                    let mut image_only = self.form.mode == GenerationMode::ImageOnly;
                    if ui
                        .checkbox(&mut image_only, "Image only (skip the 3D model)")
                        .changed()
                    {
                        self.form.mode = if image_only {
                            GenerationMode::ImageOnly
                        } else {
                            GenerationMode::Full
                        };
                    }

                    if self.form.mode.includes_model() {
                        ui.add_space(5.0);
                        ui.label(RichText::new("3D output format").strong());
                        for format in OutputFormat::all() {
                            ui.radio_value(
                                &mut self.form.format,
                                format,
                                format!("{} {}", format.icon(), format.name()),
                            )
                            .on_hover_text(format.description());
                        }
                    }

                    ui.separator();

                    // === Submit ===
                    let can_submit = self.form.ready()
                        && !self.is_generating
                        && self.api_status != ApiStatus::Offline;

                    let generate_button = ui.add_enabled(
                        can_submit,
                        egui::Button::new(RichText::new("🎨 Generate Toy").size(14.0))
                            .min_size(egui::vec2(ui.available_width(), 30.0)),
                    );

                    if generate_button.clicked() {
                        if let (Some(request), Some(person), Some(style_guide)) = (
                            self.form.request(),
                            self.form.person.clone(),
                            self.form.style_guide.clone(),
                        ) {
                            sender.instant(UiEvent::Generate {
                                person,
                                style_guide,
                                request,
                            });
                            self.is_generating = true;
                        }
                    }

                    if self.api_status == ApiStatus::Offline {
                        ui.label(
                            RichText::new("Generation service unreachable")
                                .small()
                                .color(Color32::RED),
                        );
                    }

                    ui.add_space(5.0);

                    let reset_button =
                        ui.add_enabled(!self.is_generating, egui::Button::new("↺ Start Over"));
                    if reset_button.clicked() {
                        sender.instant(UiEvent::ResetForm);
                    }

                    self.handle_drops(ctx, person_rect, style_rect);
                });
            });
    }

    /// One image slot: preview plus file info when set, a drop hint and a
    /// file picker otherwise.
    fn slot_ui(&mut self, ui: &mut Ui, slot: ImageSlot) -> egui::Rect {
        ui.label(RichText::new(slot.label()).strong());

        let info = self
            .form
            .image(slot)
            .map(|i| (i.file_name.clone(), i.size_label.clone()));
        let preview = self.preview(slot).clone();
        let mut pick = false;

        let frame = egui::Frame::new()
            .fill(Color32::from_gray(30))
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(60)))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(10));

        let inner = frame.show(ui, |ui| {
            ui.set_width(ui.available_width());

            if let Some((name, size)) = &info {
                if let Some(texture) = &preview {
                    ui.vertical_centered(|ui| {
                        ui.add(egui::Image::new(texture).max_height(120.0));
                    });
                }
                ui.horizontal(|ui| {
                    ui.label(RichText::new(name).strong());
                    ui.label(RichText::new(size).small().color(Color32::GRAY));
                });
                if ui.button("Replace…").clicked() {
                    pick = true;
                }
            } else {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(slot.hint()).small().color(Color32::GRAY));
                    ui.add_space(4.0);
                    ui.label(RichText::new("Drop an image here, or").small());
                    if ui.button("📁 Browse…").clicked() {
                        pick = true;
                    }
                });
            }
        });

        if pick {
            let picked = rfd::FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file();
            if let Some(path) = picked {
                self.intake_path(ui.ctx(), slot, &path);
            }
        }

        inner.response.rect
    }

    /// Route files dropped this frame to whichever slot the pointer is over.
    fn handle_drops(&mut self, ctx: &Context, person_rect: egui::Rect, style_rect: egui::Rect) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) else {
            return;
        };

        let slot = if person_rect.contains(pos) {
            ImageSlot::Person
        } else if style_rect.contains(pos) {
            ImageSlot::StyleGuide
        } else {
            return;
        };

        let file = &dropped[0];
        if let Some(path) = &file.path {
            self.intake_path(ctx, slot, path);
        } else if let Some(bytes) = &file.bytes {
            let mime = if file.mime.is_empty() {
                upload::mime_for_name(&file.name)
                    .unwrap_or_default()
                    .to_string()
            } else {
                file.mime.clone()
            };
            match UploadedImage::from_parts(&file.name, &mime, bytes.to_vec()) {
                Ok(image) => self.assign_image(ctx, slot, image),
                Err(e) => self.reject(e),
            }
        }
    }

    fn intake_path(&mut self, ctx: &Context, slot: ImageSlot, path: &Path) {
        match UploadedImage::from_path(path) {
            Ok(image) => self.assign_image(ctx, slot, image),
            Err(e) => self.reject(e),
        }
    }

    fn assign_image(&mut self, ctx: &Context, slot: ImageSlot, image: UploadedImage) {
        *self.preview_mut(slot) = make_preview(ctx, &image, slot.label());
        self.form.set_image(slot, image);
        self.intake_error = None;
    }

    /// The slot stays unset; just surface why.
    fn reject(&mut self, error: tf_core::Error) {
        warn!("rejected file: {error}");
        self.intake_error = Some(error.to_string());
    }

    fn preview(&self, slot: ImageSlot) -> &Option<TextureHandle> {
        match slot {
            ImageSlot::Person => &self.person_preview,
            ImageSlot::StyleGuide => &self.style_preview,
        }
    }

    fn preview_mut(&mut self, slot: ImageSlot) -> &mut Option<TextureHandle> {
        match slot {
            ImageSlot::Person => &mut self.person_preview,
            ImageSlot::StyleGuide => &mut self.style_preview,
        }
    }

    pub fn on_app_event(&mut self, ev: &AppEvent) {
        match ev {
            AppEvent::ApiStatusChanged { status, .. } => {
                self.api_status = *status;
            }
            AppEvent::GenerationStarted(_) => {
                self.is_generating = true;
            }
            AppEvent::GenerationFinished(_) | AppEvent::GenerationFailed(_) => {
                self.is_generating = false;
            }
            AppEvent::FormCleared => {
                self.form.reset();
                self.person_preview = None;
                self.style_preview = None;
                self.intake_error = None;
            }
            _ => {}
        }
    }
}

fn make_preview(ctx: &Context, image: &UploadedImage, label: &str) -> Option<TextureHandle> {
    let decoded = match image::load_from_memory(&image.bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("could not decode {} for preview: {e}", image.file_name);
            return None;
        }
    };

    let thumb = decoded.thumbnail(512, 512).to_rgba8();
    let size = [thumb.width() as usize, thumb.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, thumb.as_raw());

    Some(ctx.load_texture(format!("{label}-preview"), pixels, egui::TextureOptions::LINEAR))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The form locks itself on click and only a terminal event may release
    // it; a refused submit reports back as a failure for exactly this reason.
    #[test]
    fn test_failure_event_releases_a_locked_form() {
        let mut panel = FormPanel::default();
        panel.is_generating = true;

        panel.on_app_event(&AppEvent::ApiStatusChanged {
            status: ApiStatus::Offline,
            models_ready: false,
        });
        assert!(panel.is_generating);

        panel.on_app_event(&AppEvent::GenerationFailed(
            "Generation service unreachable.".into(),
        ));
        assert!(!panel.is_generating);
    }
}
