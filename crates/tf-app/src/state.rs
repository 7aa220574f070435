use std::sync::Arc;
use std::time::Instant;

use egui_wgpu::wgpu;
use egui_wgpu::wgpu::StoreOp;
use log::{error, info, warn};
use url::Url;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use tf_core::api::GenerationRequest;
use tf_core::progress::ProgressSim;
use tf_core::upload::UploadedImage;

use crate::api::{ApiClient, ApiStatus};
use crate::config::AppConfig;
use crate::events::{ApiEvent, AppEvent, TfEvent, UiEvent};
use crate::gfx::GfxState;
use crate::ui::UiState;
use crate::worker::ApiWorker;

/// Submit guard, decided against the authoritative status held here rather
/// than the panel's copy, which lags by one event delivery.
fn submit_rejection(generating: bool, status: ApiStatus) -> Option<&'static str> {
    if generating {
        Some("A generation request is already running.")
    } else if status == ApiStatus::Offline {
        Some("Generation service unreachable. Re-check the connection and try again.")
    } else {
        None
    }
}

pub struct AppState {
    pub(crate) window: Arc<Window>,
    event_loop_proxy: Arc<EventLoopProxy<TfEvent>>,

    pub gfx: GfxState,
    pub ui: UiState,

    worker: ApiWorker,
    api_base: Url,

    api_status: ApiStatus,
    generating: bool,
    progress: Option<ProgressSim>,
}

impl AppState {
    pub async fn new(
        window: Arc<Window>,
        event_loop_proxy: Arc<EventLoopProxy<TfEvent>>,
    ) -> anyhow::Result<Self> {
        let config = AppConfig::load()?;
        info!("generation service at {}", config.api_base);

        let client = ApiClient::new(config.api_base.clone())?;
        let worker = ApiWorker::new(client, event_loop_proxy.clone());

        let gfx = GfxState::new(window.clone()).await?;
        let ui = UiState::new(&gfx, window.clone(), event_loop_proxy.clone());

        let mut state = Self {
            window,
            event_loop_proxy,
            gfx,
            ui,
            worker,
            api_base: config.api_base,
            api_status: ApiStatus::Checking,
            generating: false,
            progress: None,
        };

        // Probe the service once at startup
        state.check_health();

        Ok(state)
    }

    fn push_app_event(&self, event: AppEvent) {
        let _ = self.event_loop_proxy.send_event(TfEvent::App(event));
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    fn check_health(&mut self) {
        self.api_status = ApiStatus::Checking;
        self.push_app_event(AppEvent::ApiStatusChanged {
            status: ApiStatus::Checking,
            models_ready: false,
        });
        self.worker.check_health();
    }

    pub fn on_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::CheckHealth => self.check_health(),
            UiEvent::Generate {
                person,
                style_guide,
                request,
            } => self.start_generation(person, style_guide, request),
            UiEvent::OpenArtifact(path) => self.open_artifact(&path),
            UiEvent::ResetForm => self.reset_form(),
        }
    }

    fn start_generation(
        &mut self,
        person: UploadedImage,
        style_guide: UploadedImage,
        request: GenerationRequest,
    ) {
        if let Some(reason) = submit_rejection(self.generating, self.api_status) {
            warn!("submit refused: {reason}");
            // The form locked itself on click. An in-flight request will
            // deliver the terminal event that releases it; an offline
            // refusal has to deliver its own.
            if !self.generating {
                self.push_app_event(AppEvent::GenerationFailed(reason.to_string()));
            }
            return;
        }

        self.generating = true;
        self.progress = Some(ProgressSim::start(request.mode.steps()));
        self.push_app_event(AppEvent::GenerationStarted(request.mode));

        if let Err(e) = self.worker.generate(person, style_guide, request) {
            self.fail_generation(e);
        }
    }

    fn fail_generation(&mut self, message: String) {
        if let Some(progress) = self.progress.as_mut() {
            progress.halt();
        }
        self.generating = false;
        self.push_app_event(AppEvent::GenerationFailed(message));
    }

    fn reset_form(&mut self) {
        // No cancellation of an in-flight request is offered
        if self.generating {
            return;
        }
        self.progress = None;
        self.push_app_event(AppEvent::FormCleared);
    }

    fn open_artifact(&self, path: &str) {
        match tf_core::api::download_url(&self.api_base, path) {
            Ok(url) => {
                info!("opening {url}");
                if let Err(e) = open::that(url.as_str()) {
                    error!("could not open browser for {url}: {e}");
                }
            }
            Err(e) => error!("bad artifact path {path}: {e}"),
        }
    }

    pub fn on_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::HealthOk(report) => {
                self.api_status = ApiStatus::Healthy;
                self.push_app_event(AppEvent::ApiStatusChanged {
                    status: ApiStatus::Healthy,
                    models_ready: report.models_ready(),
                });
            }
            ApiEvent::HealthFailed(message) => {
                warn!("service unreachable: {message}");
                self.api_status = ApiStatus::Offline;
                self.push_app_event(AppEvent::ApiStatusChanged {
                    status: ApiStatus::Offline,
                    models_ready: false,
                });
            }
            ApiEvent::Generated(result) => {
                // Response arrived: stop the simulated timer and jump to 100%
                if let Some(progress) = self.progress.as_mut() {
                    progress.complete();
                    let step = progress.current_step();
                    self.push_app_event(AppEvent::GenerationProgress { step });
                }
                self.generating = false;

                if let Err(e) = self.worker.fetch_preview(result.toy_image.clone()) {
                    warn!("{e}");
                }
                self.push_app_event(AppEvent::GenerationFinished(result));
            }
            ApiEvent::GenerationFailed(message) => self.fail_generation(message),
            ApiEvent::PreviewLoaded(bytes) => {
                self.push_app_event(AppEvent::PreviewLoaded(bytes));
            }
            ApiEvent::PreviewFailed(message) => {
                warn!("toy image preview unavailable: {message}");
                self.push_app_event(AppEvent::PreviewFailed(message));
            }
        }
    }

    /// Advance the simulated progress timer; called from the event loop
    /// while a request is outstanding.
    pub fn tick_progress(&mut self) {
        let Some(progress) = self.progress.as_mut() else {
            return;
        };
        if progress.tick(Instant::now()) {
            let step = progress.current_step();
            self.push_app_event(AppEvent::GenerationProgress { step });
        }
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        let output = match self.gfx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gfx.resize(size);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Background clear
        let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.08,
                        g: 0.08,
                        b: 0.1,
                        a: 1.0,
                    }),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            ..Default::default()
        });

        // UI
        let full_output = self.ui.draw(&self.window);

        let platform_output = full_output.platform_output.clone();
        self.ui
            .egui_state
            .handle_platform_output(&self.window, platform_output);

        let shapes = full_output.shapes.clone();
        let pixels_per_point = full_output.pixels_per_point;
        let paint_jobs = self.ui.egui_ctx.tessellate(shapes, pixels_per_point);

        let screen_desc = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.ui
                .egui_renderer
                .update_texture(&self.gfx.device, &self.gfx.queue, *id, delta);
        }

        self.ui.egui_renderer.update_buffers(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &paint_jobs,
            &screen_desc,
        );

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            self.ui
                .egui_renderer
                .render(&mut rpass.forget_lifetime(), &paint_jobs, &screen_desc);
        }

        for id in &full_output.textures_delta.free {
            self.ui.egui_renderer.free_texture(id);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_refused_while_request_in_flight() {
        assert!(submit_rejection(true, ApiStatus::Healthy).is_some());
    }

    #[test]
    fn test_submit_refused_when_service_offline() {
        let reason = submit_rejection(false, ApiStatus::Offline).unwrap();
        assert!(reason.contains("unreachable"));
    }

    #[test]
    fn test_submit_allowed_when_idle() {
        assert!(submit_rejection(false, ApiStatus::Healthy).is_none());
        assert!(submit_rejection(false, ApiStatus::Checking).is_none());
    }
}
