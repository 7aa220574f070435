mod panels;

pub use panels::Panels;

use std::sync::Arc;

use winit::event_loop::EventLoopProxy;
use winit::window::Window;

use crate::events::{AppEvent, TfEvent, UiEvent};
use crate::gfx::GfxState;

/// Queues panel actions onto the winit event loop.
pub struct UiEventSender {
    event_loop_proxy: Arc<EventLoopProxy<TfEvent>>,
}

impl UiEventSender {
    pub fn new(event_loop_proxy: Arc<EventLoopProxy<TfEvent>>) -> Self {
        Self { event_loop_proxy }
    }

    pub fn instant(&mut self, event: UiEvent) {
        let _ = self.event_loop_proxy.send_event(TfEvent::Ui(event));
    }
}

pub struct UiState {
    pub(crate) egui_state: egui_winit::State,
    pub(crate) egui_ctx: egui::Context,
    pub(crate) egui_renderer: egui_wgpu::Renderer,

    panels: Panels,
    sender: UiEventSender,
}

impl UiState {
    pub fn new(
        gfx: &GfxState,
        window: Arc<Window>,
        event_loop_proxy: Arc<EventLoopProxy<TfEvent>>,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gfx.device,
            gfx.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            panels: Panels::default(),
            sender: UiEventSender::new(event_loop_proxy),
        }
    }

    pub fn draw(&mut self, window: &Window) -> egui::FullOutput {
        let raw_input = self.egui_state.take_egui_input(window);

        self.egui_ctx.run(raw_input, |ctx| {
            self.panels.draw(ctx, &mut self.sender);
        })
    }

    /// Broadcast a state change to every panel.
    pub fn on_app_event(&mut self, event: &AppEvent) {
        self.panels.on_app_event(event);
    }
}
