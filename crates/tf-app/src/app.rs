use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::window::{WindowAttributes, WindowId};

use crate::events::TfEvent;
use crate::state::AppState;

pub struct App {
    event_loop_proxy: Arc<EventLoopProxy<TfEvent>>,
    state: Option<AppState>,
    needs_redraw: bool,
}

impl App {
    pub fn new(event_loop: &mut EventLoop<TfEvent>) -> Self {
        let event_loop_proxy = Arc::new(event_loop.create_proxy());

        Self {
            event_loop_proxy,
            state: None,
            needs_redraw: false,
        }
    }
}

impl ApplicationHandler<TfEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = WindowAttributes::default()
            .with_title("Toy Forge")
            .with_inner_size(winit::dpi::LogicalSize::new(1200.0, 840.0));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("failed to create window"),
        );

        let state = pollster::block_on(AppState::new(window, self.event_loop_proxy.clone()))
            .expect("failed to initialize application");
        self.state = Some(state);
        self.needs_redraw = true;
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: TfEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            TfEvent::Ui(e) => state.on_ui_event(e),
            TfEvent::App(e) => state.ui.on_app_event(&e),
            TfEvent::Api(e) => state.on_api_event(e),
        }

        self.needs_redraw = true;
        state.window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if state.window.id() != window_id {
            return;
        }

        // egui consumes everything this app cares about
        let response = state.ui.egui_state.on_window_event(&state.window, &event);

        if response.repaint {
            self.needs_redraw = true;
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                state.resize(physical_size);
                self.needs_redraw = true;
            }
            WindowEvent::RedrawRequested => {
                let _ = state.render();
                self.needs_redraw = false;
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };

        // Keep repainting while a request is outstanding so the simulated
        // progress and the spinner stay alive
        if state.is_generating() {
            state.tick_progress();
            self.needs_redraw = true;
        }

        if self.needs_redraw {
            state.window.request_redraw();
        }
    }
}
