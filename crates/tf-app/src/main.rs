mod api;
mod app;
mod config;
mod error;
mod events;
mod gfx;
mod state;
mod ui;
mod worker;

use std::error::Error;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::events::TfEvent;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut event_loop: EventLoop<TfEvent> = EventLoop::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(&mut event_loop);
    event_loop.run_app(&mut app)?;

    Ok(())
}
