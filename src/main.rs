
mod app;
mod camera;
mod config;
mod input;
mod render;
mod tiles;

use std::sync::Arc;
use winit::{dpi::PhysicalSize, event_loop::EventLoop, window::WindowBuilder};

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();

    let window = Arc::new(
        WindowBuilder::new()
            .with_title("tilefield")
            .with_inner_size(PhysicalSize::new(1280, 720))
            .build(&event_loop)
            .unwrap(),
    );

    pollster::block_on(app::run(event_loop, window));
}
