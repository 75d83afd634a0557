// src/app/mod.rs
//
// High-level application glue:
// - Owns the window + wgpu surface configuration.
// - Owns input + camera state and the visible-tile selector.
// - Receives the tile world from the background builder.
// - Delegates all GPU resource ownership and rendering work to `Renderer`.
//
// The loop is driven by winit events under `ControlFlow::Poll`, so we
// continually render (and handle input) as fast as the system allows.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use glam::Vec2;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

use crate::{
    camera::Camera,
    input::InputState,
    render::{CameraGpu, Renderer},
    tiles::{builder, generator::GridParams, selector::Selector, TileWorld},
};

/// Entrypoint called by main: builds the `App` (async, because wgpu
/// adapter/device acquisition is async) and runs the winit event loop.
pub async fn run(event_loop: EventLoop<()>, window: Arc<Window>) {
    let mut app = App::new(window).await;

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);
            app.handle_event(event, elwt);
        })
        .unwrap();
}

/// Application state living for the duration of the event loop.
///
/// Ownership split: `App` owns the presentation surface and surface config;
/// `Renderer` owns the wgpu `Device`/`Queue` and all GPU resources.
pub struct App {
    /// Shared window handle (kept alive for the 'static surface).
    _window: Arc<Window>,

    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,
    config: wgpu::SurfaceConfiguration,

    renderer: Renderer,

    /// Filled in once the background builder finishes.
    world: Option<TileWorld>,
    world_rx: Receiver<TileWorld>,

    input: InputState,
    camera: Camera,
    selector: Selector,
}

impl App {
    pub async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats[0];

        let config_sc = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let renderer = Renderer::new(&adapter, surface_format).await;
        surface.configure(renderer.device(), &config_sc);

        // Start the one-time world build off-thread; frames render a clear
        // background until it lands.
        let world_rx = builder::spawn_build(GridParams::default());

        let camera = Camera::new(config_sc.width as f32 / config_sc.height as f32);

        Self {
            _window: window,
            _instance: instance,
            surface,
            _adapter: adapter,
            config: config_sc,
            renderer,
            world: None,
            world_rx,
            input: InputState::default(),
            camera,
            selector: Selector::new(),
        }
    }

    pub fn handle_event(
        &mut self,
        event: Event<()>,
        elwt: &winit::event_loop::EventLoopWindowTarget<()>,
    ) {
        match event {
            Event::DeviceEvent { event, .. } => {
                self.input.on_device_event(&event);
            }

            Event::WindowEvent { event, .. } => {
                let _ = self.input.on_window_event(&event);

                match event {
                    WindowEvent::CloseRequested => elwt.exit(),

                    WindowEvent::Resized(new_size) => {
                        self.config.width = new_size.width.max(1);
                        self.config.height = new_size.height.max(1);
                        self.surface.configure(self.renderer.device(), &self.config);
                        // renderer resize feeds back into the projection
                        self.camera.set_aspect(self.config.width, self.config.height);
                    }

                    _ => {}
                }
            }

            // With Poll control flow this is effectively the per-frame tick.
            Event::AboutToWait => self.frame(elwt),

            _ => {}
        }
    }

    /// Render/update one frame: drain input into the camera, snapshot the
    /// view state, select visible tiles, submit instanced batches.
    fn frame(&mut self, elwt: &winit::event_loop::EventLoopWindowTarget<()>) {
        if self.input.take_exit() {
            elwt.exit();
            return;
        }

        // 1) finish the startup build if it just completed
        if self.world.is_none() {
            if let Ok(world) = self.world_rx.try_recv() {
                self.world = Some(world);
            }
        }

        // 2) input -> camera
        if self.input.take_reset() {
            self.camera.reset();
        }
        let pan = self.input.take_pan();
        if pan != Vec2::ZERO {
            self.camera.pan(pan.x, pan.y);
        }
        let zoom_delta = self.input.take_zoom();
        if zoom_delta != 0.0 {
            self.camera.zoom_by(zoom_delta);
        }
        self.camera.integrate();

        // 3) snapshot the view state for this frame, then select.
        // The snapshot means a mid-frame input event cannot tear the
        // viewport/projection pair.
        let view = self.camera.view_bounds();
        let zoom = self.camera.zoom();
        let matrix = self.camera.matrix();

        let instance_count = match &self.world {
            Some(world) => {
                let instances = self.selector.select(world, &view, zoom);
                self.renderer.write_instances(instances)
            }
            None => 0,
        };

        self.renderer.write_camera(&CameraGpu {
            view_proj: matrix.to_cols_array_2d(),
        });

        // 4) acquire frame + encode + present
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,

            // Surface invalidated (resize, display change): reconfigure and
            // skip; the next frame re-runs a full selection pass.
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost; reconfiguring");
                self.surface.configure(self.renderer.device(), &self.config);
                return;
            }

            Err(wgpu::SurfaceError::Timeout) => return,

            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory; exiting");
                elwt.exit();
                return;
            }
        };

        let frame_view = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .renderer
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("encoder") });

        self.renderer.encode_draw(&mut encoder, &frame_view, instance_count);

        self.renderer.queue().submit(Some(encoder.finish()));
        frame.present();
    }
}
