// src/input.rs
//
// Event aggregation. Everything here only accumulates; the app drains the
// accumulated pan/zoom/reset once per frame via the take_* methods.

use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use glam::Vec2;

use crate::config;

#[derive(Default, Clone, Copy)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyState {
    pub fn set(&mut self, code: KeyCode, down: bool) {
        match code {
            KeyCode::ArrowLeft => self.left = down,
            KeyCode::ArrowRight => self.right = down,
            KeyCode::ArrowUp => self.up = down,
            KeyCode::ArrowDown => self.down = down,
            _ => {}
        }
    }
}

#[derive(Default)]
pub struct InputState {
    pub keys: KeyState,
    dragging: bool,
    pan_dx: f32,
    pan_dy: f32,
    zoom_delta: f32,
    reset: bool,
    exit: bool,
}

impl InputState {
    pub fn on_device_event(&mut self, event: &DeviceEvent) {
        if !self.dragging {
            return;
        }
        if let DeviceEvent::MouseMotion { delta } = event {
            self.pan_dx += delta.0 as f32;
            self.pan_dy += delta.1 as f32;
        }
    }

    /// Returns true if the event is fully handled/consumed.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.dragging = *state == ElementState::Pressed;
                true
            }

            WindowEvent::Focused(false) => {
                self.dragging = false;
                false
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.zoom_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                true
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    ..
                } = event
                {
                    let down = *state == ElementState::Pressed;
                    self.keys.set(*code, down);

                    if down && *code == KeyCode::KeyR {
                        self.reset = true;
                        return true;
                    }
                    if down && *code == KeyCode::Escape {
                        self.exit = true;
                        return true;
                    }
                }
                false
            }

            _ => false,
        }
    }

    /// Pixel pan accumulated since last frame: drag deltas plus held arrow
    /// keys. Arrows move the camera, which is the opposite drag direction.
    pub fn take_pan(&mut self) -> Vec2 {
        let mut d = Vec2::new(self.pan_dx, self.pan_dy);
        self.pan_dx = 0.0;
        self.pan_dy = 0.0;

        if self.keys.left {
            d.x += config::KEY_PAN_PX;
        }
        if self.keys.right {
            d.x -= config::KEY_PAN_PX;
        }
        if self.keys.up {
            d.y += config::KEY_PAN_PX;
        }
        if self.keys.down {
            d.y -= config::KEY_PAN_PX;
        }
        d
    }

    pub fn take_zoom(&mut self) -> f32 {
        std::mem::take(&mut self.zoom_delta)
    }

    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset)
    }

    pub fn take_exit(&mut self) -> bool {
        std::mem::take(&mut self.exit)
    }
}
