// src/camera.rs
//
// 2D orthographic camera. Input mutates the pan target; the rendered
// position chases it once per frame. The projection matrix is rebuilt per
// frame and must stay finite: a degenerate update keeps the last good
// matrix instead of propagating NaNs into the uniform.

use glam::{Mat4, Vec2};

use crate::config;
use crate::tiles::selector::Viewport;

pub struct Camera {
    pos: Vec2,
    target: Vec2,
    zoom: f32,
    aspect: f32,
    matrix: Mat4,
    last_good: Mat4,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        let mut cam = Self {
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            matrix: Mat4::IDENTITY,
            last_good: Mat4::IDENTITY,
        };
        cam.update_matrix();
        cam
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Pan by screen-pixel deltas. Screen-down is world-up; pan speed is
    /// divided by zoom so a drag covers the same fraction of the window at
    /// any zoom.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            log::warn!("rejecting non-finite pan delta ({dx}, {dy})");
            return;
        }
        let k = config::PAN_SPEED / self.zoom.max(0.1);
        self.target.x = (self.target.x - dx * k).clamp(-config::PAN_LIMIT, config::PAN_LIMIT);
        self.target.y = (self.target.y + dy * k).clamp(-config::PAN_LIMIT, config::PAN_LIMIT);
    }

    pub fn zoom_by(&mut self, delta: f32) {
        if !delta.is_finite() {
            log::warn!("rejecting non-finite zoom delta");
            return;
        }
        self.zoom = (self.zoom * (1.0 + delta * config::WHEEL_ZOOM_STEP))
            .clamp(config::ZOOM_MIN, config::ZOOM_MAX);
    }

    pub fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.target = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Per-frame step: chase the pan target, then refresh the projection.
    pub fn integrate(&mut self) {
        if self.pos.is_finite() && self.target.is_finite() {
            self.pos += (self.target - self.pos) * config::PAN_SMOOTHING;
        }
        self.update_matrix();
    }

    fn update_matrix(&mut self) {
        let m = self.compute_matrix();
        if m.is_finite() {
            self.matrix = m;
            self.last_good = m;
        } else {
            log::warn!("projection went non-finite; keeping last good matrix");
            self.matrix = self.last_good;
        }
    }

    fn compute_matrix(&self) -> Mat4 {
        let (w, h) = self.window();
        Mat4::orthographic_rh(
            self.pos.x - 0.5 * w,
            self.pos.x + 0.5 * w,
            self.pos.y - 0.5 * h,
            self.pos.y + 0.5 * h,
            -1.0,
            1.0,
        )
    }

    /// World window extent at the current zoom.
    fn window(&self) -> (f32, f32) {
        let h = config::VIEW_WORLD_HEIGHT / self.zoom;
        (h * self.aspect, h)
    }

    /// World-space rectangle visible this frame. Falls back to a fixed
    /// default while the camera state is degenerate.
    pub fn view_bounds(&self) -> Viewport {
        if !(self.pos.is_finite() && self.zoom.is_finite() && self.zoom > 0.0) {
            return Viewport { left: -500.0, right: 500.0, top: 500.0, bottom: -500.0 };
        }
        let (w, h) = self.window();
        Viewport {
            left: self.pos.x - 0.5 * w,
            right: self.pos.x + 0.5 * w,
            top: self.pos.y + 0.5 * h,
            bottom: self.pos.y - 0.5 * h,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    fn target(&self) -> Vec2 {
        self.target
    }

    fn set_position(&mut self, p: Vec2) {
        self.pos = p;
        self.target = p;
    }
}
