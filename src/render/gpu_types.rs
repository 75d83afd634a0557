use bytemuck::{Pod, Zeroable};

use crate::tiles::Tile;

/// Per-instance record consumed by the tile pipeline (32-byte stride).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug)]
pub struct TileInstance {
    pub pos: [f32; 2],
    pub size: f32,
    pub _pad0: f32,
    pub color: [f32; 4],
}

impl TileInstance {
    #[inline]
    pub fn from_tile(t: &Tile) -> Self {
        Self {
            pos: [t.x, t.y],
            size: t.side,
            _pad0: 0.0,
            color: t.color,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraGpu {
    pub view_proj: [[f32; 4]; 4],
}
