// src/render/state/buffers.rs
//
// Persistent GPU buffers and capacities. The renderer code can then focus
// on pipeline setup and per-frame encoding.
//
// - UNIFORM buffer: camera projection, written each frame.
// - VERTEX buffer: instance records for the whole frame, written once per
//   frame and drawn in sub-ranges.

use crate::config;
use crate::render::gpu_types::{CameraGpu, TileInstance};

pub struct Buffers {
    /// Camera uniform (view-projection matrix). Written each frame.
    pub camera: wgpu::Buffer,

    /// Instance records for one frame of visible tiles.
    pub instances: wgpu::Buffer,

    /// Number of TileInstance elements `instances` can hold.
    pub instance_capacity: usize,
}

fn make_uniform_buffer<T: Sized>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub fn create_persistent_buffers(device: &wgpu::Device) -> Buffers {
    let camera = make_uniform_buffer::<CameraGpu>(device, "camera_buf");

    let instance_capacity = config::INSTANCE_CAPACITY;
    let instances = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tile_instances"),
        size: (instance_capacity * std::mem::size_of::<TileInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    Buffers {
        camera,
        instances,
        instance_capacity,
    }
}
