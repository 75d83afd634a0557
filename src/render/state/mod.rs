// src/render/state/mod.rs
// -----------------------
mod buffers;
mod pipelines;

use bytemuck::cast_slice;

use crate::config;
use crate::render::gpu_types::{CameraGpu, TileInstance};
use crate::render::shaders;

use buffers::{create_persistent_buffers, Buffers};
use pipelines::{create_pipelines, Pipelines};

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,

    pipelines: Pipelines,
    buffers: Buffers,
    camera_bind: wgpu::BindGroup,
}

impl Renderer {
    pub async fn new(adapter: &wgpu::Adapter, surface_format: wgpu::TextureFormat) -> Self {
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .unwrap();

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tiles"),
            source: wgpu::ShaderSource::Wgsl(shaders::TILES_WGSL.into()),
        });

        let buffers = create_persistent_buffers(&device);
        let pipelines = create_pipelines(&device, &module, surface_format);

        let camera_bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bg"),
            layout: &pipelines.camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers.camera.as_entire_binding(),
            }],
        });

        Self {
            device,
            queue,
            pipelines,
            buffers,
            camera_bind,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn write_camera(&self, cam: &CameraGpu) {
        self.queue
            .write_buffer(&self.buffers.camera, 0, bytemuck::bytes_of(cam));
    }

    /// Upload this frame's instances; returns how many will actually draw.
    pub fn write_instances(&self, instances: &[TileInstance]) -> usize {
        let n = instances.len().min(self.buffers.instance_capacity);
        if n < instances.len() {
            log::warn!(
                "instance overflow: {} visible, drawing {}",
                instances.len(),
                n
            );
        }
        if n > 0 {
            self.queue
                .write_buffer(&self.buffers.instances, 0, cast_slice(&instances[..n]));
        }
        n
    }

    /// One render pass over the frame. The instance range is split so a
    /// single draw call never exceeds INSTANCE_BATCH instances.
    pub fn encode_draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        count: usize,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tiles_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.02,
                        g: 0.02,
                        b: 0.03,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_pipeline(&self.pipelines.tiles);
        rpass.set_bind_group(0, &self.camera_bind, &[]);
        rpass.set_vertex_buffer(0, self.buffers.instances.slice(..));

        let mut start = 0usize;
        while start < count {
            let end = (start + config::INSTANCE_BATCH).min(count);
            rpass.draw(0..4, start as u32..end as u32);
            start = end;
        }
    }
}
