// src/render/state/pipelines.rs
//
// Pipeline creation, isolated so per-frame encoding isn't buried under
// wgpu setup boilerplate.

use crate::render::gpu_types::TileInstance;

pub struct Pipelines {
    /// Layout for group(0): the camera uniform.
    pub camera_bgl: wgpu::BindGroupLayout,

    /// Render pipeline drawing instanced unit-quad tiles.
    pub tiles: wgpu::RenderPipeline,
}

pub fn create_pipelines(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
) -> Pipelines {
    let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("camera_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("tiles_pl"),
        bind_group_layouts: &[&camera_bgl],
        push_constant_ranges: &[],
    });

    // Per-instance vertex buffer; the quad corners are synthesized from
    // vertex_index in the shader, so there is no per-vertex buffer at all.
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TileInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 8,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 2,
            },
        ],
    };

    let tiles = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("tiles_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module,
            entry_point: "vs_main",
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    });

    Pipelines { camera_bgl, tiles }
}
