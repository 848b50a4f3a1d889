use wgpu::Device;

use immersion_core::Eye;

use crate::context::{clear_pass, texture_bind_group, COLOR_FORMAT, DEPTH_FORMAT};

// ---------------------------------------------------------------------------
// EyeBuffer — shared stereo composite target
// ---------------------------------------------------------------------------

/// The composite target both eyes render into: one color+depth pair twice
/// the per-eye width, split into left/right viewport halves. The color half
/// pair is also sampled by the mirror pass.
pub struct EyeBuffer {
    eye_width: u32,
    eye_height: u32,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    pub texture_bg: wgpu::BindGroup,
}

impl EyeBuffer {
    pub fn new(
        device: &Device,
        eye_width: u32,
        eye_height: u32,
        texture_bgl: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: eye_width * 2,
            height: eye_height,
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("eye_color"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("eye_depth"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let color_view = color.create_view(&Default::default());
        let depth_view = depth.create_view(&Default::default());
        let texture_bg = texture_bind_group(device, texture_bgl, &color_view, sampler, "eye_bg");

        Self {
            eye_width,
            eye_height,
            color_view,
            depth_view,
            texture_bg,
        }
    }

    /// Begin the composite pass over the whole stereo target, clearing both
    /// halves. Callers restrict to one half with [`EyeBuffer::set_viewport`].
    pub fn begin_pass<'e>(&self, encoder: &'e mut wgpu::CommandEncoder) -> wgpu::RenderPass<'e> {
        clear_pass(encoder, "composite_pass", &self.color_view, &self.depth_view)
    }

    /// Restrict subsequent draws to one eye's half of the target.
    pub fn set_viewport(&self, rpass: &mut wgpu::RenderPass<'_>, eye: Eye) {
        let x = eye.index() as f32 * self.eye_width as f32;
        rpass.set_viewport(
            x,
            0.0,
            self.eye_width as f32,
            self.eye_height as f32,
            0.0,
            1.0,
        );
    }

    pub fn aspect(&self) -> f32 {
        self.eye_width as f32 / self.eye_height as f32
    }
}

// ---------------------------------------------------------------------------
// MirrorPass — blit the stereo pair to the desktop window
// ---------------------------------------------------------------------------

/// Stretches the composited stereo pair over the desktop window surface.
/// No vertex buffers and no depth: the shader generates a fullscreen quad
/// from vertex indices.
pub struct MirrorPass {
    pipeline: wgpu::RenderPipeline,
}

impl MirrorPass {
    pub fn new(
        device: &Device,
        texture_bgl: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mirror_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mirror.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mirror_pl"),
            bind_group_layouts: &[texture_bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mirror_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self { pipeline }
    }

    pub fn blit(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        eye_buffer: &EyeBuffer,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("mirror_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &eye_buffer.texture_bg, &[]);
        rpass.draw(0..6, 0..1);
    }
}
