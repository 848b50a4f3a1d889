use glam::Vec3;
use wgpu::util::DeviceExt;
use wgpu::Device;

use immersion_core::layout::{SurfaceLayout, CORNER_UVS, QUAD_INDICES};

use crate::context::{
    clear_pass, texture_bind_group, UniformArena, Vertex, COLOR_FORMAT, DEPTH_FORMAT,
};
use crate::pipelines::Pipelines;

// ---------------------------------------------------------------------------
// RenderSurface — one render-to-texture screen quad
// ---------------------------------------------------------------------------

/// A screen quad plus the offscreen target it displays.
///
/// Owns the quad geometry, a color+depth target pair sized by the layout,
/// and the bind group for sampling the rendered color texture. The caller
/// encodes the scene pass (via [`RenderSurface::begin_scene_pass`]) before
/// the composite draw that samples it; both land in the same command
/// encoder, so submission order enforces the dependency.
pub struct RenderSurface {
    pub layout: SurfaceLayout,
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    texture_bg: wgpu::BindGroup,
}

impl RenderSurface {
    pub fn new(
        device: &Device,
        layout: SurfaceLayout,
        texture_bgl: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let corners = layout.corners();
        let vertices: Vec<Vertex> = corners
            .iter()
            .zip(CORNER_UVS.iter())
            .map(|(p, uv)| Vertex {
                position: p.to_array(),
                uv: *uv,
            })
            .collect();

        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("surface_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("surface_indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let res = layout.resolution();
        let extent = wgpu::Extent3d {
            width: res,
            height: res,
            depth_or_array_layers: 1,
        };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("surface_color"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("surface_depth"),
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
        log::debug!("screen target {res}×{res} for {layout:?}");

        let texture_bg =
            texture_bind_group(device, texture_bgl, &color_view, sampler, "surface_bg");

        Self {
            layout,
            vertex_buf,
            index_buf,
            color_view,
            depth_view,
            texture_bg,
        }
    }

    /// Begin this surface's offscreen scene pass, clearing color and depth.
    pub fn begin_scene_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'e> {
        clear_pass(encoder, "surface_scene_pass", &self.color_view, &self.depth_view)
    }

    /// Draw this surface as a textured quad in the composite pass. A faulted
    /// surface renders with the blank pipeline instead of its texture.
    pub fn draw_composite(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        pipelines: &Pipelines,
        arena: &UniformArena,
        slot: u32,
        is_faulted: bool,
    ) {
        if is_faulted {
            rpass.set_pipeline(&pipelines.blank);
        } else {
            rpass.set_pipeline(&pipelines.textured);
            rpass.set_bind_group(1, &self.texture_bg, &[]);
        }
        rpass.set_bind_group(0, &arena.bind_group, &[UniformArena::offset(slot)]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    /// Local-space position of one quad corner (debug-line anchor point).
    pub fn corner(&self, corner: usize) -> Vec3 {
        self.layout.vertex(corner)
    }
}
