use wgpu::util::DeviceExt;
use wgpu::{Device, Queue};

use immersion_core::layout::{CORNER_UVS, QUAD_INDICES};
use immersion_core::Eye;

use crate::context::{texture_bind_group, UniformArena, Vertex, COLOR_FORMAT};
use crate::pipelines::Pipelines;

// ---------------------------------------------------------------------------
// SceneContent — the hardcoded scene: little cube, two side panels, backdrop
// ---------------------------------------------------------------------------

/// The shared scene content rendered into every offscreen surface: a small
/// textured cube plus one large side panel per eye. The backdrop is only
/// drawn in the composite pass, behind the screen quads.
pub struct SceneContent {
    cube: Mesh,
    side_left: Mesh,
    side_right: Mesh,
    backdrop: Mesh,
}

impl SceneContent {
    pub fn new(
        device: &Device,
        queue: &Queue,
        texture_bgl: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        // Distinct checker tints so the stereo pair and the cube are easy to
        // tell apart in the mirror window.
        let cube_tex = checker_texture(device, queue, [230, 140, 30, 255], [245, 245, 245, 255]);
        let left_tex = checker_texture(device, queue, [60, 90, 200, 255], [235, 235, 245, 255]);
        let right_tex = checker_texture(device, queue, [200, 60, 70, 255], [245, 235, 235, 255]);
        let back_tex = checker_texture(device, queue, [90, 90, 90, 255], [170, 170, 170, 255]);

        Self {
            cube: Mesh::new(
                device,
                &cube_geometry(),
                texture_bind_group(device, texture_bgl, &view(&cube_tex), sampler, "cube_bg"),
            ),
            side_left: Mesh::new(
                device,
                &quad_geometry([
                    [-8.0, -8.0, 8.0],
                    [-8.0, -8.0, -8.0],
                    [-8.0, 8.0, 8.0],
                    [-8.0, 8.0, -8.0],
                ]),
                texture_bind_group(device, texture_bgl, &view(&left_tex), sampler, "side_l_bg"),
            ),
            side_right: Mesh::new(
                device,
                &quad_geometry([
                    [8.0, -8.0, -8.0],
                    [8.0, -8.0, 8.0],
                    [8.0, 8.0, -8.0],
                    [8.0, 8.0, 8.0],
                ]),
                texture_bind_group(device, texture_bgl, &view(&right_tex), sampler, "side_r_bg"),
            ),
            backdrop: Mesh::new(
                device,
                &quad_geometry([
                    [-12.0, -12.0, -12.0],
                    [12.0, -12.0, -12.0],
                    [-12.0, 12.0, -12.0],
                    [12.0, 12.0, -12.0],
                ]),
                texture_bind_group(device, texture_bgl, &view(&back_tex), sampler, "backdrop_bg"),
            ),
        }
    }

    /// Scene content for one offscreen surface pass: that eye's side panel
    /// plus the little cube. Slots carry `projection * view` for the panel
    /// and `projection * view * model` for the cube.
    pub fn draw_eye_scene(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        pipelines: &Pipelines,
        arena: &UniformArena,
        eye: Eye,
        side_slot: u32,
        cube_slot: u32,
    ) {
        rpass.set_pipeline(&pipelines.textured);
        let side = match eye {
            Eye::Left => &self.side_left,
            Eye::Right => &self.side_right,
        };
        side.draw(rpass, arena, side_slot);
        self.cube.draw(rpass, arena, cube_slot);
    }

    /// Background geometry drawn at the end of the composite pass.
    pub fn draw_backdrop(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        pipelines: &Pipelines,
        arena: &UniformArena,
        slot: u32,
    ) {
        rpass.set_pipeline(&pipelines.textured);
        self.backdrop.draw(rpass, arena, slot);
    }
}

// ---------------------------------------------------------------------------
// Mesh
// ---------------------------------------------------------------------------

struct Mesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    texture_bg: wgpu::BindGroup,
}

impl Mesh {
    fn new(device: &Device, geo: &(Vec<Vertex>, Vec<u16>), texture_bg: wgpu::BindGroup) -> Self {
        let (vertices, indices) = geo;
        Self {
            vertex_buf: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buf: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_indices"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: indices.len() as u32,
            texture_bg,
        }
    }

    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, arena: &UniformArena, slot: u32) {
        rpass.set_bind_group(0, &arena.bind_group, &[UniformArena::offset(slot)]);
        rpass.set_bind_group(1, &self.texture_bg, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.set_index_buffer(self.index_buf.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

// ---------------------------------------------------------------------------
// Geometry helpers
// ---------------------------------------------------------------------------

/// One quad from four corners in the standard order (bottom-left,
/// bottom-right, top-left, top-right).
fn quad_geometry(corners: [[f32; 3]; 4]) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    push_quad(&mut vertices, &mut indices, corners);
    (vertices, indices)
}

/// Unit cube centered at the origin, one quad per face.
fn cube_geometry() -> (Vec<Vertex>, Vec<u16>) {
    let h = 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    // front (-z) and back (+z)
    push_quad(&mut vertices, &mut indices, [[-h, -h, -h], [h, -h, -h], [-h, h, -h], [h, h, -h]]);
    push_quad(&mut vertices, &mut indices, [[h, -h, h], [-h, -h, h], [h, h, h], [-h, h, h]]);
    // left (-x) and right (+x)
    push_quad(&mut vertices, &mut indices, [[-h, -h, h], [-h, -h, -h], [-h, h, h], [-h, h, -h]]);
    push_quad(&mut vertices, &mut indices, [[h, -h, -h], [h, -h, h], [h, h, -h], [h, h, h]]);
    // bottom (-y) and top (+y)
    push_quad(&mut vertices, &mut indices, [[-h, -h, h], [h, -h, h], [-h, -h, -h], [h, -h, -h]]);
    push_quad(&mut vertices, &mut indices, [[-h, h, -h], [h, h, -h], [-h, h, h], [h, h, h]]);
    (vertices, indices)
}

fn push_quad(vertices: &mut Vec<Vertex>, indices: &mut Vec<u16>, corners: [[f32; 3]; 4]) {
    let base = vertices.len() as u16;
    for (p, uv) in corners.iter().zip(CORNER_UVS.iter()) {
        vertices.push(Vertex {
            position: *p,
            uv: *uv,
        });
    }
    for i in QUAD_INDICES {
        indices.push(base + i);
    }
}

// ---------------------------------------------------------------------------
// Checker texture
// ---------------------------------------------------------------------------

const CHECKER_SIZE: u32 = 256;
const CHECKER_CELL: u32 = 32;

fn checker_texture(device: &Device, queue: &Queue, a: [u8; 4], b: [u8; 4]) -> wgpu::Texture {
    let mut pixels = Vec::with_capacity((CHECKER_SIZE * CHECKER_SIZE * 4) as usize);
    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let cell = (x / CHECKER_CELL + y / CHECKER_CELL) % 2;
            pixels.extend_from_slice(if cell == 0 { &a } else { &b });
        }
    }

    let extent = wgpu::Extent3d {
        width: CHECKER_SIZE,
        height: CHECKER_SIZE,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("checker"),
        size: extent,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: COLOR_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(CHECKER_SIZE * 4),
            rows_per_image: Some(CHECKER_SIZE),
        },
        extent,
    );
    texture
}

fn view(texture: &wgpu::Texture) -> wgpu::TextureView {
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_quad_faces() {
        let (vertices, indices) = cube_geometry();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
    }

    #[test]
    fn cube_vertices_lie_on_the_unit_half_extent() {
        let (vertices, _) = cube_geometry();
        for v in vertices {
            for c in v.position {
                assert!((c.abs() - 0.5).abs() < 1e-6, "corner {c}");
            }
        }
    }

    #[test]
    fn quad_indices_stay_in_range() {
        let (vertices, indices) = quad_geometry([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ]);
        assert_eq!(vertices.len(), 4);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }
}
