use glam::Vec3;
use wgpu::{Device, Queue};

use immersion_core::layout::DEBUG_ANCHORS;

use crate::context::{LineVertex, UniformArena};
use crate::pipelines::Pipelines;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const RED: [f32; 3] = [1.0, 0.0, 0.0];

/// Two lines per anchor, one per tracked target.
pub const LINE_COUNT: usize = DEBUG_ANCHORS.len() * 2;
const VERTEX_COUNT: usize = LINE_COUNT * 2;

/// Wireframe overlay connecting fixed screen corners to the two tracked
/// positions. The left set is white, the right set red, so each bundle of
/// lines identifies its target at a glance. Endpoints are rewritten each
/// frame while the overlay is held visible.
pub struct DebugLines {
    vertex_buf: wgpu::Buffer,
}

impl DebugLines {
    pub fn new(device: &Device) -> Self {
        Self {
            vertex_buf: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("debug_lines"),
                size: (VERTEX_COUNT * std::mem::size_of::<LineVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        }
    }

    /// Rewrite all line endpoints for this frame's tracked positions.
    pub fn update(&self, queue: &Queue, left_target: Vec3, right_target: Vec3) {
        let vertices = line_vertices(left_target, right_target);
        queue.write_buffer(&self.vertex_buf, 0, bytemuck::cast_slice(&vertices));
    }

    pub fn draw(
        &self,
        rpass: &mut wgpu::RenderPass<'_>,
        pipelines: &Pipelines,
        arena: &UniformArena,
        slot: u32,
    ) {
        rpass.set_pipeline(&pipelines.line);
        rpass.set_bind_group(0, &arena.bind_group, &[UniformArena::offset(slot)]);
        rpass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        rpass.draw(0..VERTEX_COUNT as u32, 0..1);
    }
}

fn line_vertices(left_target: Vec3, right_target: Vec3) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(VERTEX_COUNT);
    for (layout, corner) in DEBUG_ANCHORS {
        let anchor = layout.vertex(corner).to_array();
        vertices.push(LineVertex {
            position: anchor,
            color: WHITE,
        });
        vertices.push(LineVertex {
            position: left_target.to_array(),
            color: WHITE,
        });
        vertices.push(LineVertex {
            position: anchor,
            color: RED,
        });
        vertices.push(LineVertex {
            position: right_target.to_array(),
            color: RED,
        });
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_lines_total() {
        assert_eq!(LINE_COUNT, 14);
        let v = line_vertices(Vec3::ZERO, Vec3::ONE);
        assert_eq!(v.len(), 28);
    }

    #[test]
    fn left_set_is_white_and_right_set_is_red() {
        let v = line_vertices(Vec3::new(0.1, 0.2, 0.3), Vec3::new(-0.1, -0.2, -0.3));
        for pair in v.chunks(4) {
            assert_eq!(pair[0].color, WHITE);
            assert_eq!(pair[1].color, WHITE);
            assert_eq!(pair[2].color, RED);
            assert_eq!(pair[3].color, RED);
        }
    }

    #[test]
    fn moving_endpoints_track_the_targets() {
        let left = Vec3::new(1.0, 2.0, 3.0);
        let right = Vec3::new(4.0, 5.0, 6.0);
        let v = line_vertices(left, right);
        for pair in v.chunks(4) {
            assert_eq!(pair[1].position, left.to_array());
            assert_eq!(pair[3].position, right.to_array());
        }
    }

    #[test]
    fn each_pair_shares_its_anchor() {
        let v = line_vertices(Vec3::ZERO, Vec3::ZERO);
        for pair in v.chunks(4) {
            assert_eq!(pair[0].position, pair[2].position);
        }
    }
}
