use glam::Vec3;

// ---------------------------------------------------------------------------
// SurfaceLayout — the four canonical screen-quad orientations
// ---------------------------------------------------------------------------

/// Placement of one render-to-texture screen quad in world space.
///
/// The three wall layouts enclose the viewer on the left, front and back
/// (the right side stays open); `TestCard` is a small centered quad used
/// for close-up inspection of a rendered texture. Corner order everywhere
/// is: 0 bottom-left, 1 bottom-right, 2 top-left, 3 top-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceLayout {
    TestCard,
    LeftWall,
    FrontWall,
    BackWall,
}

/// Two triangles over corners 0..=3.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

/// Texture coordinates per corner. v runs top-to-bottom, so the bottom
/// corners sample v = 1.
pub const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

impl SurfaceLayout {
    pub const ALL: [SurfaceLayout; 4] = [
        SurfaceLayout::TestCard,
        SurfaceLayout::LeftWall,
        SurfaceLayout::FrontWall,
        SurfaceLayout::BackWall,
    ];

    /// Square render-target edge for a surface built with this layout.
    pub fn resolution(self) -> u32 {
        match self {
            SurfaceLayout::TestCard => 2048,
            SurfaceLayout::LeftWall | SurfaceLayout::FrontWall | SurfaceLayout::BackWall => 1024,
        }
    }

    /// The four corner positions, in the fixed corner order.
    pub fn corners(self) -> [Vec3; 4] {
        match self {
            SurfaceLayout::TestCard => [
                Vec3::new(-1.0, -1.0, -3.0),
                Vec3::new(1.0, -1.0, -3.0),
                Vec3::new(-1.0, 1.0, -3.0),
                Vec3::new(1.0, 1.0, -3.0),
            ],
            SurfaceLayout::LeftWall => [
                Vec3::new(-3.0, -3.0, 3.0),
                Vec3::new(-3.0, -3.0, -3.0),
                Vec3::new(-3.0, 3.0, 3.0),
                Vec3::new(-3.0, 3.0, -3.0),
            ],
            SurfaceLayout::FrontWall => [
                Vec3::new(-3.0, -3.0, -3.0),
                Vec3::new(3.0, -3.0, -3.0),
                Vec3::new(-3.0, 3.0, -3.0),
                Vec3::new(3.0, 3.0, -3.0),
            ],
            SurfaceLayout::BackWall => [
                Vec3::new(3.0, -3.0, 3.0),
                Vec3::new(-3.0, -3.0, 3.0),
                Vec3::new(3.0, 3.0, 3.0),
                Vec3::new(-3.0, 3.0, 3.0),
            ],
        }
    }

    /// Local-space position of one corner, for anchoring line primitives.
    pub fn vertex(self, corner: usize) -> Vec3 {
        self.corners()[corner]
    }
}

// ---------------------------------------------------------------------------
// Debug-line anchors
// ---------------------------------------------------------------------------

/// The seven (layout, corner) pairs one eye's wireframe lines hang from:
/// all four corners of the left wall, the right edge of the front wall, and
/// the top-left corner of the back wall.
pub const DEBUG_ANCHORS: [(SurfaceLayout, usize); 7] = [
    (SurfaceLayout::LeftWall, 0),
    (SurfaceLayout::LeftWall, 1),
    (SurfaceLayout::LeftWall, 2),
    (SurfaceLayout::LeftWall, 3),
    (SurfaceLayout::FrontWall, 1),
    (SurfaceLayout::FrontWall, 3),
    (SurfaceLayout::BackWall, 2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_layouts_defined() {
        assert_eq!(SurfaceLayout::ALL.len(), 4);
    }

    #[test]
    fn resolutions_are_square_powers_of_two() {
        for layout in SurfaceLayout::ALL {
            let r = layout.resolution();
            assert!(r.is_power_of_two(), "{layout:?} resolution {r}");
        }
        assert_eq!(SurfaceLayout::TestCard.resolution(), 2048);
        assert_eq!(SurfaceLayout::LeftWall.resolution(), 1024);
        assert_eq!(SurfaceLayout::FrontWall.resolution(), 1024);
        assert_eq!(SurfaceLayout::BackWall.resolution(), 1024);
    }

    #[test]
    fn test_card_corner_literals() {
        let c = SurfaceLayout::TestCard.corners();
        assert_eq!(c[0], Vec3::new(-1.0, -1.0, -3.0));
        assert_eq!(c[1], Vec3::new(1.0, -1.0, -3.0));
        assert_eq!(c[2], Vec3::new(-1.0, 1.0, -3.0));
        assert_eq!(c[3], Vec3::new(1.0, 1.0, -3.0));
    }

    #[test]
    fn left_wall_corner_literals() {
        let c = SurfaceLayout::LeftWall.corners();
        assert_eq!(c[0], Vec3::new(-3.0, -3.0, 3.0));
        assert_eq!(c[1], Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(c[2], Vec3::new(-3.0, 3.0, 3.0));
        assert_eq!(c[3], Vec3::new(-3.0, 3.0, -3.0));
    }

    #[test]
    fn front_wall_corner_literals() {
        let c = SurfaceLayout::FrontWall.corners();
        assert_eq!(c[0], Vec3::new(-3.0, -3.0, -3.0));
        assert_eq!(c[1], Vec3::new(3.0, -3.0, -3.0));
        assert_eq!(c[2], Vec3::new(-3.0, 3.0, -3.0));
        assert_eq!(c[3], Vec3::new(3.0, 3.0, -3.0));
    }

    #[test]
    fn back_wall_corner_literals() {
        let c = SurfaceLayout::BackWall.corners();
        assert_eq!(c[0], Vec3::new(3.0, -3.0, 3.0));
        assert_eq!(c[1], Vec3::new(-3.0, -3.0, 3.0));
        assert_eq!(c[2], Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(c[3], Vec3::new(-3.0, 3.0, 3.0));
    }

    // Scenario from the demo: the first wall layout's corner 0 is the
    // first literal defined for that branch.
    #[test]
    fn left_wall_corner_zero_matches_first_literal() {
        assert_eq!(
            SurfaceLayout::LeftWall.vertex(0),
            Vec3::new(-3.0, -3.0, 3.0)
        );
    }

    #[test]
    fn vertex_agrees_with_corners_table() {
        for layout in SurfaceLayout::ALL {
            for corner in 0..4 {
                assert_eq!(layout.vertex(corner), layout.corners()[corner]);
            }
        }
    }

    #[test]
    fn walls_form_a_left_front_back_enclosure() {
        // Every left-wall corner sits on x = -3, front on z = -3, back on z = 3.
        for v in SurfaceLayout::LeftWall.corners() {
            assert_eq!(v.x, -3.0);
        }
        for v in SurfaceLayout::FrontWall.corners() {
            assert_eq!(v.z, -3.0);
        }
        for v in SurfaceLayout::BackWall.corners() {
            assert_eq!(v.z, 3.0);
        }
    }

    #[test]
    fn debug_anchors_cover_seven_corners() {
        assert_eq!(DEBUG_ANCHORS.len(), 7);
        // All anchors resolve to distinct world positions.
        let mut seen = Vec::new();
        for (layout, corner) in DEBUG_ANCHORS {
            let p = layout.vertex(corner);
            assert!(!seen.contains(&p.to_array()), "duplicate anchor {p:?}");
            seen.push(p.to_array());
        }
    }
}
