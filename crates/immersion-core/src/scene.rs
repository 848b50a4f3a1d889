use glam::Vec3;

// ---------------------------------------------------------------------------
// SceneParams — stick-driven cube transform
// ---------------------------------------------------------------------------

pub const SCALE_DEFAULT: f32 = 0.2;
pub const SCALE_STEP: f32 = 0.001;
pub const MOVE_STEP: f32 = 0.01;

/// The mutable bits of the hardcoded scene: where the little cube sits and
/// how big it is. Everything else (walls, backdrop) is static geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    /// Cube edge scale, kept inside [0.0, 1.0].
    pub scale_factor: f32,
    /// Cube translation accumulated from stick input.
    pub box_offset: Vec3,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneParams {
    pub fn new() -> Self {
        Self {
            scale_factor: SCALE_DEFAULT,
            box_offset: Vec3::ZERO,
        }
    }

    /// One scale step: +1 grows, -1 shrinks, 0 snaps back to the default.
    /// The factor never leaves [0.0, 1.0] however many steps arrive.
    pub fn change_scale(&mut self, direction: i32) {
        match direction.signum() {
            0 => self.scale_factor = SCALE_DEFAULT,
            d => {
                self.scale_factor =
                    (self.scale_factor + d as f32 * SCALE_STEP).clamp(0.0, 1.0);
            }
        }
    }

    /// Translate the cube by one stick deflection.
    pub fn move_box(&mut self, delta: Vec3) {
        self.box_offset += delta;
    }
}
