use glam::{Mat4, Vec3};

use immersion_core::pose::{TrackingFrame, IPD};
use immersion_core::Eye;

/// Per-eye render resolution.
pub const EYE_WIDTH: u32 = 1344;
pub const EYE_HEIGHT: u32 = 1600;

/// Desktop mirror window, a quarter of the stereo target on each axis.
pub const MIRROR_WIDTH: u32 = (EYE_WIDTH * 2) / 4;
pub const MIRROR_HEIGHT: u32 = EYE_HEIGHT / 4;

const FOV_Y_RADIANS: f32 = std::f32::consts::FRAC_PI_2; // 90°
const NEAR: f32 = 0.01;
const FAR: f32 = 1000.0;

/// Simulated tracking: a head that sways gently on sine paths with a hand
/// orbiting in front of it. Purely a function of elapsed time, so frames
/// are reproducible and the pure-logic crates stay testable against it.
pub struct Headset {
    phase_origin: f32,
}

impl Headset {
    pub fn new() -> Self {
        Self { phase_origin: 0.0 }
    }

    /// Symmetric-frustum perspective projection shared by both eyes.
    pub fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_RADIANS, aspect, NEAR, FAR)
    }

    /// Rebase the sway so the current moment becomes the neutral pose.
    pub fn recenter(&mut self, t: f32) {
        self.phase_origin = t;
    }

    pub fn sample(&self, t: f32) -> TrackingFrame {
        let t = t - self.phase_origin;

        let head = Vec3::new(
            0.05 * (0.31 * t).sin(),
            0.03 * (0.23 * t).sin(),
            0.02 * (0.17 * t).sin(),
        );
        let yaw = 0.08 * (0.19 * t).sin();
        let head_rot = Mat4::from_rotation_y(yaw);

        let eye_poses = Eye::BOTH.map(|eye| {
            let side = match eye {
                Eye::Left => -1.0,
                Eye::Right => 1.0,
            };
            let offset = head_rot.transform_vector3(Vec3::new(side * IPD * 0.5, 0.0, 0.0));
            Mat4::from_translation(head + offset) * head_rot
        });

        // Hand orbits at chest height in front of the viewer.
        let hand_position = head
            + Vec3::new(
                0.25 * (0.9 * t).cos(),
                -0.2 + 0.05 * (1.3 * t).sin(),
                -0.45 + 0.1 * (0.9 * t).sin(),
            );

        TrackingFrame {
            eye_poses,
            hand_position,
        }
    }
}

impl Default for Headset {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_is_deterministic() {
        let headset = Headset::new();
        let a = headset.sample(3.7);
        let b = headset.sample(3.7);
        assert_eq!(a.eye_poses, b.eye_poses);
        assert_eq!(a.hand_position, b.hand_position);
    }

    #[test]
    fn eyes_are_one_ipd_apart() {
        let headset = Headset::new();
        let frame = headset.sample(12.5);
        let left = frame.eye_poses[0].w_axis.truncate();
        let right = frame.eye_poses[1].w_axis.truncate();
        assert!((left.distance(right) - IPD).abs() < 1e-6);
    }

    #[test]
    fn recenter_rebases_to_the_neutral_pose() {
        let mut headset = Headset::new();
        let neutral = headset.sample(0.0);
        headset.recenter(42.0);
        let rebased = headset.sample(42.0);
        assert_eq!(rebased.eye_poses, neutral.eye_poses);
    }

    #[test]
    fn hand_stays_in_front_of_the_head() {
        let headset = Headset::new();
        for i in 0..100 {
            let frame = headset.sample(i as f32 * 0.37);
            assert!(frame.hand_position.z < 0.0, "hand behind viewer at {i}");
        }
    }

    #[test]
    fn mirror_is_a_quarter_of_the_stereo_target() {
        assert_eq!(MIRROR_WIDTH, 672);
        assert_eq!(MIRROR_HEIGHT, 400);
    }
}
