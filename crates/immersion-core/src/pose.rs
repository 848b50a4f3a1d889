use glam::{Mat4, Vec3};

use crate::Eye;

// ---------------------------------------------------------------------------
// Tracking input and the per-eye view state derived from it
// ---------------------------------------------------------------------------

/// Inter-pupillary distance in meters (average human IPD).
pub const IPD: f32 = 0.063;

/// Horizontal offset applied per eye when the view rides the tracked hand.
pub const HAND_EYE_OFFSET: f32 = 0.033;

/// One frame's worth of tracking data from the headset session.
#[derive(Debug, Clone, Copy)]
pub struct TrackingFrame {
    /// World-from-eye transform for each eye.
    pub eye_poses: [Mat4; 2],
    /// World position of the tracked hand.
    pub hand_position: Vec3,
}

/// The eye poses actually used for rendering.
///
/// Normally these follow the tracking input every frame. Two overrides
/// change that: freeze latches the current poses until toggled off, and
/// the hand override (trigger held) parks each eye at the hand position,
/// split horizontally by [`HAND_EYE_OFFSET`].
#[derive(Debug, Clone)]
pub struct ViewState {
    eye_world: [Mat4; 2],
    frozen: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            eye_world: [Mat4::IDENTITY; 2],
            frozen: false,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
    }

    /// Fold one tracking sample into the view. Frozen views ignore it.
    pub fn update(&mut self, tracking: &TrackingFrame, hand_override: bool) {
        if self.frozen {
            return;
        }
        for eye in Eye::BOTH {
            let i = eye.index();
            self.eye_world[i] = if hand_override {
                let dx = match eye {
                    Eye::Left => -HAND_EYE_OFFSET,
                    Eye::Right => HAND_EYE_OFFSET,
                };
                Mat4::from_translation(tracking.hand_position + Vec3::new(dx, 0.0, 0.0))
            } else {
                tracking.eye_poses[i]
            };
        }
    }

    /// World-from-eye transform.
    pub fn eye_world(&self, eye: Eye) -> Mat4 {
        self.eye_world[eye.index()]
    }

    /// View matrix for rendering: inverse of the eye pose.
    pub fn eye_view(&self, eye: Eye) -> Mat4 {
        self.eye_world[eye.index()].inverse()
    }

    /// Translation component of the eye pose (debug-line target).
    pub fn eye_position(&self, eye: Eye) -> Vec3 {
        self.eye_world[eye.index()].w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking_at(x: f32) -> TrackingFrame {
        TrackingFrame {
            eye_poses: [
                Mat4::from_translation(Vec3::new(x - IPD / 2.0, 1.6, 0.0)),
                Mat4::from_translation(Vec3::new(x + IPD / 2.0, 1.6, 0.0)),
            ],
            hand_position: Vec3::new(0.2, 1.2, -0.4),
        }
    }

    #[test]
    fn follows_tracking_by_default() {
        let mut view = ViewState::new();
        view.update(&tracking_at(0.5), false);
        assert!((view.eye_position(Eye::Left).x - (0.5 - IPD / 2.0)).abs() < 1e-6);
        assert!((view.eye_position(Eye::Right).x - (0.5 + IPD / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn frozen_view_ignores_tracking_until_unfrozen() {
        let mut view = ViewState::new();
        view.update(&tracking_at(0.0), false);
        let before = view.eye_world(Eye::Left);

        view.toggle_freeze();
        view.update(&tracking_at(5.0), false);
        view.update(&tracking_at(-5.0), false);
        assert_eq!(view.eye_world(Eye::Left), before);

        view.toggle_freeze();
        view.update(&tracking_at(5.0), false);
        assert_ne!(view.eye_world(Eye::Left), before);
    }

    #[test]
    fn hand_override_splits_eyes_around_hand() {
        let mut view = ViewState::new();
        let t = tracking_at(0.0);
        view.update(&t, true);
        let left = view.eye_position(Eye::Left);
        let right = view.eye_position(Eye::Right);
        assert!((left.x - (t.hand_position.x - HAND_EYE_OFFSET)).abs() < 1e-6);
        assert!((right.x - (t.hand_position.x + HAND_EYE_OFFSET)).abs() < 1e-6);
        assert_eq!(left.y, t.hand_position.y);
        assert_eq!(left.z, t.hand_position.z);
    }

    #[test]
    fn freeze_beats_hand_override() {
        let mut view = ViewState::new();
        view.update(&tracking_at(0.0), false);
        let before = view.eye_world(Eye::Right);
        view.toggle_freeze();
        view.update(&tracking_at(0.0), true);
        assert_eq!(view.eye_world(Eye::Right), before);
    }

    #[test]
    fn view_is_inverse_of_pose() {
        let mut view = ViewState::new();
        view.update(&tracking_at(1.0), false);
        let m = view.eye_world(Eye::Left) * view.eye_view(Eye::Left);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
}
