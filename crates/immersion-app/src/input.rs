use glam::{Vec2, Vec3};

use immersion_core::scene::MOVE_STEP;

/// Stick deflection below this magnitude is ignored.
pub const STICK_THRESHOLD: f32 = 0.6;

// ---------------------------------------------------------------------------
// Key — windowing-library-independent key representation
// ---------------------------------------------------------------------------

/// A keyboard key, independent of any windowing library.
///
/// `main.rs` maps `winit::keyboard::PhysicalKey` → `Key`; everything else
/// in the input pipeline works purely with this enum. The keyboard stands
/// in for a tracked controller: `F`/`Space`/`X`/`LShift` are the buttons,
/// arrows and PageUp/PageDown/`-`/`=` are the two sticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    F,
    Space,
    X,
    ShiftLeft,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Minus, // - / _ (same physical key; Shift state ignored)
    Equal, // = / + (same physical key; Shift state ignored)
    R,
}

// ---------------------------------------------------------------------------
// PolledState — level state, sampled once per frame
// ---------------------------------------------------------------------------

/// Which mapped keys are currently held. Updated from key events as they
/// arrive; the frame loop samples it once per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PolledState {
    pub freeze: bool,
    pub debug: bool,
    pub fault: bool,
    pub hand_override: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub page_up: bool,
    pub page_down: bool,
    pub minus: bool,
    pub equal: bool,
    pub recenter: bool,
}

impl PolledState {
    pub fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::F => self.freeze = pressed,
            Key::Space => self.debug = pressed,
            Key::X => self.fault = pressed,
            Key::ShiftLeft => self.hand_override = pressed,
            Key::ArrowLeft => self.left = pressed,
            Key::ArrowRight => self.right = pressed,
            Key::ArrowUp => self.up = pressed,
            Key::ArrowDown => self.down = pressed,
            Key::PageUp => self.page_up = pressed,
            Key::PageDown => self.page_down = pressed,
            Key::Minus => self.minus = pressed,
            Key::Equal => self.equal = pressed,
            Key::R => self.recenter = pressed,
        }
    }

    /// Left stick: cube translation on x (east) and z (south).
    pub fn left_stick(&self) -> Vec2 {
        Vec2::new(
            axis(self.right) - axis(self.left),
            axis(self.down) - axis(self.up),
        )
    }

    /// Right stick: x scales the cube, y lifts it.
    pub fn right_stick(&self) -> Vec2 {
        Vec2::new(
            axis(self.equal) - axis(self.minus),
            axis(self.page_up) - axis(self.page_down),
        )
    }
}

fn axis(held: bool) -> f32 {
    if held {
        1.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Edge detection
// ---------------------------------------------------------------------------

/// A state transition produced by comparing two consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    FreezeToggled,
    FaultTripped,
    FaultCleared,
    Recenter,
}

/// Turns the polled level state into press/release transitions. Polling an
/// unchanged state is idempotent: no events until a key actually changes.
#[derive(Default)]
pub struct EdgeTracker {
    prev: PolledState,
}

impl EdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, state: PolledState) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if state.freeze && !self.prev.freeze {
            events.push(InputEvent::FreezeToggled);
        }
        if state.fault && !self.prev.fault {
            events.push(InputEvent::FaultTripped);
        }
        if !state.fault && self.prev.fault {
            events.push(InputEvent::FaultCleared);
        }
        if state.recenter && !self.prev.recenter {
            events.push(InputEvent::Recenter);
        }
        self.prev = state;
        events
    }
}

// ---------------------------------------------------------------------------
// Stick commands
// ---------------------------------------------------------------------------

/// A per-frame adjustment to the scene parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    MoveBox(Vec3),
    /// Scale step direction: +1 grow, -1 shrink.
    Scale(i32),
}

/// Translate this frame's stick deflections into scene commands. Deflection
/// below [`STICK_THRESHOLD`] is dead zone.
pub fn axis_commands(state: &PolledState) -> Vec<SceneCommand> {
    let mut commands = Vec::new();
    let left = state.left_stick();
    let right = state.right_stick();

    let mut delta = Vec3::ZERO;
    if left.x.abs() > STICK_THRESHOLD {
        delta.x = MOVE_STEP * left.x.signum();
    }
    if left.y.abs() > STICK_THRESHOLD {
        delta.z = MOVE_STEP * left.y.signum();
    }
    if right.y.abs() > STICK_THRESHOLD {
        delta.y = MOVE_STEP * right.y.signum();
    }
    if delta != Vec3::ZERO {
        commands.push(SceneCommand::MoveBox(delta));
    }

    if right.x.abs() > STICK_THRESHOLD {
        commands.push(SceneCommand::Scale(right.x.signum() as i32));
    }
    commands
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[Key]) -> PolledState {
        let mut state = PolledState::default();
        for &k in keys {
            state.set(k, true);
        }
        state
    }

    // --- Edge detection -------------------------------------------------------

    #[test]
    fn freeze_fires_once_per_press() {
        let mut edges = EdgeTracker::new();
        let pressed = held(&[Key::F]);
        assert_eq!(edges.poll(pressed), vec![InputEvent::FreezeToggled]);
        // Holding the key across further polls produces nothing.
        assert!(edges.poll(pressed).is_empty());
        assert!(edges.poll(pressed).is_empty());
    }

    #[test]
    fn fault_press_trips_and_release_clears() {
        let mut edges = EdgeTracker::new();
        assert_eq!(
            edges.poll(held(&[Key::X])),
            vec![InputEvent::FaultTripped]
        );
        assert_eq!(
            edges.poll(PolledState::default()),
            vec![InputEvent::FaultCleared]
        );
    }

    #[test]
    fn unchanged_state_is_idempotent() {
        let mut edges = EdgeTracker::new();
        assert!(edges.poll(PolledState::default()).is_empty());
        assert!(edges.poll(PolledState::default()).is_empty());
    }

    #[test]
    fn recenter_is_edge_triggered() {
        let mut edges = EdgeTracker::new();
        let pressed = held(&[Key::R]);
        assert_eq!(edges.poll(pressed), vec![InputEvent::Recenter]);
        assert!(edges.poll(pressed).is_empty());
    }

    #[test]
    fn simultaneous_presses_report_every_edge() {
        let mut edges = EdgeTracker::new();
        let events = edges.poll(held(&[Key::F, Key::X, Key::R]));
        assert!(events.contains(&InputEvent::FreezeToggled));
        assert!(events.contains(&InputEvent::FaultTripped));
        assert!(events.contains(&InputEvent::Recenter));
    }

    // --- Held levels ----------------------------------------------------------

    #[test]
    fn debug_and_override_are_levels_not_edges() {
        let mut state = PolledState::default();
        state.set(Key::Space, true);
        state.set(Key::ShiftLeft, true);
        assert!(state.debug);
        assert!(state.hand_override);
        state.set(Key::Space, false);
        assert!(!state.debug);
    }

    // --- Stick commands -------------------------------------------------------

    #[test]
    fn idle_sticks_produce_no_commands() {
        assert!(axis_commands(&PolledState::default()).is_empty());
    }

    #[test]
    fn arrow_right_moves_plus_x() {
        let commands = axis_commands(&held(&[Key::ArrowRight]));
        assert_eq!(
            commands,
            vec![SceneCommand::MoveBox(Vec3::new(MOVE_STEP, 0.0, 0.0))]
        );
    }

    #[test]
    fn arrow_up_moves_toward_minus_z() {
        let commands = axis_commands(&held(&[Key::ArrowUp]));
        assert_eq!(
            commands,
            vec![SceneCommand::MoveBox(Vec3::new(0.0, 0.0, -MOVE_STEP))]
        );
    }

    #[test]
    fn page_keys_move_on_y() {
        assert_eq!(
            axis_commands(&held(&[Key::PageUp])),
            vec![SceneCommand::MoveBox(Vec3::new(0.0, MOVE_STEP, 0.0))]
        );
        assert_eq!(
            axis_commands(&held(&[Key::PageDown])),
            vec![SceneCommand::MoveBox(Vec3::new(0.0, -MOVE_STEP, 0.0))]
        );
    }

    #[test]
    fn equal_grows_and_minus_shrinks() {
        assert_eq!(
            axis_commands(&held(&[Key::Equal])),
            vec![SceneCommand::Scale(1)]
        );
        assert_eq!(
            axis_commands(&held(&[Key::Minus])),
            vec![SceneCommand::Scale(-1)]
        );
    }

    #[test]
    fn opposed_keys_cancel_inside_the_dead_zone() {
        assert!(axis_commands(&held(&[Key::ArrowLeft, Key::ArrowRight])).is_empty());
        assert!(axis_commands(&held(&[Key::Minus, Key::Equal])).is_empty());
    }

    #[test]
    fn move_and_scale_combine_in_one_poll() {
        let commands = axis_commands(&held(&[Key::ArrowLeft, Key::Equal]));
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            SceneCommand::MoveBox(Vec3::new(-MOVE_STEP, 0.0, 0.0))
        );
        assert_eq!(commands[1], SceneCommand::Scale(1));
    }
}
