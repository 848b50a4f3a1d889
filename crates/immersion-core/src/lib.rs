pub mod fault;
pub mod layout;
pub mod pose;
pub mod scene;

// ---------------------------------------------------------------------------
// Eye — stereo pair selector used throughout the pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    pub fn index(self) -> usize {
        match self {
            Eye::Left => 0,
            Eye::Right => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameContext — per-frame flags handed to the render step
// ---------------------------------------------------------------------------

/// Everything the composite pass needs to know about this frame beyond the
/// poses themselves. Built fresh by the input step each frame so the render
/// code never reaches into scattered mutable fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext {
    /// Which screen (1..=6) renders with the blank pipeline; 0 = none.
    pub fault: fault::FaultIndex,
    /// Draw the wireframe tracking lines this frame.
    pub show_debug_lines: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_indices_are_stable() {
        assert_eq!(Eye::Left.index(), 0);
        assert_eq!(Eye::Right.index(), 1);
        assert_eq!(Eye::BOTH.len(), 2);
    }

    #[test]
    fn frame_context_defaults_to_no_fault_no_lines() {
        let ctx = FrameContext::default();
        assert!(!ctx.fault.is_active());
        assert!(!ctx.show_debug_lines);
    }
}
