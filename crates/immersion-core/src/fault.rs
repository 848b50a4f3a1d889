// ---------------------------------------------------------------------------
// FaultIndex — simulated per-screen display failure
// ---------------------------------------------------------------------------

/// Index of the screen currently rendering with the blank shader.
///
/// 0 means no screen is faulted; 1..=6 name the six composited screens
/// (1..=3 left eye, 4..=6 right eye). At most one screen is faulted at a
/// time: tripping overwrites any previous value and clearing resets to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultIndex(u8);

impl FaultIndex {
    pub const NONE: FaultIndex = FaultIndex(0);

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_active(self) -> bool {
        self.0 != 0
    }

    /// Pick a random screen 1..=6 to fault (fault-button press edge).
    pub fn trip(&mut self, rng: &mut XorShift32) {
        self.0 = 1 + (rng.next() % 6) as u8;
    }

    /// Back to healthy (fault-button release edge).
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Does this frame's fault land on the given screen number (1..=6)?
    pub fn hits(self, screen: u8) -> bool {
        self.0 != 0 && self.0 == screen
    }
}

// ---------------------------------------------------------------------------
// XorShift32 — tiny deterministic RNG for the fault picker
// ---------------------------------------------------------------------------

/// Marsaglia xorshift. The fault picker only needs "looks random across
/// presses", and a seedable generator keeps the demo reproducible in tests.
#[derive(Debug, Clone)]
pub struct XorShift32(u32);

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // A zero state would stay zero forever.
        XorShift32(if seed == 0 { 0x9e37_79b9 } else { seed })
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        let f = FaultIndex::default();
        assert_eq!(f.get(), 0);
        assert!(!f.is_active());
    }

    #[test]
    fn trip_sets_nonzero_in_range() {
        let mut rng = XorShift32::new(7);
        let mut f = FaultIndex::NONE;
        for _ in 0..1000 {
            f.trip(&mut rng);
            assert!((1..=6).contains(&f.get()), "out of range: {}", f.get());
            assert!(f.is_active());
        }
    }

    #[test]
    fn clear_resets_to_zero() {
        let mut rng = XorShift32::new(42);
        let mut f = FaultIndex::NONE;
        f.trip(&mut rng);
        assert!(f.is_active());
        f.clear();
        assert_eq!(f.get(), 0);
    }

    #[test]
    fn hits_only_the_selected_screen() {
        let mut rng = XorShift32::new(3);
        let mut f = FaultIndex::NONE;
        f.trip(&mut rng);
        let selected = f.get();
        let hit_count = (1..=6u8).filter(|&s| f.hits(s)).count();
        assert_eq!(hit_count, 1);
        assert!(f.hits(selected));
    }

    #[test]
    fn no_screen_hit_while_inactive() {
        let f = FaultIndex::NONE;
        for s in 1..=6u8 {
            assert!(!f.hits(s));
        }
    }

    #[test]
    fn rng_eventually_selects_every_screen() {
        let mut rng = XorShift32::new(1);
        let mut seen = [false; 6];
        let mut f = FaultIndex::NONE;
        for _ in 0..200 {
            f.trip(&mut rng);
            seen[(f.get() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "coverage: {seen:?}");
    }

    #[test]
    fn zero_seed_does_not_stick() {
        let mut rng = XorShift32::new(0);
        assert_ne!(rng.next(), 0);
    }
}
