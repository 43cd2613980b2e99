/// Default visible fraction required to fire: 10% of the watched element.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// One-shot visibility latch.
///
/// `observe` returns `true` exactly once, the first time the reported visible
/// fraction reaches the threshold. After firing the gate stays latched:
/// further reports are ignored, so a signal that fires more than once cannot
/// re-trigger activation.
#[derive(Debug, Clone)]
pub struct VisibilityGate {
    threshold: f32,
    fired: bool,
}

impl VisibilityGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            fired: false,
        }
    }

    /// Reports the currently visible fraction of the watched element.
    ///
    /// Returns `true` on the single crossing from not-yet-fired to fired.
    pub fn observe(&mut self, fraction: f32) -> bool {
        if self.fired || fraction < self.threshold {
            return false;
        }
        self.fired = true;
        true
    }

    /// Whether the gate has already fired.
    pub fn fired(&self) -> bool {
        self.fired
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_threshold_never_fires() {
        let mut gate = VisibilityGate::default();
        assert!(!gate.observe(0.0));
        assert!(!gate.observe(0.05));
        assert!(!gate.fired());
    }

    #[test]
    fn fires_once_at_threshold() {
        let mut gate = VisibilityGate::default();
        assert!(gate.observe(0.1));
        assert!(gate.fired());
    }

    #[test]
    fn latched_after_first_fire() {
        let mut gate = VisibilityGate::default();
        assert!(gate.observe(1.0));
        assert!(!gate.observe(1.0));
        assert!(!gate.observe(0.5));
    }

    #[test]
    fn dipping_below_after_firing_stays_latched() {
        let mut gate = VisibilityGate::new(0.5);
        assert!(!gate.observe(0.2));
        assert!(gate.observe(0.9));
        assert!(!gate.observe(0.2));
        assert!(!gate.observe(0.9));
    }
}
