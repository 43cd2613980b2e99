/// Latest pointer offset from the viewport center, in logical pixels.
///
/// Updated from pointer-move events, read once per animation frame.
/// Ordering is last-write-wins: intermediate positions between two frames are
/// dropped, and there is no smoothing or interpolation here — consumers scale
/// the raw offset as they see fit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointerTracker {
    offset: (f32, f32),
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a pointer position in viewport coordinates.
    ///
    /// Stores the offset from the viewport center:
    /// `(client.x - viewport.w / 2, client.y - viewport.h / 2)`.
    pub fn record(&mut self, client: (f32, f32), viewport: (f32, f32)) {
        self.offset = (
            client.0 - viewport.0 / 2.0,
            client.1 - viewport.1 / 2.0,
        );
    }

    /// Returns the most recently recorded center offset.
    ///
    /// Zero until the first pointer event arrives.
    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_is_zero() {
        let tracker = PointerTracker::new();
        assert_eq!(tracker.offset(), (0.0, 0.0));
    }

    #[test]
    fn records_offset_from_center() {
        let mut tracker = PointerTracker::new();
        tracker.record((1000.0, 100.0), (1280.0, 720.0));
        assert_eq!(tracker.offset(), (360.0, -260.0));
    }

    #[test]
    fn center_position_gives_zero_offset() {
        let mut tracker = PointerTracker::new();
        tracker.record((640.0, 360.0), (1280.0, 720.0));
        assert_eq!(tracker.offset(), (0.0, 0.0));
    }

    #[test]
    fn last_write_wins() {
        let mut tracker = PointerTracker::new();
        tracker.record((0.0, 0.0), (800.0, 600.0));
        tracker.record((800.0, 600.0), (800.0, 600.0));
        assert_eq!(tracker.offset(), (400.0, 300.0));
    }
}
