//! Frame-delta trackers.
//!
//! Gesture recognizers report cumulative readings ("total translation since
//! the gesture began", "total scale since the gesture began"). The state
//! machines need the change since the previous event so that several gesture
//! streams can be summed into the same value without double counting.
//!
//! Each tracker must be reset once per gesture (at start, end or cancel).
//! Updating after a finished gesture without a reset yields deltas against
//! the stale baseline; that is the caller's responsibility.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Incremental translation since the previous event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FramesXY {
    pub frames_x: f64,
    pub frames_y: f64,
}

/// Converts cumulative translations into per-event deltas.
#[derive(Debug, Clone, Default)]
pub struct PanTranslationFrame {
    previous: Point,
}

impl PanTranslationFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a non-zero baseline.
    pub fn with_initial(initial: Point) -> Self {
        Self { previous: initial }
    }

    /// Feed a cumulative reading, get the delta since the last one.
    pub fn update(&mut self, translation_x: f64, translation_y: f64) -> FramesXY {
        let frames = FramesXY {
            frames_x: translation_x - self.previous.x,
            frames_y: translation_y - self.previous.y,
        };
        self.previous = Point::new(translation_x, translation_y);
        frames
    }

    /// Reset the baseline to the origin.
    pub fn reset(&mut self) {
        self.reset_to(Point::default());
    }

    pub fn reset_to(&mut self, baseline: Point) {
        self.previous = baseline;
    }
}

/// Converts cumulative scale readings into per-event multiplicative deltas.
#[derive(Debug, Clone)]
pub struct ScaleFrame {
    previous: f64,
}

impl Default for ScaleFrame {
    fn default() -> Self {
        Self { previous: 1.0 }
    }
}

impl ScaleFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a cumulative scale, get the factor since the last one.
    pub fn update(&mut self, scale: f64) -> f64 {
        let scale_frame = scale / self.previous;
        self.previous = scale;
        scale_frame
    }

    /// Reset the baseline to identity.
    pub fn reset(&mut self) {
        self.previous = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_frames_are_differences() {
        let mut tracker = PanTranslationFrame::new();

        for t in [1.0, 2.0, 3.0] {
            let frames = tracker.update(t, t);
            assert_eq!(frames.frames_x, 1.0);
            assert_eq!(frames.frames_y, 1.0);
        }
    }

    #[test]
    fn test_pan_reset_drops_history() {
        let mut tracker = PanTranslationFrame::new();
        tracker.update(10.0, -4.0);
        tracker.reset();

        let frames = tracker.update(1.0, 1.0);
        assert_eq!(frames, FramesXY { frames_x: 1.0, frames_y: 1.0 });
    }

    #[test]
    fn test_pan_without_reset_uses_stale_baseline() {
        let mut tracker = PanTranslationFrame::new();
        tracker.update(10.0, 10.0);

        let frames = tracker.update(1.0, 1.0);
        assert_eq!(frames, FramesXY { frames_x: -9.0, frames_y: -9.0 });
    }

    #[test]
    fn test_pan_initial_baseline() {
        let mut tracker = PanTranslationFrame::with_initial(Point::new(5.0, 5.0));
        let frames = tracker.update(6.0, 4.0);
        assert_eq!(frames, FramesXY { frames_x: 1.0, frames_y: -1.0 });
    }

    #[test]
    fn test_scale_frames_are_ratios() {
        let mut tracker = ScaleFrame::new();

        assert_eq!(tracker.update(1.0), 1.0);
        assert_eq!(tracker.update(2.0), 2.0);
        assert_eq!(tracker.update(4.0), 2.0);

        tracker.reset();
        assert_eq!(tracker.update(1.0), 1.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Summing pan frames reproduces the last cumulative reading.
        #[test]
        fn prop_pan_frames_sum_to_total(
            readings in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..50),
        ) {
            let mut tracker = PanTranslationFrame::new();
            let (mut sum_x, mut sum_y) = (0.0, 0.0);

            for &(x, y) in &readings {
                let frames = tracker.update(x, y);
                sum_x += frames.frames_x;
                sum_y += frames.frames_y;
            }

            let (last_x, last_y) = readings[readings.len() - 1];
            prop_assert!((sum_x - last_x).abs() < 1e-6);
            prop_assert!((sum_y - last_y).abs() < 1e-6);
        }

        /// Property: Multiplying scale frames reproduces the last reading.
        #[test]
        fn prop_scale_frames_multiply_to_total(
            readings in prop::collection::vec(0.1f64..10.0, 1..50),
        ) {
            let mut tracker = ScaleFrame::new();
            let product: f64 = readings.iter().map(|&s| tracker.update(s)).product();

            let last = readings[readings.len() - 1];
            prop_assert!(((product - last) / last).abs() < 1e-9);
        }
    }
}
