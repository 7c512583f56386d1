//! Pure geometry helpers: fit modes, aspect-ratio rectangles and clamping.
//!
//! Nothing here holds state. The crop box, the image and the orchestrator all
//! build on these functions.

use serde::{Deserialize, Serialize};

use crate::config::{ScreenMetrics, MIN_CROP_BASELINE};
use crate::types::Size;

/// How a child rectangle is fitted into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    /// Largest size that fits entirely inside the container.
    #[default]
    Contain,
    /// Smallest size that fills the whole container.
    Cover,
}

/// Result of [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resized {
    pub width: f64,
    pub height: f64,
    /// Factor between the fitted size and the original `width`/`height`.
    pub scale: f64,
}

/// Fit a `width` x `height` box into a container, keeping its aspect ratio.
///
/// Two candidates are considered: one matching the container width and one
/// matching the container height. The width-matched candidate wins when it
/// fits (`Contain`) or overflows (`Cover`) the container height.
///
/// # Example
///
/// ```ignore
/// let fitted = resize(100.0, 100.0, 500.0, 250.0, ResizeMode::Contain);
/// assert_eq!((fitted.width, fitted.height, fitted.scale), (100.0, 50.0, 0.2));
/// ```
pub fn resize(
    container_width: f64,
    container_height: f64,
    width: f64,
    height: f64,
    mode: ResizeMode,
) -> Resized {
    let width_matched_height = (container_width * height) / width;
    let height_matched_width = (container_height * width) / height;

    let use_width_match = match mode {
        ResizeMode::Contain => width_matched_height <= container_height,
        ResizeMode::Cover => width_matched_height >= container_height,
    };

    if use_width_match {
        Resized {
            width: container_width,
            height: width_matched_height,
            scale: width_matched_height / height,
        }
    } else {
        Resized {
            width: height_matched_width,
            height: container_height,
            scale: height_matched_width / width,
        }
    }
}

/// Rectangle with the given aspect ratio, constrained by the smaller side.
///
/// The constraining side becomes the width; the height follows from the
/// ratio. The result may exceed the input bounds and is usually passed
/// through [`resize`] afterwards.
pub fn create_aspect_ratio_rectangle(width: f64, height: f64, aspect_ratio: f64) -> Size {
    let side = if width > height { height } else { width };
    Size::new(side, side / aspect_ratio)
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `min > max` the result is
/// `max`.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Minimum crop-box size for a screen, starting from a 100 unit baseline.
///
/// In landscape the baseline grows with the width-to-height ratio of the
/// screen (the status bar counted as part of the height).
pub fn min_cropper_size(screen: ScreenMetrics, ratio: f64) -> Size {
    let mut side = MIN_CROP_BASELINE;

    if screen.width > screen.height {
        side = (side * screen.width) / (screen.height + screen.status_bar_height);
    }

    create_aspect_ratio_rectangle(side, side, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_cover_same_size() {
        let fitted = resize(100.0, 100.0, 100.0, 100.0, ResizeMode::Cover);
        assert_eq!(fitted.width, 100.0);
        assert_eq!(fitted.height, 100.0);
        assert_eq!(fitted.scale, 1.0);
    }

    #[test]
    fn test_resize_contain_wide_child() {
        let fitted = resize(100.0, 100.0, 500.0, 250.0, ResizeMode::Contain);
        assert_eq!(fitted.width, 100.0);
        assert_eq!(fitted.height, 50.0);
        assert_eq!(fitted.scale, 0.2);
    }

    #[test]
    fn test_resize_cover_wide_child() {
        let fitted = resize(100.0, 100.0, 500.0, 250.0, ResizeMode::Cover);
        assert_eq!(fitted.width, 200.0);
        assert_eq!(fitted.height, 100.0);
        assert_eq!(fitted.scale, 0.4);
    }

    #[test]
    fn test_resize_contain_tall_child() {
        let fitted = resize(400.0, 300.0, 100.0, 200.0, ResizeMode::Contain);
        assert_eq!(fitted.width, 150.0);
        assert_eq!(fitted.height, 300.0);
        assert_eq!(fitted.scale, 1.5);
    }

    #[test]
    fn test_create_aspect_ratio_rectangle() {
        let rect = create_aspect_ratio_rectangle(100.0, 50.0, 1.0);
        assert_eq!(rect, Size::new(50.0, 50.0));

        let rect = create_aspect_ratio_rectangle(300.0, 600.0, 2.0);
        assert_eq!(rect, Size::new(300.0, 150.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(1.0, 0.0, 2.0), 1.0);
        assert_eq!(clamp(3.0, 0.0, 2.0), 2.0);
        assert_eq!(clamp(-1.0, 0.0, 2.0), 0.0);
    }

    #[test]
    fn test_clamp_inverted_bounds_returns_max() {
        assert_eq!(clamp(5.0, 10.0, 2.0), 2.0);
        assert_eq!(clamp(-5.0, 10.0, 2.0), 2.0);
    }

    #[test]
    fn test_min_cropper_size_portrait() {
        let size = min_cropper_size(ScreenMetrics::new(390.0, 844.0, 44.0), 1.0);
        assert_eq!(size, Size::new(100.0, 100.0));

        let size = min_cropper_size(ScreenMetrics::new(390.0, 844.0, 44.0), 2.0);
        assert_eq!(size, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_min_cropper_size_landscape() {
        let size = min_cropper_size(ScreenMetrics::new(800.0, 380.0, 20.0), 1.0);
        assert_eq!(size, Size::new(200.0, 200.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn dimension() -> impl Strategy<Value = f64> {
        1.0f64..=5000.0
    }

    proptest! {
        /// Property: Both fit modes preserve the aspect ratio of the child.
        #[test]
        fn prop_resize_preserves_aspect_ratio(
            cw in dimension(), ch in dimension(), w in dimension(), h in dimension(),
            cover in any::<bool>(),
        ) {
            let mode = if cover { ResizeMode::Cover } else { ResizeMode::Contain };
            let fitted = resize(cw, ch, w, h, mode);

            let expected = w / h;
            let actual = fitted.width / fitted.height;
            prop_assert!(((actual - expected) / expected).abs() < EPSILON);
        }

        /// Property: Contain fits inside, cover fills the container.
        #[test]
        fn prop_resize_respects_mode(
            cw in dimension(), ch in dimension(), w in dimension(), h in dimension(),
        ) {
            let contained = resize(cw, ch, w, h, ResizeMode::Contain);
            prop_assert!(contained.width <= cw * (1.0 + EPSILON));
            prop_assert!(contained.height <= ch * (1.0 + EPSILON));

            let covered = resize(cw, ch, w, h, ResizeMode::Cover);
            prop_assert!(covered.width >= cw * (1.0 - EPSILON));
            prop_assert!(covered.height >= ch * (1.0 - EPSILON));
        }

        /// Property: The scale maps the child onto the fitted size.
        #[test]
        fn prop_resize_scale_is_consistent(
            cw in dimension(), ch in dimension(), w in dimension(), h in dimension(),
        ) {
            let fitted = resize(cw, ch, w, h, ResizeMode::Cover);
            prop_assert!((fitted.width - w * fitted.scale).abs() <= fitted.width * EPSILON);
            prop_assert!((fitted.height - h * fitted.scale).abs() <= fitted.height * EPSILON);
        }

        /// Property: Values inside the range are unchanged, outside snap to a bound.
        #[test]
        fn prop_clamp(min in -1000.0f64..1000.0, span in 0.0f64..1000.0, value in -3000.0f64..3000.0) {
            let max = min + span;
            let clamped = clamp(value, min, max);

            if value < min {
                prop_assert_eq!(clamped, min);
            } else if value > max {
                prop_assert_eq!(clamped, max);
            } else {
                prop_assert_eq!(clamped, value);
            }
        }
    }
}
