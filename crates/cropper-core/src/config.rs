//! Cropper configuration and tuning constants.
//!
//! [`CropperConfig`] is deserializable with camelCase field names so that a
//! JavaScript host can pass a plain object:
//!
//! ```typescript
//! { aspectRatio: "original", rounded: false, scaleMax: 8, hideFooter: true }
//! ```
//!
//! Invalid values are never rejected. They are normalized to a default and a
//! warning is logged.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::animation::Easing;

/// Delay before a released crop box is re-fitted into the container.
pub const SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Duration of settle, re-center and pinch compensation transitions.
pub const SETTLE_DURATION: Duration = Duration::from_millis(500);

/// Easing used by settle, re-center and pinch compensation transitions.
pub const SETTLE_EASING: Easing = Easing::Elastic { bounciness: 1.0 };

/// Backdrop fade towards transparent when a drag starts.
pub const BACKDROP_FADE_IN: Duration = Duration::from_millis(100);

/// Backdrop fade back to opaque when the crop box settles.
pub const BACKDROP_FADE_OUT: Duration = Duration::from_millis(500);

/// Per-millisecond velocity retention of the pan momentum.
pub const DECAY_DECELERATION: f64 = 0.994;

/// Gesture velocities (units/s) are divided by this before feeding the decay.
pub const DECAY_VELOCITY_DIVISOR: f64 = 2000.0;

/// How far below the covering scale a pinch may go before release.
pub const PINCH_UNDERSCALE_ALLOWANCE: f64 = 0.2;

/// Nominal minimum crop-box side before orientation adjustment.
pub const MIN_CROP_BASELINE: f64 = 100.0;

/// Side of a corner handle.
pub const CORNER_SIZE: f64 = 22.0;

/// Border width of the crop frame.
pub const BORDER_WIDTH: f64 = 2.0;

/// Upper bound for a user supplied `scale_max`.
pub const MAXIMUM_AVAILABLE_SCALE: f64 = 20.0;

/// Lower bound for a user supplied `scale_max`.
pub const MINIMUM_SCALE_MAX: f64 = 3.0;

/// Zoom cap used when `scale_max` is missing or out of range.
pub const DEFAULT_SCALE_MAX: f64 = 10.0;

/// Desired shape of the crop box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(from = "Option<AspectRatioRepr>")]
pub enum AspectRatio {
    /// Free-form box. The initial box uses the image ratio but is unlocked.
    #[default]
    Free,
    /// Locked to the natural ratio of the image.
    Original,
    /// Locked to a fixed width / height ratio.
    Fixed(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AspectRatioRepr {
    Ratio(f64),
    Name(String),
}

impl From<Option<AspectRatioRepr>> for AspectRatio {
    fn from(repr: Option<AspectRatioRepr>) -> Self {
        match repr {
            None => AspectRatio::Free,
            Some(AspectRatioRepr::Name(name)) if name == "original" => AspectRatio::Original,
            Some(AspectRatioRepr::Name(name)) => {
                warn!(aspect_ratio = %name, "unknown aspect ratio, using a free crop box");
                AspectRatio::Free
            }
            Some(AspectRatioRepr::Ratio(ratio)) => AspectRatio::Fixed(ratio),
        }
    }
}

/// Display geometry supplied by the host, used for the minimum crop size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenMetrics {
    pub width: f64,
    pub height: f64,
    pub status_bar_height: f64,
}

impl ScreenMetrics {
    pub fn new(width: f64, height: f64, status_bar_height: f64) -> Self {
        Self {
            width,
            height,
            status_bar_height,
        }
    }
}

/// Options of a crop session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropperConfig {
    /// Constrains the crop box shape.
    pub aspect_ratio: AspectRatio,
    /// Forces a 1:1 locked box with a circular mask.
    pub rounded: bool,
    /// Zoom cap, valid in `[3, 20]`.
    pub scale_max: Option<f64>,
    /// Suppresses the built-in action bar.
    pub hide_footer: bool,
    /// Display geometry for the minimum crop size.
    pub screen: ScreenMetrics,
}

impl CropperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the crop box keeps its aspect ratio while dragged.
    pub fn locks_aspect_ratio(&self) -> bool {
        self.rounded
            || self.aspect_ratio == AspectRatio::Original
            || self.fixed_ratio().is_some()
    }

    /// Ratio the initial crop box should have, given the image ratio.
    pub fn target_ratio(&self, image_ratio: f64) -> f64 {
        if self.rounded {
            return 1.0;
        }
        self.fixed_ratio().unwrap_or(image_ratio)
    }

    /// The zoom cap after normalization.
    pub fn effective_scale_max(&self) -> f64 {
        match self.scale_max {
            None => DEFAULT_SCALE_MAX,
            Some(max) if (MINIMUM_SCALE_MAX..=MAXIMUM_AVAILABLE_SCALE).contains(&max) => max,
            Some(max) => {
                warn!(scale_max = max, "scale_max out of range, using the default");
                DEFAULT_SCALE_MAX
            }
        }
    }

    fn fixed_ratio(&self) -> Option<f64> {
        match self.aspect_ratio {
            AspectRatio::Fixed(ratio) if ratio.is_finite() && ratio > 0.0 => Some(ratio),
            AspectRatio::Fixed(ratio) => {
                warn!(aspect_ratio = ratio, "invalid aspect ratio, using a free crop box");
                None
            }
            _ => None,
        }
    }
}
