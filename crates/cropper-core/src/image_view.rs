//! Image pan / zoom state machine.
//!
//! The image is laid out once at scale 1 (`layout`) and then moved by a
//! translation and a scale around its own center:
//!
//! ```text
//! apparent_left = translate_x - (width * scale - width) / 2
//! apparent_top  = translate_y - (height * scale - height) / 2
//! ```
//!
//! Pan and pinch gestures may run at the same time; both feed deltas into the
//! same shared values. On release the image coasts (pan) and is then
//! re-centered so that it covers the crop box again.
//!
//! # Invariants
//!
//! Once every transition has completed after a gesture ends, the apparent
//! image rectangle contains the crop-box rectangle and the scale lies in
//! `[min_scale, max_scale]`, where `min_scale` is the cover scale of the
//! layout over the crop box.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{Motion, SharedValue, Tick};
use crate::config::{
    DECAY_DECELERATION, DECAY_VELOCITY_DIVISOR, PINCH_UNDERSCALE_ALLOWANCE, SETTLE_DURATION,
    SETTLE_EASING,
};
use crate::crop_box::CropBoxFit;
use crate::frame::{PanTranslationFrame, ScaleFrame};
use crate::geometry::{resize, ResizeMode};
use crate::gesture::{GestureEvent, GestureState};
use crate::types::{Edges, Rect};

/// Long enough for any transition the image starts.
const FINISH_HORIZON: Duration = Duration::from_secs(60);

/// Upper bound of tick rounds in [`ImageView::finish_all`]. Each round can
/// only chain into one further transition (decay, zoom, then re-center).
const FINISH_ROUNDS: usize = 4;

/// What the image reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageNotice {
    /// The image moved under a gesture.
    Moved,
    /// A re-center started; carries the edges the image will rest at.
    Settled(Edges),
}

/// Axes selected for a re-center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Axes {
    pub x: bool,
    pub y: bool,
}

impl Axes {
    pub const BOTH: Axes = Axes { x: true, y: true };

    pub fn any(self) -> bool {
        self.x || self.y
    }
}

/// Presented transform of the image, for the host renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

/// Pan / zoom state of the image under the crop box.
#[derive(Debug, Clone)]
pub struct ImageView {
    layout: Rect,
    crop_box_layout: Rect,
    scale: SharedValue,
    translate_x: SharedValue,
    translate_y: SharedValue,
    max_scale: f64,
    pan_frames: PanTranslationFrame,
    scale_frames: ScaleFrame,
    /// A settle compensation is running; re-center once it lands.
    zoom_in_flight: bool,
}

impl ImageView {
    pub fn new(max_scale: f64) -> Self {
        Self {
            layout: Rect::default(),
            crop_box_layout: Rect::default(),
            scale: SharedValue::new(1.0),
            translate_x: SharedValue::new(0.0),
            translate_y: SharedValue::new(0.0),
            max_scale,
            pan_frames: PanTranslationFrame::new(),
            scale_frames: ScaleFrame::new(),
            zoom_in_flight: false,
        }
    }

    pub fn layout(&self) -> Rect {
        self.layout
    }

    pub fn crop_box_layout(&self) -> Rect {
        self.crop_box_layout
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Logical scale.
    pub fn scale(&self) -> f64 {
        self.scale.value()
    }

    /// Logical translation.
    pub fn translation(&self) -> (f64, f64) {
        (self.translate_x.value(), self.translate_y.value())
    }

    pub fn transform(&self) -> ImageTransform {
        ImageTransform {
            translate_x: self.translate_x.display(),
            translate_y: self.translate_y.display(),
            scale: self.scale.display(),
            width: self.layout.width,
            height: self.layout.height,
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.zoom_in_flight
            && self.scale.is_settled()
            && self.translate_x.is_settled()
            && self.translate_y.is_settled()
    }

    /// Smallest scale at which the image still covers the crop box.
    pub fn min_scale(&self) -> f64 {
        resize(
            self.crop_box_layout.width,
            self.crop_box_layout.height,
            self.layout.width,
            self.layout.height,
            ResizeMode::Cover,
        )
        .scale
    }

    /// Apparent image rectangle from the logical values.
    pub fn apparent_rect(&self) -> Rect {
        let scale = self.scale.value();
        let width = self.layout.width * scale;
        let height = self.layout.height * scale;
        Rect::new(
            self.translate_x.value() - (width - self.layout.width) / 2.0,
            self.translate_y.value() - (height - self.layout.height) / 2.0,
            width,
            height,
        )
    }

    /// Lay the image out at `layout` with the given scale, dropping all motion.
    pub fn reset_to(&mut self, layout: Rect, scale: f64) {
        self.layout = layout;
        self.translate_x.set(layout.x);
        self.translate_y.set(layout.y);
        self.scale.set(scale);
        self.pan_frames.reset();
        self.scale_frames.reset();
        self.zoom_in_flight = false;
    }

    pub fn set_crop_box_layout(&mut self, layout: Rect) {
        self.crop_box_layout = layout;
    }

    /// Follow a crop-box settle so the same content stays under the box.
    ///
    /// The scale grows by `fit.scale` (capped), the translation compensates
    /// the zoom around `fit.focal_*` and then shifts by `fit.translate_*`.
    /// When the transitions complete the image is re-centered.
    pub fn pinch_to_zoom(&mut self, fit: &CropBoxFit) {
        let scale = self.scale.value();
        let translate_x = self.translate_x.value();
        let translate_y = self.translate_y.value();

        let new_scale = self.max_scale.min(scale * fit.scale);

        let center_x = self.layout.width / 2.0;
        let center_y = self.layout.height / 2.0;

        let delta_x = (center_x - fit.focal_x + translate_x) * (fit.scale - 1.0);
        let delta_y = (center_y - fit.focal_y + translate_y) * (fit.scale - 1.0);

        let recentered_x = translate_x + delta_x + fit.translate_x;
        let recentered_y = translate_y + delta_y + fit.translate_y;

        debug!(new_scale, recentered_x, recentered_y, "image follows crop box settle");

        self.scale
            .animate(Motion::timing(new_scale, SETTLE_DURATION, SETTLE_EASING));
        self.translate_x
            .animate(Motion::timing(recentered_x, SETTLE_DURATION, SETTLE_EASING));
        self.translate_y
            .animate(Motion::timing(recentered_y, SETTLE_DURATION, SETTLE_EASING));
        self.zoom_in_flight = true;
    }

    /// Feed a pan recognizer event.
    pub fn handle_pan(&mut self, event: &GestureEvent) -> Option<ImageNotice> {
        match event.state {
            GestureState::Undetermined => None,
            GestureState::Began => {
                self.stop_all();
                self.pan_frames.reset();
                None
            }
            GestureState::Active => {
                let frames = self
                    .pan_frames
                    .update(event.translation_x, event.translation_y);
                self.translate_x
                    .set(self.translate_x.value() + frames.frames_x);
                self.translate_y
                    .set(self.translate_y.value() + frames.frames_y);
                Some(ImageNotice::Moved)
            }
            GestureState::End => {
                self.pan_frames.reset();
                self.translate_x.animate(Motion::decay(
                    event.velocity_x / DECAY_VELOCITY_DIVISOR,
                    DECAY_DECELERATION,
                ));
                self.translate_y.animate(Motion::decay(
                    event.velocity_y / DECAY_VELOCITY_DIVISOR,
                    DECAY_DECELERATION,
                ));
                None
            }
            GestureState::Cancelled | GestureState::Failed => {
                self.pan_frames.reset();
                Some(self.recenter(Axes::BOTH))
            }
        }
    }

    /// Feed a pinch recognizer event. The focal point is in container
    /// coordinates.
    pub fn handle_pinch(&mut self, event: &GestureEvent) -> Option<ImageNotice> {
        match event.state {
            GestureState::Undetermined => None,
            GestureState::Began => {
                self.stop_all();
                self.scale_frames.reset();
                None
            }
            GestureState::Active => {
                let scale_frame = self.scale_frames.update(event.scale);
                let min_scale = self.min_scale();

                let center_x = self.layout.width / 2.0;
                let center_y = self.layout.height / 2.0;

                let delta_x =
                    (1.0 - scale_frame) * (event.focal_x - self.translate_x.value() - center_x);
                let delta_y =
                    (1.0 - scale_frame) * (event.focal_y - self.translate_y.value() - center_y);

                let scale = (self.scale.value() * scale_frame)
                    .max(min_scale - PINCH_UNDERSCALE_ALLOWANCE)
                    .min(self.max_scale);
                self.scale.set(scale);

                // At the cap the zoom no longer grows, so the focal point
                // needs no compensation.
                if scale < self.max_scale {
                    self.translate_x.set(self.translate_x.value() + delta_x);
                    self.translate_y.set(self.translate_y.value() + delta_y);
                }
                Some(ImageNotice::Moved)
            }
            GestureState::End | GestureState::Cancelled | GestureState::Failed => {
                self.scale_frames.reset();
                Some(self.recenter(Axes::BOTH))
            }
        }
    }

    /// Clamp the scale and pull the selected axes back over the crop box.
    ///
    /// Covering the crop box wins over `max_scale`.
    pub fn recenter(&mut self, axes: Axes) -> ImageNotice {
        let scale = self.scale.value().min(self.max_scale).max(self.min_scale());
        let crop = self.crop_box_layout;

        let width = self.layout.width * scale;
        let height = self.layout.height * scale;
        let width_diff = (width - self.layout.width) / 2.0;
        let height_diff = (height - self.layout.height) / 2.0;

        let mut x = self.translate_x.value();
        let mut y = self.translate_y.value();

        if axes.y {
            let top = y - height_diff;
            if top > crop.y {
                y = crop.y + height_diff;
            } else if top + height < crop.bottom() {
                y = crop.y + height_diff - height + crop.height;
            }
        }
        if axes.x {
            let left = x - width_diff;
            if left > crop.x {
                x = crop.x + width_diff;
            } else if left + width < crop.right() {
                x = crop.x + width_diff - width + crop.width;
            }
        }

        self.scale
            .animate(Motion::timing(scale, SETTLE_DURATION, SETTLE_EASING));
        if axes.x {
            self.translate_x
                .animate(Motion::timing(x, SETTLE_DURATION, SETTLE_EASING));
        }
        if axes.y {
            self.translate_y
                .animate(Motion::timing(y, SETTLE_DURATION, SETTLE_EASING));
        }

        let top = y - height_diff;
        let left = x - width_diff;
        ImageNotice::Settled(Edges::new(top, left, left + width, top + height))
    }

    /// Source-space rectangle under the crop box, in layout units.
    pub fn crop_area(&self) -> Rect {
        let scale = self.scale.value();
        let apparent = self.apparent_rect();
        let crop = self.crop_box_layout;

        Rect::new(
            (crop.x - apparent.x) / scale,
            (crop.y - apparent.y) / scale,
            crop.width / scale,
            crop.height / scale,
        )
    }

    /// Advance transitions; coasting axes stop at the crop-box boundary.
    pub fn tick(&mut self, dt: Duration) -> Option<ImageNotice> {
        let mut axes = Axes::default();

        if let Tick::Finished(end) = self.scale.tick(dt) {
            self.scale.set_value(end);
        }

        let scale = self.scale.value();
        let crop = self.crop_box_layout;
        let width = self.layout.width * scale;
        let height = self.layout.height * scale;
        let width_diff = (width - self.layout.width) / 2.0;
        let height_diff = (height - self.layout.height) / 2.0;

        let x_out = |value: f64| {
            let left = value - width_diff;
            left >= crop.x || left + width <= crop.right()
        };
        let y_out = |value: f64| {
            let top = value - height_diff;
            top >= crop.y || top + height <= crop.bottom()
        };

        axes.x = Self::tick_axis(&mut self.translate_x, dt, x_out);
        axes.y = Self::tick_axis(&mut self.translate_y, dt, y_out);

        if self.zoom_in_flight
            && self.scale.is_settled()
            && self.translate_x.is_settled()
            && self.translate_y.is_settled()
        {
            self.zoom_in_flight = false;
            axes = Axes::BOTH;
        }

        if axes.any() {
            return Some(self.recenter(axes));
        }
        None
    }

    /// Run every transition, including the ones they chain into, to its end.
    pub fn finish_all(&mut self) -> Vec<ImageNotice> {
        let mut notices = Vec::new();
        for _ in 0..FINISH_ROUNDS {
            if self.is_settled() {
                break;
            }
            notices.extend(self.tick(FINISH_HORIZON));
        }
        notices
    }

    /// Tick one translation axis. Returns true when a coast ended and the
    /// axis needs re-centering.
    fn tick_axis(value: &mut SharedValue, dt: Duration, out_of_bounds: impl Fn(f64) -> bool) -> bool {
        let coasting = matches!(
            value.transition().map(|transition| transition.motion()),
            Some(Motion::Decay { .. })
        );

        match value.tick(dt) {
            Tick::Finished(end) => {
                value.set_value(end);
                coasting
            }
            Tick::Running if coasting && out_of_bounds(value.display()) => {
                debug!(position = value.display(), "decay reached the crop box edge");
                value.stop();
                true
            }
            _ => false,
        }
    }

    fn stop_all(&mut self) {
        self.scale.stop();
        self.translate_x.stop();
        self.translate_y.stop();
        self.zoom_in_flight = false;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
