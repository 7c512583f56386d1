//! Session orchestrator.
//!
//! [`Cropper`] owns the container layout, the original-image scale, the crop
//! box and the image. Neither state machine ever sees the other: each returns
//! notices, and the orchestrator turns them into commands for the other side.
//!
//! ```text
//! CropBoxNotice::BoundsChanged(rect) -> image.set_crop_box_layout(rect)
//! CropBoxNotice::Fitted(fit)         -> image.set_crop_box_layout + pinch_to_zoom
//! ImageNotice::Moved                 -> crop_box.hold_animations()
//! ImageNotice::Settled(edges)        -> crop_box.set_image_layout(edges)
//! ```
//!
//! Results for the host (`Done`, `Cancelled`, `Reset`, `Changed`) are queued
//! as [`CropperEvent`]s and drained with [`Cropper::drain_events`].

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error};

use crate::config::CropperConfig;
use crate::crop_box::{CropBox, CropBoxNotice};
use crate::error::CropperError;
use crate::geometry::{create_aspect_ratio_rectangle, resize, ResizeMode};
use crate::gesture::{GestureEvent, Handle};
use crate::image_view::{ImageNotice, ImageTransform, ImageView};
use crate::overlay::Overlay;
use crate::size::ImageSizeProvider;
use crate::types::{Edges, Rect, Size};

/// Rounds of fast-forwarding in [`Cropper::done`]. A settle can chain into a
/// zoom compensation and a re-center, each finishing in its own round.
const SETTLE_ROUNDS: usize = 4;

/// Outcome reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "rect", rename_all = "camelCase")]
pub enum CropperEvent {
    /// Final crop in source-image pixels.
    Done(Rect),
    Cancelled,
    Reset,
    /// The crop box or the image moved since the last reset.
    Changed,
}

/// State of the built-in action bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterState {
    pub done_active: bool,
    pub reset_active: bool,
    pub hidden: bool,
}

/// One crop session over a single image.
pub struct Cropper<P> {
    uri: String,
    config: CropperConfig,
    provider: P,
    container: Option<Rect>,
    previous_size: Option<Size>,
    original_image_scale: f64,
    crop_box: CropBox,
    image: ImageView,
    ready: bool,
    footer: FooterState,
    events: VecDeque<CropperEvent>,
}

impl<P: ImageSizeProvider> Cropper<P> {
    pub fn new(uri: impl Into<String>, config: CropperConfig, provider: P) -> Self {
        let crop_box = CropBox::new(config.locks_aspect_ratio(), config.screen);
        let image = ImageView::new(config.effective_scale_max());
        let footer = FooterState {
            hidden: config.hide_footer,
            ..FooterState::default()
        };

        Self {
            uri: uri.into(),
            config,
            provider,
            container: None,
            previous_size: None,
            original_image_scale: 1.0,
            crop_box,
            image,
            ready: false,
            footer,
            events: VecDeque::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    /// True once an initialization succeeded.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn container(&self) -> Option<Rect> {
        self.container
    }

    pub fn original_image_scale(&self) -> f64 {
        self.original_image_scale
    }

    pub fn crop_box(&self) -> &CropBox {
        &self.crop_box
    }

    pub fn image(&self) -> &ImageView {
        &self.image
    }

    pub fn footer_state(&self) -> FooterState {
        self.footer
    }

    pub fn overlay(&self) -> Overlay {
        Overlay::from_crop_box(&self.crop_box, self.config.rounded)
    }

    pub fn image_transform(&self) -> ImageTransform {
        self.image.transform()
    }

    /// Current crop in source pixels, without waiting for transitions.
    pub fn crop_area(&self) -> Option<Rect> {
        self.ready
            .then(|| self.image.crop_area().scaled_down(self.original_image_scale))
    }

    pub fn drain_events(&mut self) -> Vec<CropperEvent> {
        self.events.drain(..).collect()
    }

    /// Container measured. The first non-empty layout starts the session; a
    /// later call that changes both dimensions is a rotation and re-fits the
    /// crop box. Empty layouts (hosts often report 0x0 before the first
    /// real measurement) are ignored.
    pub fn on_container_layout(&mut self, layout: Rect) {
        let size = layout.size();
        if !(size.width > 0.0 && size.height > 0.0) {
            debug!(width = size.width, height = size.height, "container not measured yet");
            return;
        }

        let Some(previous) = self.previous_size else {
            self.previous_size = Some(size);
            self.container = Some(layout);
            self.init_cropper();
            return;
        };

        if size.width != previous.width && size.height != previous.height {
            debug!(width = size.width, height = size.height, "container rotated");
            self.previous_size = Some(size);
            self.container = Some(layout);

            if self.ready {
                let notice = self
                    .crop_box
                    .update_cropper_to_fit_inside_container(layout);
                self.route_crop_box(notice);
            }
        }
    }

    /// (Re)build the crop box and image layout for the current container.
    ///
    /// Failures are logged and leave the session unstarted.
    pub fn init_cropper(&mut self) {
        if let Err(err) = self.try_init_cropper() {
            error!(uri = %self.uri, error = %err, "cropper initialization failed");
            self.ready = false;
        }
    }

    fn try_init_cropper(&mut self) -> Result<(), CropperError> {
        let container = self.container.ok_or(CropperError::ContainerNotMeasured)?;
        if !(container.width > 0.0 && container.height > 0.0) {
            return Err(CropperError::ContainerNotMeasured);
        }

        let image_size = self.provider.image_size(&self.uri)?;
        if image_size.width == 0 || image_size.height == 0 {
            return Err(CropperError::InvalidImageSize {
                width: image_size.width,
                height: image_size.height,
            });
        }
        let natural = image_size.to_size();

        let ratio = self.config.target_ratio(natural.aspect_ratio());
        let shaped = create_aspect_ratio_rectangle(container.width, container.height, ratio);

        let crop_size = resize(
            container.width,
            container.height,
            shaped.width,
            shaped.height,
            ResizeMode::Contain,
        );
        let crop_x = (container.width - crop_size.width) / 2.0;
        let crop_y = (container.height - crop_size.height) / 2.0;
        let crop_rect = Rect::new(crop_x, crop_y, crop_size.width, crop_size.height);

        self.crop_box.reset_to(crop_rect.to_edges(), container);
        self.image.set_crop_box_layout(crop_rect);

        let resized_image = resize(
            crop_size.width,
            crop_size.height,
            natural.width,
            natural.height,
            ResizeMode::Cover,
        );
        self.original_image_scale = resized_image.scale;

        let image_x = (container.width - resized_image.width) / 2.0;
        let image_y = (container.height - resized_image.height) / 2.0;
        let image_rect = Rect::new(image_x, image_y, resized_image.width, resized_image.height);

        self.crop_box.set_image_layout(Edges::from(image_rect));
        self.image.reset_to(image_rect, 1.0);

        debug!(
            crop = ?crop_rect,
            image = ?image_rect,
            original_image_scale = self.original_image_scale,
            "cropper initialized"
        );
        self.ready = true;
        Ok(())
    }

    pub fn crop_box_gesture(&mut self, handle: Handle, event: &GestureEvent) {
        if !self.ready {
            return;
        }
        if let Some(notice) = self.crop_box.handle_gesture(handle, event) {
            self.route_crop_box(notice);
        }
    }

    pub fn pan_gesture(&mut self, event: &GestureEvent) {
        if !self.ready {
            return;
        }
        if let Some(notice) = self.image.handle_pan(event) {
            self.route_image(notice);
        }
    }

    pub fn pinch_gesture(&mut self, event: &GestureEvent) {
        if !self.ready {
            return;
        }
        if let Some(notice) = self.image.handle_pinch(event) {
            self.route_image(notice);
        }
    }

    /// Advance every transition and the settle timer by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if !self.ready {
            return;
        }
        // Image first, so a compensation started by a settle below begins
        // with the next tick.
        if let Some(notice) = self.image.tick(dt) {
            self.route_image(notice);
        }
        if let Some(notice) = self.crop_box.tick(dt) {
            self.route_crop_box(notice);
        }
    }

    /// True when nothing is in flight and no settle is pending.
    pub fn is_settled(&self) -> bool {
        self.crop_box.is_settled() && !self.crop_box.settle_pending() && self.image.is_settled()
    }

    /// Fast-forward the pending settle and every transition.
    pub fn finish_all(&mut self) {
        for _ in 0..SETTLE_ROUNDS {
            if self.is_settled() {
                break;
            }
            if let Some(notice) = self.crop_box.finish_all() {
                self.route_crop_box(notice);
            }
            for notice in self.image.finish_all() {
                self.route_image(notice);
            }
        }
    }

    /// Settle everything and report the crop in source pixels.
    pub fn done(&mut self) {
        if !self.ready {
            return;
        }
        self.finish_all();

        let area = self
            .image
            .crop_area()
            .scaled_down(self.original_image_scale);
        debug!(crop = ?area, "crop done");
        self.events.push_back(CropperEvent::Done(area));
    }

    /// Start over from the initial layout.
    pub fn reset(&mut self) {
        self.footer.reset_active = false;
        self.footer.done_active = false;

        if self.container.is_some() {
            self.init_cropper();
        }
        self.events.push_back(CropperEvent::Reset);
    }

    pub fn cancel(&mut self) {
        self.events.push_back(CropperEvent::Cancelled);
    }

    fn route_crop_box(&mut self, notice: CropBoxNotice) {
        match notice {
            CropBoxNotice::BoundsChanged(bounds) => {
                self.image.set_crop_box_layout(bounds);
            }
            CropBoxNotice::Fitted(fit) => {
                self.image.set_crop_box_layout(fit.rect());
                self.image.pinch_to_zoom(&fit);
                self.on_cropper_was_changed();
            }
        }
    }

    fn route_image(&mut self, notice: ImageNotice) {
        match notice {
            ImageNotice::Moved => self.crop_box.hold_animations(),
            ImageNotice::Settled(edges) => {
                self.crop_box.set_image_layout(edges);
                self.on_cropper_was_changed();
            }
        }
    }

    fn on_cropper_was_changed(&mut self) {
        self.footer.done_active = true;
        self.footer.reset_active = true;
        self.events.push_back(CropperEvent::Changed);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::ScreenMetrics;
    use crate::types::ImageSize;
    use proptest::prelude::*;

    proptest! {
        /// Property: Without gestures, done reports the initially framed source region.
        #[test]
        fn prop_noop_round_trip(
            image_width in 50u32..6000,
            image_height in 50u32..6000,
            container_width in 200.0f64..1200.0,
            container_height in 200.0f64..1200.0,
            ratio in prop::option::of(0.3f64..3.0),
        ) {
            let config = CropperConfig {
                aspect_ratio: ratio.map_or(crate::config::AspectRatio::Free, crate::config::AspectRatio::Fixed),
                screen: ScreenMetrics::new(container_width, container_height, 0.0),
                ..CropperConfig::default()
            };
            let provider = move |_: &str| Ok::<_, CropperError>(ImageSize::new(image_width, image_height));
            let mut cropper = Cropper::new("file://p.jpg", config, provider);
            cropper.on_container_layout(Rect::new(0.0, 0.0, container_width, container_height));
            prop_assert!(cropper.is_ready());

            let expected = cropper
                .crop_box()
                .current_bounds();
            let image = cropper.image().layout();
            let scale = cropper.original_image_scale();
            let expected = Rect::new(
                (expected.x - image.x) / scale,
                (expected.y - image.y) / scale,
                expected.width / scale,
                expected.height / scale,
            );

            cropper.done();
            let events = cropper.drain_events();
            prop_assert_eq!(events.len(), 1);
            let CropperEvent::Done(rect) = events[0] else {
                return Err(TestCaseError::fail("expected a done event"));
            };

            let tolerance = 1e-6 * (image_width.max(image_height) as f64);
            prop_assert!((rect.x - expected.x).abs() < tolerance);
            prop_assert!((rect.y - expected.y).abs() < tolerance);
            prop_assert!((rect.width - expected.width).abs() < tolerance);
            prop_assert!((rect.height - expected.height).abs() < tolerance);
            prop_assert!(rect.x >= -tolerance && rect.y >= -tolerance);
            prop_assert!(rect.right() <= image_width as f64 + tolerance);
            prop_assert!(rect.bottom() <= image_height as f64 + tolerance);
        }
    }
}
