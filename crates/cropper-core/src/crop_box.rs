//! Crop-box state machine.
//!
//! The crop box owns four draggable edges, the active handle and the size
//! constraints. Handle drags arrive as [`GestureEvent`]s and are turned into
//! clamped edge positions; once a drag ends and the box has been left alone
//! for [`SETTLE_DELAY`], it is re-fitted into the container.
//!
//! # State Machine
//!
//! ```text
//! Idle --Began(h)--> Dragging(h) --End/Cancelled/Failed--> Idle
//! ```
//!
//! Only one handle drags at a time: a handle is enabled while no other handle
//! is active. Side handles exist only while the aspect ratio is unlocked.
//!
//! # Invariants
//!
//! 1. Outside a drag, the logical edges keep at least the minimum crop size
//!    and stay within the image envelope (as far as the clamp ranges allow).
//! 2. While dragging, the display edges get the clamped positions and the
//!    logical edges accumulate the raw candidates; `End` commits the clamp.
//! 3. The crop box never touches the image directly. Everything the image
//!    needs is returned as a [`CropBoxNotice`].

use std::time::Duration;

use tracing::{debug, error};

use crate::animation::{Easing, Motion, SharedValue, Tick};
use crate::config::{
    ScreenMetrics, BACKDROP_FADE_IN, BACKDROP_FADE_OUT, SETTLE_DELAY, SETTLE_DURATION,
    SETTLE_EASING,
};
use crate::frame::PanTranslationFrame;
use crate::geometry::{clamp, min_cropper_size, resize, ResizeMode};
use crate::gesture::{GestureEvent, GestureState, Handle, MovingEdges};
use crate::timer::SettleTimer;
use crate::types::{Edges, Rect, Size};

/// Span [`CropBox::finish_all`] fast-forwards by; longer than any transition.
const FINISH_HORIZON: Duration = Duration::from_secs(60);

/// Allowed interval for one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    pub fn apply(&self, value: f64) -> f64 {
        clamp(value, self.min, self.max)
    }
}

/// Allowed intervals for every edge during a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClampedValues {
    pub top: ClampRange,
    pub left: ClampRange,
    pub right: ClampRange,
    pub bottom: ClampRange,
}

impl ClampedValues {
    fn range(&self, edge: Edge) -> ClampRange {
        match edge {
            Edge::Top => self.top,
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
        }
    }
}

/// Where a settled crop box moves, and how the image has to follow.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CropBoxFit {
    /// New crop-box rectangle, centered in the container.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Growth factor from the current box to the fitted one.
    pub scale: f64,
    /// Center of the box before the fit.
    pub focal_x: f64,
    pub focal_y: f64,
    /// Offset from the old center to the new one.
    pub translate_x: f64,
    pub translate_y: f64,
}

impl CropBoxFit {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// What the crop box reports to its owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropBoxNotice {
    /// The logical crop bounds changed (drag released).
    BoundsChanged(Rect),
    /// The box is being re-fitted into the container.
    Fitted(CropBoxFit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Left,
    Right,
    Bottom,
}

/// Crop rectangle state and handle-drag reducer.
#[derive(Debug, Clone)]
pub struct CropBox {
    top: SharedValue,
    left: SharedValue,
    right: SharedValue,
    bottom: SharedValue,
    active_handle: Handle,
    locked: bool,
    aspect_ratio: f64,
    min_size: Size,
    initial_size: Size,
    image_layout: Edges,
    container: Rect,
    screen: ScreenMetrics,
    frames: PanTranslationFrame,
    settle: SettleTimer,
    /// Backdrop fade progress: 0 opaque, 1 see-through.
    backdrop: SharedValue,
    grid_visible: bool,
    initialized: bool,
}

impl CropBox {
    pub fn new(locked: bool, screen: ScreenMetrics) -> Self {
        Self {
            top: SharedValue::new(0.0),
            left: SharedValue::new(0.0),
            right: SharedValue::new(0.0),
            bottom: SharedValue::new(0.0),
            active_handle: Handle::None,
            locked,
            aspect_ratio: 1.0,
            min_size: min_cropper_size(screen, 1.0),
            initial_size: Size::default(),
            image_layout: Edges::default(),
            container: Rect::default(),
            screen,
            frames: PanTranslationFrame::new(),
            settle: SettleTimer::new(SETTLE_DELAY),
            backdrop: SharedValue::new(0.0),
            grid_visible: false,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn active_handle(&self) -> Handle {
        self.active_handle
    }

    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn image_layout(&self) -> Edges {
        self.image_layout
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    /// Backdrop fade progress in `[0, 1]`.
    pub fn backdrop_progress(&self) -> f64 {
        self.backdrop.display()
    }

    pub fn settle_pending(&self) -> bool {
        self.settle.is_pending()
    }

    /// Logical edges.
    pub fn edges(&self) -> Edges {
        Edges::new(
            self.top.value(),
            self.left.value(),
            self.right.value(),
            self.bottom.value(),
        )
    }

    /// Edges as currently presented.
    pub fn display_edges(&self) -> Edges {
        Edges::new(
            self.top.display(),
            self.left.display(),
            self.right.display(),
            self.bottom.display(),
        )
    }

    /// True when no edge transition is in flight.
    pub fn is_settled(&self) -> bool {
        [&self.top, &self.left, &self.right, &self.bottom]
            .iter()
            .all(|edge| edge.is_settled())
    }

    /// Logical crop bounds.
    pub fn current_bounds(&self) -> Rect {
        self.edges().to_rect()
    }

    /// Handles that exist in the current mode.
    pub fn available_handles(&self) -> impl Iterator<Item = Handle> + '_ {
        Handle::ALL
            .into_iter()
            .filter(move |handle| self.is_available(*handle))
    }

    pub fn is_available(&self, handle: Handle) -> bool {
        handle.is_corner() || (handle.is_side() && !self.locked)
    }

    /// A handle is enabled unless a different handle is mid-drag.
    pub fn is_enabled(&self, handle: Handle) -> bool {
        self.active_handle == Handle::None || self.active_handle == handle
    }

    /// Re-initialize to explicit edges inside `container`.
    pub fn reset_to(&mut self, edges: Edges, container: Rect) {
        self.container = container;

        self.top.set(edges.top);
        self.left.set(edges.left);
        self.right.set(edges.right);
        self.bottom.set(edges.bottom);

        if self.locked {
            self.aspect_ratio = edges.width() / edges.height();
        }

        self.min_size = min_cropper_size(self.screen, self.aspect_ratio);
        self.initial_size = Size::new(edges.width(), edges.height());

        self.active_handle = Handle::None;
        self.frames.reset();
        self.settle.clear();
        self.backdrop.set(0.0);
        self.grid_visible = false;
        self.initialized = true;
    }

    /// Update the drag envelope, clipped to the container.
    pub fn set_image_layout(&mut self, layout: Edges) {
        self.image_layout = Edges {
            top: layout.top.max(0.0),
            left: layout.left.max(0.0),
            right: layout.right.min(self.container.width),
            bottom: layout.bottom.min(self.container.height),
        };
    }

    /// Postpone a pending settle (the image is being moved).
    pub fn hold_animations(&mut self) {
        self.settle.restart();
    }

    /// Adopt a new container (e.g. rotation) and re-fit immediately.
    pub fn update_cropper_to_fit_inside_container(&mut self, container: Rect) -> CropBoxNotice {
        self.container = container;
        self.min_size = min_cropper_size(self.screen, self.aspect_ratio);
        CropBoxNotice::Fitted(self.scale_rectangle_and_fit_into_position())
    }

    /// Feed one recognizer event for `handle`.
    ///
    /// Events for handles that are unavailable or disabled are ignored.
    pub fn handle_gesture(&mut self, handle: Handle, event: &GestureEvent) -> Option<CropBoxNotice> {
        if !self.is_available(handle) || !self.is_enabled(handle) {
            return None;
        }

        match event.state {
            GestureState::Undetermined => None,
            GestureState::Began => {
                self.frames.reset();
                self.active_handle = handle;
                self.on_drag_start();
                None
            }
            GestureState::Active => {
                if self.active_handle == Handle::None {
                    self.active_handle = handle;
                    self.on_drag_start();
                }
                for (edge, next, clamped) in self.drag_candidates(handle, event) {
                    let value = self.edge_mut(edge);
                    value.set_display(clamped);
                    value.set_value(next);
                }
                None
            }
            GestureState::End => {
                for (edge, _, clamped) in self.drag_candidates(handle, event) {
                    self.edge_mut(edge).set(clamped);
                }
                self.frames.reset();
                Some(self.on_drag_end())
            }
            GestureState::Cancelled | GestureState::Failed => {
                self.frames.reset();
                self.on_drag_aborted(handle);
                None
            }
        }
    }

    /// Clamp ranges for the edges that `moving` names.
    ///
    /// Unlocked boxes only keep the minimum size and the image envelope.
    /// Locked boxes additionally derive the other dimension from the moving
    /// one so that the initial ratio is preserved.
    pub fn clamped_values(&self, moving: MovingEdges) -> ClampedValues {
        let top = self.top.value();
        let left = self.left.value();
        let right = self.right.value();
        let bottom = self.bottom.value();
        let image = self.image_layout;
        let min = self.min_size;

        if !self.locked {
            return ClampedValues {
                left: ClampRange {
                    min: image.left,
                    max: right - min.width,
                },
                top: ClampRange {
                    min: image.top,
                    max: bottom - min.height,
                },
                bottom: ClampRange {
                    min: top + min.height,
                    max: image.bottom,
                },
                right: ClampRange {
                    min: left + min.width,
                    max: image.right,
                },
            };
        }

        let min_top = image.top.max(top);
        let min_left = image.left.max(left);
        let min_right = image.right.min(right);
        let min_bottom = image.bottom.min(bottom);

        let mut current_width = 0.0;
        let mut current_height = 0.0;

        if moving.top {
            current_height = bottom - min_top;
        }
        if moving.bottom {
            current_height = min_bottom - top;
        }
        if moving.left {
            current_width = right - min_left;
        }
        if moving.right {
            current_width = min_right - left;
        }

        if current_width == 0.0 || current_height == 0.0 {
            error!(
                current_width,
                current_height,
                ?moving,
                "locked crop box clamp computed a zero dimension"
            );
        }

        let resized_width = ((current_height * self.initial_size.width)
            / self.initial_size.height)
            .max(min.width);
        let resized_height = ((current_width * self.initial_size.height)
            / self.initial_size.width)
            .max(min.height);

        ClampedValues {
            left: ClampRange {
                min: (right - resized_width).max(image.left),
                max: right - min.width,
            },
            top: ClampRange {
                min: (bottom - resized_height).max(image.top),
                max: bottom - min.height,
            },
            bottom: ClampRange {
                min: top + min.height,
                max: (top + resized_height).max(top + min.height).min(image.bottom),
            },
            right: ClampRange {
                min: left + min.width,
                max: (left + resized_width).max(left + min.width).min(image.right),
            },
        }
    }

    /// Center the current box in the container with a `contain` fit.
    pub fn next_bounds(&self) -> CropBoxFit {
        let bounds = self.current_bounds();

        let resized = resize(
            self.container.width,
            self.container.height,
            bounds.width,
            bounds.height,
            ResizeMode::Contain,
        );

        let x = (self.container.width - resized.width) / 2.0;
        let y = (self.container.height - resized.height) / 2.0;

        let focal = bounds.center();

        CropBoxFit {
            x,
            y,
            width: resized.width,
            height: resized.height,
            scale: resized.scale,
            focal_x: focal.x,
            focal_y: focal.y,
            translate_x: x + resized.width / 2.0 - focal.x,
            translate_y: y + resized.height / 2.0 - focal.y,
        }
    }

    /// Advance transitions and the settle timer.
    pub fn tick(&mut self, dt: Duration) -> Option<CropBoxNotice> {
        for edge in [Edge::Top, Edge::Left, Edge::Right, Edge::Bottom] {
            let value = self.edge_mut(edge);
            if let Tick::Finished(end) = value.tick(dt) {
                value.set_value(end);
            }
        }
        if let Tick::Finished(end) = self.backdrop.tick(dt) {
            self.backdrop.set_value(end);
        }

        if self.settle.tick(dt) {
            return Some(self.settle_now());
        }
        None
    }

    /// Fire a pending settle and run every transition to its end.
    pub fn finish_all(&mut self) -> Option<CropBoxNotice> {
        let notice = if self.settle.fire_now() {
            Some(self.settle_now())
        } else {
            None
        };
        self.tick(FINISH_HORIZON);
        notice
    }

    fn edge_mut(&mut self, edge: Edge) -> &mut SharedValue {
        match edge {
            Edge::Top => &mut self.top,
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
        }
    }

    fn edge(&self, edge: Edge) -> &SharedValue {
        match edge {
            Edge::Top => &self.top,
            Edge::Left => &self.left,
            Edge::Right => &self.right,
            Edge::Bottom => &self.bottom,
        }
    }

    /// Candidate `(edge, raw, clamped)` positions for one drag event.
    fn drag_candidates(&mut self, handle: Handle, event: &GestureEvent) -> Vec<(Edge, f64, f64)> {
        let frames = self.frames.update(event.translation_x, event.translation_y);
        let moving = handle.moving_edges();

        let (dx, dy) = if handle.is_corner() && self.locked {
            // Corners on the main diagonal grow both axes together, the
            // anti-diagonal ones in opposite directions.
            let sign = match handle {
                Handle::TopLeft | Handle::BottomRight => 1.0,
                _ => -1.0,
            };
            if event.translation_x.abs() > event.translation_y.abs() {
                (frames.frames_x, sign * frames.frames_x / self.aspect_ratio)
            } else {
                (sign * frames.frames_y * self.aspect_ratio, frames.frames_y)
            }
        } else {
            (frames.frames_x, frames.frames_y)
        };

        let horizontal = if moving.left {
            Some(Edge::Left)
        } else if moving.right {
            Some(Edge::Right)
        } else {
            None
        };
        let vertical = if moving.top {
            Some(Edge::Top)
        } else if moving.bottom {
            Some(Edge::Bottom)
        } else {
            None
        };

        let ranges = self.clamped_values(moving);

        [(horizontal, dx), (vertical, dy)]
            .into_iter()
            .filter_map(|(edge, delta)| {
                let edge = edge?;
                let next = self.edge(edge).value() + delta;
                Some((edge, next, ranges.range(edge).apply(next)))
            })
            .collect()
    }

    fn stop_all_animations(&mut self) {
        for edge in [Edge::Top, Edge::Left, Edge::Right, Edge::Bottom] {
            self.edge_mut(edge).stop();
        }
    }

    fn on_drag_start(&mut self) {
        self.backdrop
            .animate(Motion::timing(1.0, BACKDROP_FADE_IN, Easing::Linear));
        self.settle.clear();
        self.stop_all_animations();
        self.grid_visible = true;
    }

    fn on_drag_end(&mut self) -> CropBoxNotice {
        self.active_handle = Handle::None;
        self.settle.start();
        CropBoxNotice::BoundsChanged(self.current_bounds())
    }

    fn on_drag_aborted(&mut self, handle: Handle) {
        let moving = handle.moving_edges();
        for (edge, moved) in [
            (Edge::Top, moving.top),
            (Edge::Left, moving.left),
            (Edge::Right, moving.right),
            (Edge::Bottom, moving.bottom),
        ] {
            if moved {
                let value = self.edge_mut(edge);
                let shown = value.display();
                value.set_value(shown);
            }
        }

        self.active_handle = Handle::None;
        self.fade_backdrop_out();
    }

    fn fade_backdrop_out(&mut self) {
        self.backdrop
            .animate(Motion::timing(0.0, BACKDROP_FADE_OUT, Easing::Linear));
        self.grid_visible = false;
    }

    fn settle_now(&mut self) -> CropBoxNotice {
        debug!("crop box settle fired");
        let fit = self.scale_rectangle_and_fit_into_position();
        self.fade_backdrop_out();
        CropBoxNotice::Fitted(fit)
    }

    fn scale_rectangle_and_fit_into_position(&mut self) -> CropBoxFit {
        let fit = self.next_bounds();

        let targets = [
            (Edge::Top, fit.y),
            (Edge::Bottom, fit.y + fit.height),
            (Edge::Left, fit.x),
            (Edge::Right, fit.x + fit.width),
        ];
        for (edge, to) in targets {
            self.edge_mut(edge)
                .animate(Motion::timing(to, SETTLE_DURATION, SETTLE_EASING));
        }

        fit
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
