//! Gesture input delivered by the host's recognizers.
//!
//! Recognition itself happens outside the engine. The host forwards every
//! state change and movement as a [`GestureEvent`] carrying cumulative
//! readings since the gesture began.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureState {
    #[default]
    Undetermined,
    Began,
    Active,
    End,
    Cancelled,
    Failed,
}

/// One recognizer event.
///
/// Pan recognizers fill the translation and velocity fields, pinch
/// recognizers the scale and focal fields. Unused fields stay at their
/// defaults (`scale` defaults to 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureEvent {
    pub state: GestureState,
    pub translation_x: f64,
    pub translation_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub scale: f64,
    pub focal_x: f64,
    pub focal_y: f64,
}

impl Default for GestureEvent {
    fn default() -> Self {
        Self {
            state: GestureState::Undetermined,
            translation_x: 0.0,
            translation_y: 0.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            scale: 1.0,
            focal_x: 0.0,
            focal_y: 0.0,
        }
    }
}

impl GestureEvent {
    /// A pan event with a cumulative translation.
    pub fn pan(state: GestureState, translation_x: f64, translation_y: f64) -> Self {
        Self {
            state,
            translation_x,
            translation_y,
            ..Self::default()
        }
    }

    /// Attach the release velocity of a pan.
    pub fn with_velocity(mut self, velocity_x: f64, velocity_y: f64) -> Self {
        self.velocity_x = velocity_x;
        self.velocity_y = velocity_y;
        self
    }

    /// A pinch event with a cumulative scale around a focal point.
    pub fn pinch(state: GestureState, scale: f64, focal_x: f64, focal_y: f64) -> Self {
        Self {
            state,
            scale,
            focal_x,
            focal_y,
            ..Self::default()
        }
    }
}

/// The draggable zones of the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Handle {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Left,
    Right,
    Bottom,
}

impl Handle {
    /// Every interactive handle.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Left,
        Handle::Right,
        Handle::Bottom,
    ];

    /// Corner handles only.
    pub const CORNERS: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    /// Single-edge bar handles.
    pub fn is_side(self) -> bool {
        matches!(
            self,
            Handle::Top | Handle::Left | Handle::Right | Handle::Bottom
        )
    }

    /// Which edges move when this handle is dragged.
    pub fn moving_edges(self) -> MovingEdges {
        let (top, left, right, bottom) = match self {
            Handle::None => (false, false, false, false),
            Handle::TopLeft => (true, true, false, false),
            Handle::TopRight => (true, false, true, false),
            Handle::BottomLeft => (false, true, false, true),
            Handle::BottomRight => (false, false, true, true),
            Handle::Top => (true, false, false, false),
            Handle::Left => (false, true, false, false),
            Handle::Right => (false, false, true, false),
            Handle::Bottom => (false, false, false, true),
        };
        MovingEdges {
            top,
            left,
            right,
            bottom,
        }
    }
}

/// Flags naming the edges a drag moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovingEdges {
    pub top: bool,
    pub left: bool,
    pub right: bool,
    pub bottom: bool,
}
