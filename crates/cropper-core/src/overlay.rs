//! Per-frame presentation values derived from the crop box.
//!
//! Nothing here is stored: the host calls [`Overlay::from_crop_box`] after each
//! tick and draws the result. All values come from display edges so they
//! follow running transitions.

use serde::{Deserialize, Serialize};

use crate::config::{BORDER_WIDTH, CORNER_SIZE};
use crate::crop_box::CropBox;
use crate::gesture::Handle;
use crate::types::{Edges, Rect};

/// Backdrop opacity while the crop box is at rest.
const BACKDROP_OPAQUE: f64 = 1.0;

/// Backdrop opacity while a handle is dragged.
const BACKDROP_DIMMED: f64 = 0.6;

/// Hit area of one handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleRect {
    pub handle: Handle,
    pub rect: Rect,
    pub enabled: bool,
}

/// Everything the host draws on top of the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub crop_box: Rect,
    /// Shaded areas above, below, left and right of the crop box.
    pub backdrop: [Rect; 4],
    pub backdrop_opacity: f64,
    /// Rule-of-thirds line positions; empty while hidden.
    pub grid_x: Vec<f64>,
    pub grid_y: Vec<f64>,
    pub handles: Vec<HandleRect>,
    pub rounded: bool,
}

impl Overlay {
    pub fn from_crop_box(crop_box: &CropBox, rounded: bool) -> Self {
        let edges = crop_box.display_edges();
        let container = crop_box.container();

        let (grid_x, grid_y) = if crop_box.grid_visible() {
            thirds(edges)
        } else {
            (Vec::new(), Vec::new())
        };

        let handles = crop_box
            .available_handles()
            .map(|handle| HandleRect {
                handle,
                rect: handle_rect(handle, edges),
                enabled: crop_box.is_enabled(handle),
            })
            .collect();

        Self {
            crop_box: edges.to_rect(),
            backdrop: backdrop_rects(edges, container),
            backdrop_opacity: backdrop_opacity(crop_box.backdrop_progress()),
            grid_x,
            grid_y,
            handles,
            rounded,
        }
    }
}

/// Map fade progress `[0, 1]` onto opacity `[1, 0.6]`.
pub fn backdrop_opacity(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    BACKDROP_OPAQUE + (BACKDROP_DIMMED - BACKDROP_OPAQUE) * progress
}

fn backdrop_rects(edges: Edges, container: Rect) -> [Rect; 4] {
    let width = container.width;
    let height = container.height;
    let box_height = (edges.bottom - edges.top).max(0.0);

    [
        Rect::new(0.0, 0.0, width, edges.top.max(0.0)),
        Rect::new(0.0, edges.bottom, width, (height - edges.bottom).max(0.0)),
        Rect::new(0.0, edges.top, edges.left.max(0.0), box_height),
        Rect::new(edges.right, edges.top, (width - edges.right).max(0.0), box_height),
    ]
}

fn thirds(edges: Edges) -> (Vec<f64>, Vec<f64>) {
    let step_x = (edges.width() - BORDER_WIDTH) / 3.0;
    let step_y = (edges.height() - BORDER_WIDTH) / 3.0;
    (
        vec![edges.left + step_x, edges.left + step_x * 2.0],
        vec![edges.top + step_y, edges.top + step_y * 2.0],
    )
}

/// Corner squares straddle the frame border; side bars sit centered on their
/// edge.
fn handle_rect(handle: Handle, edges: Edges) -> Rect {
    let near_left = edges.left - BORDER_WIDTH;
    let near_top = edges.top - BORDER_WIDTH;
    let far_right = edges.right - (CORNER_SIZE - BORDER_WIDTH);
    let far_bottom = edges.bottom - (CORNER_SIZE - BORDER_WIDTH);
    let middle_x = edges.left + edges.width() / 2.0 - CORNER_SIZE / 2.0;
    let middle_y = edges.top + edges.height() / 2.0 - CORNER_SIZE / 2.0;

    let (x, y) = match handle {
        Handle::TopLeft => (near_left, near_top),
        Handle::TopRight => (far_right, near_top),
        Handle::BottomLeft => (near_left, far_bottom),
        Handle::BottomRight => (far_right, far_bottom),
        Handle::Top => (middle_x, near_top),
        Handle::Bottom => (middle_x, far_bottom),
        Handle::Left => (near_left, middle_y),
        Handle::Right => (far_right, middle_y),
        Handle::None => return Rect::default(),
    };

    Rect::new(x, y, CORNER_SIZE, CORNER_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScreenMetrics;
    use crate::gesture::{GestureEvent, GestureState};

    fn crop_box(locked: bool) -> CropBox {
        let mut crop_box = CropBox::new(locked, ScreenMetrics::new(400.0, 800.0, 0.0));
        crop_box.reset_to(
            Edges::new(200.0, 50.0, 350.0, 500.0),
            Rect::new(0.0, 0.0, 400.0, 800.0),
        );
        crop_box.set_image_layout(Edges::new(0.0, 0.0, 400.0, 800.0));
        crop_box
    }

    #[test]
    fn test_backdrop_opacity_mapping() {
        assert_eq!(backdrop_opacity(0.0), 1.0);
        assert!((backdrop_opacity(1.0) - 0.6).abs() < 1e-12);
        assert!((backdrop_opacity(0.5) - 0.8).abs() < 1e-12);
        assert_eq!(backdrop_opacity(-3.0), 1.0);
    }

    #[test]
    fn test_backdrop_surrounds_crop_box() {
        let overlay = Overlay::from_crop_box(&crop_box(false), false);

        assert_eq!(overlay.crop_box, Rect::new(50.0, 200.0, 300.0, 300.0));
        assert_eq!(overlay.backdrop[0], Rect::new(0.0, 0.0, 400.0, 200.0));
        assert_eq!(overlay.backdrop[1], Rect::new(0.0, 500.0, 400.0, 300.0));
        assert_eq!(overlay.backdrop[2], Rect::new(0.0, 200.0, 50.0, 300.0));
        assert_eq!(overlay.backdrop[3], Rect::new(350.0, 200.0, 50.0, 300.0));
        assert_eq!(overlay.backdrop_opacity, 1.0);
    }

    #[test]
    fn test_handles_follow_lock_mode() {
        assert_eq!(Overlay::from_crop_box(&crop_box(false), false).handles.len(), 8);

        let locked = Overlay::from_crop_box(&crop_box(true), true);
        assert_eq!(locked.handles.len(), 4);
        assert!(locked.rounded);
    }

    #[test]
    fn test_handle_rects() {
        let edges = Edges::new(200.0, 50.0, 350.0, 500.0);

        assert_eq!(
            handle_rect(Handle::TopLeft, edges),
            Rect::new(48.0, 198.0, 22.0, 22.0)
        );
        assert_eq!(
            handle_rect(Handle::BottomRight, edges),
            Rect::new(330.0, 480.0, 22.0, 22.0)
        );
        assert_eq!(
            handle_rect(Handle::Top, edges),
            Rect::new(189.0, 198.0, 22.0, 22.0)
        );
        assert_eq!(
            handle_rect(Handle::Right, edges),
            Rect::new(330.0, 339.0, 22.0, 22.0)
        );
    }

    #[test]
    fn test_grid_only_while_dragging() {
        let mut crop_box = crop_box(false);
        let overlay = Overlay::from_crop_box(&crop_box, false);
        assert!(overlay.grid_x.is_empty());

        crop_box.handle_gesture(Handle::Top, &GestureEvent::pan(GestureState::Began, 0.0, 0.0));
        let overlay = Overlay::from_crop_box(&crop_box, false);

        // (300 - border) / 3 apart, starting at the left edge.
        assert_eq!(overlay.grid_x.len(), 2);
        assert!((overlay.grid_x[0] - (50.0 + 298.0 / 3.0)).abs() < 1e-9);
        assert!((overlay.grid_x[1] - (50.0 + 596.0 / 3.0)).abs() < 1e-9);
        assert_eq!(overlay.grid_y.len(), 2);
        assert!(overlay
            .handles
            .iter()
            .all(|h| h.enabled == (h.handle == Handle::Top)));
    }
}
