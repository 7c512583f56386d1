//! Core layout types shared by the crop box, the image and the orchestrator.
//!
//! Two equivalent representations of an axis-aligned box are used:
//!
//! - [`Rect`] (corner + size) for the container, image and crop-area layouts
//! - [`Edges`] (top/left/right/bottom) for crop-box math, where every edge is
//!   dragged independently
//!
//! Both are plain `f64` values in display units; conversions between them are
//! exact up to floating-point rounding.

use serde::{Deserialize, Serialize};

/// A rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Convert to the edges representation.
    pub fn to_edges(&self) -> Edges {
        Edges {
            top: self.y,
            left: self.x,
            right: self.right(),
            bottom: self.bottom(),
        }
    }

    /// Divide every coordinate and dimension by `factor`.
    pub fn scaled_down(&self, factor: f64) -> Rect {
        Rect {
            x: self.x / factor,
            y: self.y / factor,
            width: self.width / factor,
            height: self.height / factor,
        }
    }

    /// Returns true if `other` lies fully inside this rectangle, allowing
    /// `epsilon` of slack on every side.
    pub fn contains_rect(&self, other: &Rect, epsilon: f64) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.right() <= self.right() + epsilon
            && other.bottom() <= self.bottom() + epsilon
    }
}

/// The four edges of a box, as absolute positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Edges {
    pub fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Convert to the corner + size representation.
    pub fn to_rect(&self) -> Rect {
        Rect {
            x: self.left,
            y: self.top,
            width: self.width(),
            height: self.height(),
        }
    }
}

impl From<Rect> for Edges {
    fn from(rect: Rect) -> Self {
        rect.to_edges()
    }
}

impl From<Edges> for Rect {
    fn from(edges: Edges) -> Self {
        edges.to_rect()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// A 2D point or offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Natural pixel dimensions of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges_round_trip() {
        let rect = Rect::new(10.0, 20.0, 300.0, 150.0);
        let edges = rect.to_edges();

        assert_eq!(edges, Edges::new(20.0, 10.0, 310.0, 170.0));
        assert_eq!(edges.to_rect(), rect);
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(0.0, 100.0, 200.0, 50.0);
        assert_eq!(rect.center(), Point::new(100.0, 125.0));
    }

    #[test]
    fn test_scaled_down() {
        let rect = Rect::new(10.0, 20.0, 40.0, 80.0).scaled_down(0.5);
        assert_eq!(rect, Rect::new(20.0, 40.0, 80.0, 160.0));
    }

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);

        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 50.0, 50.0), 0.0));
        assert!(outer.contains_rect(&outer, 0.0));
        assert!(!outer.contains_rect(&Rect::new(-1.0, 0.0, 50.0, 50.0), 0.0));
        assert!(outer.contains_rect(&Rect::new(-1e-9, 0.0, 50.0, 50.0), 1e-6));
    }
}
