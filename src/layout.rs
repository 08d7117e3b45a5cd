//! Page geometry shared by the visibility observer and the scroll reveal.
//!
//! All rectangles are in document coordinates (pixels from the top-left of the
//! page); a [`Viewport`] is the window onto the document at a scroll offset.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap of two rectangles.
    ///
    /// Rectangles that only share an edge intersect with a zero-area result,
    /// matching how browsers treat edge-adjacent targets.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left > right || top > bottom {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Grow (positive) or shrink (negative) each side by the margin.
    #[must_use]
    pub fn expand(&self, margin: &RootMargin) -> Rect {
        Rect::new(
            self.x - margin.left,
            self.y - margin.top,
            self.width + margin.left + margin.right,
            self.height + margin.top + margin.bottom,
        )
    }
}

/// Adjustment applied to the viewport bounds before intersection tests
///
/// Follows CSS `rootMargin`: `bottom: -50.0` treats the lowest 50 pixels of
/// the viewport as off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Viewport of the given size scrolled to the top of the page.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn scrolled_to(self, scroll_y: f64) -> Self {
        Self { scroll_y, ..self }
    }

    /// Viewport bounds in document coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Distance from the top of the viewport to the top of `rect`.
    #[must_use]
    pub fn relative_top(&self, rect: &Rect) -> f64 {
        rect.y - self.scroll_y
    }
}

/// Fraction of `target` that lies inside `root`.
///
/// Returns `None` when the two do not intersect at all. A zero-area target
/// that touches the root counts as fully visible.
#[must_use]
pub fn intersection_ratio(target: &Rect, root: &Rect) -> Option<f64> {
    let overlap = target.intersection(root)?;
    let target_area = target.area();

    if target_area <= 0.0 {
        return Some(1.0);
    }

    Some((overlap.area() / target_area).clamp(0.0, 1.0))
}
