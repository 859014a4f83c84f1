//! Geometry utilities shared by hit testing, the factory and the render pass.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest width/height a box may have after a resize.
pub const MIN_BOX_SIZE: f64 = 5.0;

/// Axis-aligned box in surface-local pixels: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Check whether the box has zero area.
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Return the box shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.w, self.h)
    }

    /// Convert to a kurbo rect (for path building).
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

/// Inclusive containment test: edges count as inside.
pub fn point_in_box(point: Point, bbox: &BoundingBox) -> bool {
    bbox.x <= point.x && point.x <= bbox.right() && bbox.y <= point.y && point.y <= bbox.bottom()
}

/// Box spanned by two drag points, normalized so that width and height are non-negative.
pub fn box_from_drag(start: Point, end: Point) -> BoundingBox {
    BoundingBox::new(
        start.x.min(end.x),
        start.y.min(end.y),
        (end.x - start.x).abs(),
        (end.y - start.y).abs(),
    )
}

/// Minimal box containing every point of a path. Empty paths give `None`.
pub fn box_from_path(points: &[Point]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
}
