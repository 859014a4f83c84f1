//! Resize handles and manipulation of the selected annotation.

use crate::annotations::{Annotation, AnnotationId};
use crate::geometry::BoundingBox;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// One of the eight resize handles on a selected annotation's box.
///
/// Declaration order is the hit-test order: corners first, then edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    Ne,
    Sw,
    Se,
    N,
    S,
    E,
    W,
}

impl Handle {
    /// All handles in hit-test order.
    pub const ALL: [Handle; 8] = [
        Handle::Nw,
        Handle::Ne,
        Handle::Sw,
        Handle::Se,
        Handle::N,
        Handle::S,
        Handle::E,
        Handle::W,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::Ne => "ne",
            Handle::Sw => "sw",
            Handle::Se => "se",
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
        }
    }

    /// Handle controls the top edge.
    pub fn north(&self) -> bool {
        matches!(self, Handle::Nw | Handle::Ne | Handle::N)
    }

    /// Handle controls the bottom edge.
    pub fn south(&self) -> bool {
        matches!(self, Handle::Sw | Handle::Se | Handle::S)
    }

    /// Handle controls the right edge.
    pub fn east(&self) -> bool {
        matches!(self, Handle::Ne | Handle::Se | Handle::E)
    }

    /// Handle controls the left edge.
    pub fn west(&self) -> bool {
        matches!(self, Handle::Nw | Handle::Sw | Handle::W)
    }

    /// Center of this handle on `bbox`.
    pub fn position(&self, bbox: &BoundingBox) -> Point {
        let x = if self.west() {
            bbox.x
        } else if self.east() {
            bbox.right()
        } else {
            bbox.x + bbox.w / 2.0
        };
        let y = if self.north() {
            bbox.y
        } else if self.south() {
            bbox.bottom()
        } else {
            bbox.y + bbox.h / 2.0
        };
        Point::new(x, y)
    }
}

/// Handle centers for a box, in hit-test order.
pub fn handle_positions(bbox: &BoundingBox) -> [(Handle, Point); 8] {
    Handle::ALL.map(|handle| (handle, handle.position(bbox)))
}

/// First handle whose `handle_size` square (centered on the handle) contains `point`.
pub fn handle_at_point(point: Point, bbox: &BoundingBox, handle_size: f64) -> Option<Handle> {
    let half = handle_size / 2.0;
    handle_positions(bbox)
        .into_iter()
        .find(|(_, center)| {
            (point.x - center.x).abs() <= half && (point.y - center.y).abs() <= half
        })
        .map(|(handle, _)| handle)
}

/// Move the edges controlled by `handle` by `delta`, then clamp width and height to `min_size`.
pub fn resize_box(bbox: &BoundingBox, handle: Handle, delta: Vec2, min_size: f64) -> BoundingBox {
    let mut resized = *bbox;
    if handle.east() {
        resized.w += delta.x;
    }
    if handle.west() {
        resized.x += delta.x;
        resized.w -= delta.x;
    }
    if handle.south() {
        resized.h += delta.y;
    }
    if handle.north() {
        resized.y += delta.y;
        resized.h -= delta.y;
    }
    resized.w = resized.w.max(min_size);
    resized.h = resized.h.max(min_size);
    resized
}

/// Translate an annotation (box plus line endpoints or path points).
pub fn apply_move(annotation: &mut Annotation, delta: Vec2) {
    annotation.translate(delta);
}

/// Resize an annotation through `handle` and rescale its detail geometry.
pub fn apply_resize(
    annotation: &mut Annotation,
    handle: Handle,
    delta: Vec2,
    min_size: f64,
    min_font_size: f64,
) {
    let resized = resize_box(&annotation.bounds(), handle, delta, min_size);
    annotation.rescale_to(resized, min_font_size);
}

/// State of an active move or resize gesture on the selected annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManipulationState {
    /// The annotation being manipulated.
    pub annotation_id: AnnotationId,
    /// The handle being dragged (None = moving the whole annotation).
    pub handle: Option<Handle>,
    /// Where the gesture started.
    pub start_point: Point,
    /// Pointer position at the previous event; deltas are taken from here.
    pub last_point: Point,
}

impl ManipulationState {
    pub fn new(annotation_id: AnnotationId, handle: Option<Handle>, start_point: Point) -> Self {
        Self {
            annotation_id,
            handle,
            start_point,
            last_point: start_point,
        }
    }

    /// Advance to `point`, returning the incremental delta since the previous event.
    pub fn advance(&mut self, point: Point) -> Vec2 {
        let delta = point - self.last_point;
        self.last_point = point;
        delta
    }

    /// Total displacement since the gesture started.
    pub fn total_delta(&self) -> Vec2 {
        self.last_point - self.start_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationShape, BoxedShape, StrokeStyle};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Annotation {
        Annotation::new(
            0,
            BoundingBox::new(x, y, w, h),
            AnnotationShape::Boxed(BoxedShape::Rectangle),
            StrokeStyle::default(),
        )
    }

    #[test]
    fn test_handle_positions() {
        let bbox = BoundingBox::new(100.0, 100.0, 100.0, 50.0);
        let positions = handle_positions(&bbox);
        assert_eq!(positions[0], (Handle::Nw, Point::new(100.0, 100.0)));
        assert_eq!(positions[1], (Handle::Ne, Point::new(200.0, 100.0)));
        assert_eq!(positions[2], (Handle::Sw, Point::new(100.0, 150.0)));
        assert_eq!(positions[3], (Handle::Se, Point::new(200.0, 150.0)));
        assert_eq!(positions[4], (Handle::N, Point::new(150.0, 100.0)));
        assert_eq!(positions[5], (Handle::S, Point::new(150.0, 150.0)));
        assert_eq!(positions[6], (Handle::E, Point::new(200.0, 125.0)));
        assert_eq!(positions[7], (Handle::W, Point::new(100.0, 125.0)));
    }

    #[test]
    fn test_handle_hit_tolerance() {
        let bbox = BoundingBox::new(100.0, 100.0, 100.0, 100.0);
        assert_eq!(handle_at_point(Point::new(200.0, 200.0), &bbox, 8.0), Some(Handle::Se));
        assert_eq!(handle_at_point(Point::new(203.0, 196.0), &bbox, 8.0), Some(Handle::Se));
        assert_eq!(handle_at_point(Point::new(205.0, 200.0), &bbox, 8.0), None);
        assert_eq!(handle_at_point(Point::new(150.0, 101.0), &bbox, 8.0), Some(Handle::N));
        assert_eq!(handle_at_point(Point::new(150.0, 150.0), &bbox, 8.0), None);
    }

    #[test]
    fn test_handle_order_on_tiny_box() {
        // Every handle overlaps; the first in enumeration order wins.
        let bbox = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(handle_at_point(Point::new(1.0, 1.0), &bbox, 8.0), Some(Handle::Nw));
    }

    #[test]
    fn test_resize_each_handle() {
        let bbox = BoundingBox::new(100.0, 100.0, 100.0, 100.0);
        let d = Vec2::new(10.0, 20.0);
        let expected = [
            (Handle::Se, BoundingBox::new(100.0, 100.0, 110.0, 120.0)),
            (Handle::Nw, BoundingBox::new(110.0, 120.0, 90.0, 80.0)),
            (Handle::Ne, BoundingBox::new(100.0, 120.0, 110.0, 80.0)),
            (Handle::Sw, BoundingBox::new(110.0, 100.0, 90.0, 120.0)),
            (Handle::N, BoundingBox::new(100.0, 120.0, 100.0, 80.0)),
            (Handle::S, BoundingBox::new(100.0, 100.0, 100.0, 120.0)),
            (Handle::E, BoundingBox::new(100.0, 100.0, 110.0, 100.0)),
            (Handle::W, BoundingBox::new(110.0, 100.0, 90.0, 100.0)),
        ];
        for (handle, want) in expected {
            assert_eq!(resize_box(&bbox, handle, d, 5.0), want, "{}", handle.name());
        }
    }

    #[test]
    fn test_resize_clamps_past_opposite_edge() {
        let bbox = BoundingBox::new(100.0, 100.0, 100.0, 100.0);
        for handle in Handle::ALL {
            for delta in [Vec2::new(-500.0, -500.0), Vec2::new(500.0, 500.0)] {
                let resized = resize_box(&bbox, handle, delta, 5.0);
                assert!(resized.w >= 5.0, "{handle:?} {delta:?} -> {resized:?}");
                assert!(resized.h >= 5.0, "{handle:?} {delta:?} -> {resized:?}");
            }
        }
    }

    #[test]
    fn test_apply_corner_manipulation() {
        let mut ann = rect(100.0, 100.0, 100.0, 100.0);
        apply_resize(&mut ann, Handle::Se, Vec2::new(50.0, 50.0), 5.0, 8.0);
        assert_eq!(ann.bounds(), BoundingBox::new(100.0, 100.0, 150.0, 150.0));
    }

    #[test]
    fn test_apply_move() {
        let mut ann = rect(100.0, 100.0, 100.0, 100.0);
        apply_move(&mut ann, Vec2::new(50.0, 50.0));
        assert_eq!(ann.bounds(), BoundingBox::new(150.0, 150.0, 100.0, 100.0));
    }

    #[test]
    fn test_manipulation_incremental_delta() {
        let mut state = ManipulationState::new(uuid::Uuid::new_v4(), None, Point::new(10.0, 10.0));
        assert_eq!(state.advance(Point::new(15.0, 12.0)), Vec2::new(5.0, 2.0));
        assert_eq!(state.advance(Point::new(20.0, 20.0)), Vec2::new(5.0, 8.0));
        assert_eq!(state.total_delta(), Vec2::new(10.0, 10.0));
    }
}
