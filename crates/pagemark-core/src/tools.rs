//! Tool system: the active tool and the in-progress drawing gesture.

use crate::annotations::{Annotation, BoxedShape, StrokeStyle};
use crate::factory::{Gesture, create_from_gesture};
use crate::geometry::{BoundingBox, box_from_drag};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools. `Select` means no drawing tool is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Line,
    Freehand,
    Text,
}

impl ToolKind {
    /// Tools that create an annotation from a drag gesture.
    pub fn is_drag_tool(&self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle | ToolKind::Circle | ToolKind::Line | ToolKind::Freehand
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Freehand => "freehand",
            ToolKind::Text => "text",
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// A drag is in progress.
    Active {
        /// Starting point of the drag.
        start: Point,
        /// Latest pointer position.
        current: Point,
    },
}

/// Live preview of the gesture being drawn. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum GesturePreview<'a> {
    Boxed(BoxedShape, BoundingBox),
    Line { start: Point, end: Point },
    Path(&'a [Point]),
}

/// Manages the current tool and its drag state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    current_tool: ToolKind,
    state: ToolState,
    /// Accumulated points for freehand drawing.
    freehand_points: Vec<Point>,
    /// Stroke applied to new annotations.
    pub current_style: StrokeStyle,
}

impl ToolManager {
    pub fn new(current_style: StrokeStyle) -> Self {
        Self {
            current_style,
            ..Self::default()
        }
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    /// Switch tools, dropping any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.cancel();
    }

    /// Begin a drag at `point`. Freehand paths are seeded with the start point.
    pub fn begin(&mut self, point: Point) {
        self.freehand_points.clear();
        if self.current_tool == ToolKind::Freehand {
            self.freehand_points.push(point);
        }
        self.state = ToolState::Active {
            start: point,
            current: point,
        };
    }

    /// Update the live end point, extending the freehand path.
    pub fn update(&mut self, point: Point) {
        if let ToolState::Active { current, .. } = &mut self.state {
            *current = point;
            if self.current_tool == ToolKind::Freehand {
                self.freehand_points.push(point);
            }
        }
    }

    /// Finish the drag at `point` and build the resulting annotation, if any.
    /// The tool stays selected.
    pub fn end(&mut self, point: Point, page: u32) -> Option<Annotation> {
        let ToolState::Active { start, .. } = self.state else {
            return None;
        };
        let annotation = create_from_gesture(
            Gesture {
                tool: self.current_tool,
                start,
                end: point,
                path: &self.freehand_points,
                page,
            },
            self.current_style,
        );
        self.cancel();
        annotation
    }

    /// Drop the current drag without producing anything.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
        self.freehand_points.clear();
    }

    /// Check if a drag is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Accumulated freehand points.
    pub fn freehand_points(&self) -> &[Point] {
        &self.freehand_points
    }

    /// Preview of the drag in progress.
    pub fn preview(&self) -> Option<GesturePreview<'_>> {
        let ToolState::Active { start, current } = self.state else {
            return None;
        };
        match self.current_tool {
            ToolKind::Rectangle => Some(GesturePreview::Boxed(
                BoxedShape::Rectangle,
                box_from_drag(start, current),
            )),
            ToolKind::Circle => Some(GesturePreview::Boxed(
                BoxedShape::Circle,
                box_from_drag(start, current),
            )),
            ToolKind::Line => Some(GesturePreview::Line {
                start,
                end: current,
            }),
            ToolKind::Freehand => Some(GesturePreview::Path(&self.freehand_points)),
            ToolKind::Select | ToolKind::Text => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::AnnotationShape;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::default();
        assert_eq!(tm.current_tool(), ToolKind::Select);

        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_tool_interaction() {
        let mut tm = ToolManager::default();
        tm.set_tool(ToolKind::Rectangle);

        assert!(!tm.is_active());
        tm.begin(Point::new(0.0, 0.0));
        assert!(tm.is_active());

        tm.update(Point::new(50.0, 50.0));
        assert_eq!(
            tm.preview(),
            Some(GesturePreview::Boxed(
                BoxedShape::Rectangle,
                BoundingBox::new(0.0, 0.0, 50.0, 50.0)
            ))
        );

        let ann = tm.end(Point::new(100.0, 100.0), 0).unwrap();
        assert_eq!(ann.bounds(), BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        assert!(!tm.is_active());
        assert_eq!(tm.current_tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_freehand_accumulates_in_order() {
        let mut tm = ToolManager::default();
        tm.set_tool(ToolKind::Freehand);
        tm.begin(Point::new(1.0, 1.0));
        tm.update(Point::new(2.0, 3.0));
        tm.update(Point::new(4.0, 2.0));
        assert_eq!(tm.freehand_points().len(), 3);
        assert!(matches!(tm.preview(), Some(GesturePreview::Path(points)) if points.len() == 3));

        let ann = tm.end(Point::new(4.0, 2.0), 0).unwrap();
        assert_eq!(
            ann.shape(),
            &AnnotationShape::Path {
                points: vec![Point::new(1.0, 1.0), Point::new(2.0, 3.0), Point::new(4.0, 2.0)],
            }
        );
        assert!(tm.freehand_points().is_empty());
    }

    #[test]
    fn test_cancel_interaction() {
        let mut tm = ToolManager::default();
        tm.set_tool(ToolKind::Line);
        tm.begin(Point::new(0.0, 0.0));
        tm.cancel();
        assert!(!tm.is_active());
        assert!(tm.end(Point::new(10.0, 10.0), 0).is_none());
    }

    #[test]
    fn test_set_tool_drops_gesture() {
        let mut tm = ToolManager::default();
        tm.set_tool(ToolKind::Circle);
        tm.begin(Point::new(0.0, 0.0));
        tm.set_tool(ToolKind::Line);
        assert!(!tm.is_active());
        assert!(tm.preview().is_none());
    }

    #[test]
    fn test_select_tool_no_shape() {
        let mut tm = ToolManager::default();
        tm.begin(Point::new(0.0, 0.0));
        assert!(tm.end(Point::new(100.0, 100.0), 0).is_none());
    }
}
