//! Turns completed gestures into annotations.

use crate::annotations::{Annotation, AnnotationShape, BoxedShape, StrokeStyle, TextStyle};
use crate::config::EditorConfig;
use crate::geometry::{BoundingBox, box_from_drag, box_from_path};
use crate::tools::ToolKind;
use kurbo::Point;

/// A finished drag gesture.
#[derive(Debug, Clone, Copy)]
pub struct Gesture<'a> {
    pub tool: ToolKind,
    pub start: Point,
    pub end: Point,
    /// Accumulated freehand points (ignored by other tools).
    pub path: &'a [Point],
    pub page: u32,
}

/// Build the annotation for a completed drag.
///
/// Returns `None` when the tool has no drag shape (select, text) or a freehand
/// gesture collected no points. Zero-movement drags still produce an annotation.
pub fn create_from_gesture(gesture: Gesture<'_>, stroke: StrokeStyle) -> Option<Annotation> {
    let Gesture {
        tool,
        start,
        end,
        path,
        page,
    } = gesture;

    let (bounds, shape) = match tool {
        ToolKind::Rectangle => (
            box_from_drag(start, end),
            AnnotationShape::Boxed(BoxedShape::Rectangle),
        ),
        ToolKind::Circle => (
            box_from_drag(start, end),
            AnnotationShape::Boxed(BoxedShape::Circle),
        ),
        ToolKind::Line => (box_from_drag(start, end), AnnotationShape::Line { start, end }),
        ToolKind::Freehand => (
            box_from_path(path)?,
            AnnotationShape::Path {
                points: path.to_vec(),
            },
        ),
        ToolKind::Select | ToolKind::Text => return None,
    };

    if bounds.is_degenerate() {
        log::debug!("Committing zero-area {} annotation at {:?}", shape.kind().name(), bounds);
    }

    Some(Annotation::new(page, bounds, shape, stroke))
}

/// Build a text annotation anchored at the click point with the default box size.
///
/// Returns `None` for content that is empty after trimming.
pub fn create_text(
    anchor: Point,
    content: &str,
    page: u32,
    config: &EditorConfig,
) -> Option<Annotation> {
    if content.trim().is_empty() {
        return None;
    }

    let size = config.text_box;
    let bounds = BoundingBox::new(anchor.x, anchor.y, size.width, size.height);
    let shape = AnnotationShape::Text(TextStyle {
        content: content.to_string(),
        font_size: config.default_font_size,
        color: config.default_text_color,
    });
    Some(Annotation::new(page, bounds, shape, config.stroke))
}
