//! Annotation data model.
//!
//! An annotation is one shape or text label tied to a page. Its bounding box is
//! the authoritative spatial envelope; line, path and text annotations carry
//! extra detail that is kept in sync with the box on move and resize.

mod color;

pub use color::{ColorParseError, SerializableColor};

use crate::config::{DEFAULT_ACCENT, DEFAULT_STROKE_WIDTH};
use crate::geometry::BoundingBox;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for annotations.
pub type AnnotationId = Uuid;

/// Kind of annotation, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Rectangle,
    Circle,
    Line,
    Path,
    Text,
}

impl AnnotationKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Rectangle => "rectangle",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Line => "line",
            AnnotationKind::Path => "path",
            AnnotationKind::Text => "text",
        }
    }
}

/// Shapes whose geometry is the bounding box itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxedShape {
    Rectangle,
    /// Ellipse inscribed in the box.
    Circle,
}

/// Text-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub content: String,
    /// Font size in pixels, always positive.
    pub font_size: f64,
    pub color: SerializableColor,
}

/// Kind-specific geometry and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationShape {
    Boxed(BoxedShape),
    /// Endpoints are absolute and keep the drawing direction.
    Line { start: Point, end: Point },
    /// Points in drawing order, never reordered.
    Path { points: Vec<Point> },
    Text(TextStyle),
}

impl AnnotationShape {
    pub fn kind(&self) -> AnnotationKind {
        match self {
            AnnotationShape::Boxed(BoxedShape::Rectangle) => AnnotationKind::Rectangle,
            AnnotationShape::Boxed(BoxedShape::Circle) => AnnotationKind::Circle,
            AnnotationShape::Line { .. } => AnnotationKind::Line,
            AnnotationShape::Path { .. } => AnnotationKind::Path,
            AnnotationShape::Text(_) => AnnotationKind::Text,
        }
    }
}

/// Stroke properties shared by every kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: SerializableColor,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: DEFAULT_ACCENT,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// A committed annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,
    page: u32,
    bounds: BoundingBox,
    shape: AnnotationShape,
    stroke: StrokeStyle,
    /// Creation time, milliseconds since the Unix epoch.
    created_at: i64,
    /// Last mutation time, milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<i64>,
}

impl Annotation {
    /// Create an annotation with a fresh id and the current time as creation timestamp.
    pub fn new(
        page: u32,
        bounds: BoundingBox,
        shape: AnnotationShape,
        stroke: StrokeStyle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            page,
            bounds,
            shape,
            stroke,
            created_at: now_millis(),
            updated_at: None,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn kind(&self) -> AnnotationKind {
        self.shape.kind()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn shape(&self) -> &AnnotationShape {
        &self.shape
    }

    pub fn stroke(&self) -> &StrokeStyle {
        &self.stroke
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    /// Text attributes, if this is a text annotation.
    pub fn text(&self) -> Option<&TextStyle> {
        match &self.shape {
            AnnotationShape::Text(style) => Some(style),
            _ => None,
        }
    }

    pub(crate) fn text_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.shape {
            AnnotationShape::Text(style) => Some(style),
            _ => None,
        }
    }

    /// Translate the box and every absolute coordinate by `delta`.
    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.bounds = self.bounds.translated(delta);
        match &mut self.shape {
            AnnotationShape::Line { start, end } => {
                *start += delta;
                *end += delta;
            }
            AnnotationShape::Path { points } => {
                for point in points.iter_mut() {
                    *point += delta;
                }
            }
            AnnotationShape::Boxed(_) | AnnotationShape::Text(_) => {}
        }
        self.touch();
    }

    /// Replace the box and map the detail geometry from the old box onto the new one.
    ///
    /// Points map through `(p - old_origin) * scale + new_origin` per axis. Text
    /// font size scales by the smaller axis factor and never drops below `min_font_size`.
    pub(crate) fn rescale_to(&mut self, new_bounds: BoundingBox, min_font_size: f64) {
        let old = self.bounds;
        let scale_x = axis_scale(old.w, new_bounds.w);
        let scale_y = axis_scale(old.h, new_bounds.h);
        let map = |p: Point| {
            Point::new(
                (p.x - old.x) * scale_x + new_bounds.x,
                (p.y - old.y) * scale_y + new_bounds.y,
            )
        };

        match &mut self.shape {
            AnnotationShape::Line { start, end } => {
                *start = map(*start);
                *end = map(*end);
            }
            AnnotationShape::Path { points } => {
                for point in points.iter_mut() {
                    *point = map(*point);
                }
            }
            AnnotationShape::Text(style) => {
                style.font_size = (style.font_size * scale_x.min(scale_y)).max(min_font_size);
            }
            AnnotationShape::Boxed(_) => {}
        }

        self.bounds = new_bounds;
        self.touch();
    }

    /// Record a mutation.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Some(now_millis());
    }
}

/// Ratio of new to old size; a zero-sized old axis keeps a scale of 1.
fn axis_scale(old: f64, new: f64) -> f64 {
    if old > 0.0 { new / old } else { 1.0 }
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
