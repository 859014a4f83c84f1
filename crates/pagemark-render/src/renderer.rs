//! Renderer trait abstraction.

use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape as KurboShape, Size};
use pagemark_core::annotations::{Annotation, AnnotationShape, BoxedShape, SerializableColor};
use pagemark_core::editor::AnnotationEditor;
use pagemark_core::geometry::BoundingBox;
use pagemark_core::tools::GesturePreview;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Tolerance used when flattening curves into paths.
pub(crate) const PATH_TOLERANCE: f64 = 0.1;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor whose state is drawn.
    pub editor: &'a AnnotationEditor,
    /// Surface size in pixels (matches the page background).
    pub surface_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Fill of the resize handle markers.
    pub handle_fill: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context sized to the editor's surface.
    pub fn new(editor: &'a AnnotationEditor) -> Self {
        Self {
            editor,
            surface_size: editor.surface_size(),
            background_color: Color::TRANSPARENT,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            handle_fill: Color::WHITE,
        }
    }
}

/// Trait for rendering backends.
///
/// A frame is always rebuilt from scratch from the editor state.
pub trait Renderer: Send + Sync {
    /// Build the command buffer for a frame.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

/// Stroke color of an annotation, falling back when its own color is fully transparent.
pub fn stroke_color(color: SerializableColor, fallback: SerializableColor) -> Color {
    if color.a == 0 {
        fallback.into()
    } else {
        color.into()
    }
}

/// Outline path of a box-shaped annotation.
pub fn boxed_path(shape: BoxedShape, bounds: &BoundingBox) -> BezPath {
    let rect = bounds.to_rect();
    match shape {
        BoxedShape::Rectangle => rect.to_path(PATH_TOLERANCE),
        BoxedShape::Circle => Ellipse::from_rect(rect).to_path(PATH_TOLERANCE),
    }
}

/// Open polyline through `points` in order.
pub fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for point in iter {
            path.line_to(*point);
        }
    }
    path
}

/// Stroke geometry of an annotation. Text has none.
pub fn annotation_path(annotation: &Annotation) -> Option<BezPath> {
    match annotation.shape() {
        AnnotationShape::Boxed(shape) => Some(boxed_path(*shape, &annotation.bounds())),
        AnnotationShape::Line { start, end } => {
            Some(Line::new(*start, *end).to_path(PATH_TOLERANCE))
        }
        AnnotationShape::Path { points } => Some(polyline(points)),
        AnnotationShape::Text(_) => None,
    }
}

/// Stroke geometry of a gesture preview.
pub fn preview_path(preview: &GesturePreview<'_>) -> BezPath {
    match preview {
        GesturePreview::Boxed(shape, bounds) => boxed_path(*shape, bounds),
        GesturePreview::Line { start, end } => Line::new(*start, *end).to_path(PATH_TOLERANCE),
        GesturePreview::Path(points) => polyline(points),
    }
}

/// Square marker centered on `center`.
pub fn handle_rect(center: Point, size: f64) -> Rect {
    Rect::from_center_size(center, Size::new(size, size))
}
