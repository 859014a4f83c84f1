//! Engine configuration.

use crate::annotations::{SerializableColor, StrokeStyle};
use crate::geometry::MIN_BOX_SIZE;
use kurbo::Size;

/// Accent color used for new strokes and text.
pub const DEFAULT_ACCENT: SerializableColor = SerializableColor::new(0xe5, 0x39, 0x35, 255);
/// Stroke width for new annotations.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
/// Font size for new text annotations.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Font size floor applied when a text annotation is resized.
pub const MIN_FONT_SIZE: f64 = 8.0;
/// Side of the square hit area (and marker) around each resize handle.
pub const HANDLE_SIZE: f64 = 8.0;
/// Distance between a selected annotation's box and its highlight outline.
pub const SELECTION_MARGIN: f64 = 2.0;
/// Box given to a freshly confirmed text annotation.
pub const DEFAULT_TEXT_BOX: Size = Size::new(100.0, 20.0);

/// Tunable constants of the editing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Minimum width/height after a resize.
    pub min_box_size: f64,
    /// Side of the square hit area around each handle.
    pub handle_size: f64,
    /// Margin of the dashed selection outline.
    pub selection_margin: f64,
    /// Size of a new text annotation's box.
    pub text_box: Size,
    pub default_font_size: f64,
    pub min_font_size: f64,
    pub default_text_color: SerializableColor,
    /// Stroke applied to committed shapes.
    pub stroke: StrokeStyle,
    /// Stroke used for the live preview of an in-progress gesture.
    pub preview_stroke: StrokeStyle,
    /// Color used when an annotation's own stroke color cannot be drawn.
    pub fallback_color: SerializableColor,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_box_size: MIN_BOX_SIZE,
            handle_size: HANDLE_SIZE,
            selection_margin: SELECTION_MARGIN,
            text_box: DEFAULT_TEXT_BOX,
            default_font_size: DEFAULT_FONT_SIZE,
            min_font_size: MIN_FONT_SIZE,
            default_text_color: DEFAULT_ACCENT,
            stroke: StrokeStyle::default(),
            preview_stroke: StrokeStyle {
                color: DEFAULT_ACCENT,
                width: 1.0,
            },
            fallback_color: SerializableColor::black(),
        }
    }
}
