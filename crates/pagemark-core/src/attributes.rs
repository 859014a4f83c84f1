//! Live-bound editor for the selected text annotation.

use crate::annotations::{Annotation, AnnotationId, ColorParseError, SerializableColor, TextStyle};
use crate::editor::Redraw;
use thiserror::Error;

/// Rejected attribute edit. The annotation is left unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum AttributeError {
    #[error("Font size must be a positive number, got {0}")]
    InvalidFontSize(f64),
    #[error(transparent)]
    InvalidColor(#[from] ColorParseError),
}

pub type AttributeResult<T> = Result<T, AttributeError>;

/// Fields of the selected text annotation. Every setter patches the stored
/// annotation immediately and requests a redraw.
pub struct TextAttributeEditor<'a> {
    annotation: &'a mut Annotation,
    redraw: &'a mut Redraw,
}

impl<'a> TextAttributeEditor<'a> {
    /// Wrap `annotation` if it is a text annotation.
    pub(crate) fn new(annotation: &'a mut Annotation, redraw: &'a mut Redraw) -> Option<Self> {
        annotation.text()?;
        Some(Self { annotation, redraw })
    }

    pub fn id(&self) -> AnnotationId {
        self.annotation.id()
    }

    pub fn content(&self) -> &str {
        self.annotation.text().map_or("", |style| style.content.as_str())
    }

    pub fn font_size(&self) -> f64 {
        self.annotation.text().map_or(0.0, |style| style.font_size)
    }

    pub fn color(&self) -> SerializableColor {
        self.annotation
            .text()
            .map_or_else(SerializableColor::black, |style| style.color)
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        let content = content.into();
        self.patch(|style| style.content = content);
    }

    pub fn set_font_size(&mut self, font_size: f64) -> AttributeResult<()> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(AttributeError::InvalidFontSize(font_size));
        }
        self.patch(|style| style.font_size = font_size);
        Ok(())
    }

    /// Set the color from a hex string (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub fn set_color(&mut self, color: &str) -> AttributeResult<()> {
        let color = SerializableColor::from_hex(color)?;
        self.set_color_value(color);
        Ok(())
    }

    pub fn set_color_value(&mut self, color: SerializableColor) {
        self.patch(|style| style.color = color);
    }

    fn patch(&mut self, edit: impl FnOnce(&mut TextStyle)) {
        if let Some(style) = self.annotation.text_mut() {
            edit(style);
            self.annotation.touch();
            self.redraw.mark();
            log::debug!("Patched text attributes of {}", self.annotation.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationShape, BoxedShape, StrokeStyle};
    use crate::config::DEFAULT_ACCENT;
    use crate::geometry::BoundingBox;

    fn text_annotation() -> Annotation {
        Annotation::new(
            0,
            BoundingBox::new(0.0, 0.0, 100.0, 20.0),
            AnnotationShape::Text(TextStyle {
                content: "Hi".to_string(),
                font_size: 16.0,
                color: DEFAULT_ACCENT,
            }),
            StrokeStyle::default(),
        )
    }

    #[test]
    fn test_only_text_annotations() {
        let mut redraw = Redraw::default();
        let mut rect = Annotation::new(
            0,
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            AnnotationShape::Boxed(BoxedShape::Rectangle),
            StrokeStyle::default(),
        );
        assert!(TextAttributeEditor::new(&mut rect, &mut redraw).is_none());
    }

    #[test]
    fn test_edits_patch_annotation() {
        let mut redraw = Redraw::default();
        let mut ann = text_annotation();
        {
            let mut editor = TextAttributeEditor::new(&mut ann, &mut redraw).unwrap();
            assert_eq!(editor.content(), "Hi");
            editor.set_content("Hello");
            editor.set_font_size(24.0).unwrap();
            editor.set_color("#00ff00").unwrap();
        }
        let style = ann.text().unwrap();
        assert_eq!(style.content, "Hello");
        assert!((style.font_size - 24.0).abs() < f64::EPSILON);
        assert_eq!(style.color, SerializableColor::new(0, 255, 0, 255));
        assert!(ann.updated_at().is_some());
        assert!(redraw.take());
    }

    #[test]
    fn test_invalid_edits_leave_annotation_unchanged() {
        let mut redraw = Redraw::default();
        let mut ann = text_annotation();
        {
            let mut editor = TextAttributeEditor::new(&mut ann, &mut redraw).unwrap();
            assert_eq!(editor.set_font_size(0.0), Err(AttributeError::InvalidFontSize(0.0)));
            assert!(editor.set_font_size(f64::NAN).is_err());
            assert!(matches!(editor.set_color("green"), Err(AttributeError::InvalidColor(_))));
        }
        let style = ann.text().unwrap();
        assert!((style.font_size - 16.0).abs() < f64::EPSILON);
        assert_eq!(style.color, DEFAULT_ACCENT);
        assert!(ann.updated_at().is_none());
        assert!(!redraw.take());
    }
}
