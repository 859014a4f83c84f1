//! Backend that records a frame as a flat list of draw commands.
//!
//! Hosts replay the list onto their own canvas (HTML canvas, Vello scene,
//! PDF content stream); it is also what the render tests assert against.

use crate::renderer::{
    PATH_TOLERANCE, RenderContext, RenderResult, Renderer, RendererError, annotation_path,
    handle_rect, preview_path, stroke_color,
};
use kurbo::{BezPath, Point, Shape as KurboShape, Stroke};
use pagemark_core::annotations::{Annotation, AnnotationShape};
use pagemark_core::selection::handle_positions;
use peniko::Color;

/// Dash pattern of the selection outline and the text entry frame.
const DASH_PATTERN: [f64; 2] = [4.0, 4.0];

/// One drawing operation.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(Color),
    Stroke {
        path: BezPath,
        color: Color,
        style: Stroke,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
    /// Text with its top-left corner at `origin`.
    Text {
        origin: Point,
        content: String,
        font_size: f64,
        color: Color,
    },
}

/// Renderer producing [`DrawCommand`]s.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    commands: Vec<DrawCommand>,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last built frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the commands of the last built frame, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn stroke(&mut self, path: BezPath, color: Color, style: Stroke) {
        self.commands.push(DrawCommand::Stroke { path, color, style });
    }

    fn render_annotation(&mut self, annotation: &Annotation, ctx: &RenderContext) {
        let config = ctx.editor.config();
        let stroke = annotation.stroke();
        let color = stroke_color(stroke.color, config.fallback_color);

        match annotation.shape() {
            AnnotationShape::Text(style) => {
                self.commands.push(DrawCommand::Text {
                    origin: annotation.bounds().origin(),
                    content: style.content.clone(),
                    font_size: style.font_size,
                    color: stroke_color(style.color, config.fallback_color),
                });
            }
            _ => {
                if let Some(path) = annotation_path(annotation) {
                    self.stroke(path, color, Stroke::new(stroke.width));
                }
            }
        }
    }

    /// Dashed outline around the selection plus its eight handle markers.
    fn render_selection(&mut self, annotation: &Annotation, ctx: &RenderContext) {
        let config = ctx.editor.config();
        let bounds = annotation.bounds();
        let outline = bounds.to_rect().inflate(config.selection_margin, config.selection_margin);
        self.stroke(
            outline.to_path(PATH_TOLERANCE),
            ctx.selection_color,
            Stroke::new(1.0).with_dashes(0.0, DASH_PATTERN),
        );

        for (_, center) in handle_positions(&bounds) {
            let marker = handle_rect(center, config.handle_size).to_path(PATH_TOLERANCE);
            self.commands.push(DrawCommand::Fill {
                path: marker.clone(),
                color: ctx.handle_fill,
            });
            self.stroke(marker, ctx.selection_color, Stroke::new(1.0));
        }
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.commands.clear();
        if ctx.surface_size.width <= 0.0 || ctx.surface_size.height <= 0.0 {
            return Err(RendererError::Surface(format!(
                "Cannot render onto a {}x{} surface",
                ctx.surface_size.width, ctx.surface_size.height
            )));
        }

        let editor = ctx.editor;
        let config = editor.config();
        self.commands.push(DrawCommand::Clear(self.background_color(ctx)));

        let selection = editor.selection();
        for annotation in editor.annotations_on_page(editor.page()) {
            self.render_annotation(annotation, ctx);
            if selection == Some(annotation.id()) {
                self.render_selection(annotation, ctx);
            }
        }

        if let Some(preview) = editor.preview() {
            let style = config.preview_stroke;
            self.stroke(
                preview_path(&preview),
                stroke_color(style.color, config.fallback_color),
                Stroke::new(style.width),
            );
        }

        if let Some(entry) = editor.text_entry() {
            let frame = kurbo::Rect::from_origin_size(entry.anchor(), config.text_box);
            self.stroke(
                frame.to_path(PATH_TOLERANCE),
                ctx.selection_color,
                Stroke::new(1.0).with_dashes(0.0, DASH_PATTERN),
            );
            self.commands.push(DrawCommand::Text {
                origin: entry.anchor(),
                content: entry.text().to_string(),
                font_size: config.default_font_size,
                color: config.default_text_color.into(),
            });
        }

        log::trace!("Built frame with {} commands", self.commands.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use pagemark_core::editor::AnnotationEditor;
    use pagemark_core::input::Key;
    use pagemark_core::tools::ToolKind;

    fn editor() -> AnnotationEditor {
        let mut editor = AnnotationEditor::default();
        editor.set_surface_size(Size::new(800.0, 1000.0));
        editor
    }

    fn draw_rect(editor: &mut AnnotationEditor) {
        editor.set_tool(ToolKind::Rectangle);
        editor.pointer_down(Point::new(100.0, 100.0));
        editor.pointer_move(Point::new(200.0, 200.0));
        editor.pointer_up(Point::new(200.0, 200.0));
    }

    fn render(editor: &AnnotationEditor) -> Vec<DrawCommand> {
        let mut renderer = DisplayListRenderer::new();
        renderer.build_scene(&RenderContext::new(editor)).unwrap();
        renderer.take_commands()
    }

    fn strokes(commands: &[DrawCommand]) -> Vec<&Stroke> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke { style, .. } => Some(style),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_frame_only_clears() {
        let commands = render(&editor());
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], DrawCommand::Clear(_)));
    }

    #[test]
    fn test_zero_surface_is_error() {
        let editor = AnnotationEditor::default();
        let mut renderer = DisplayListRenderer::new();
        let result = renderer.build_scene(&RenderContext::new(&editor));
        assert!(matches!(result, Err(RendererError::Surface(_))));
    }

    #[test]
    fn test_annotation_uses_its_stroke() {
        let mut editor = editor();
        draw_rect(&mut editor);
        let commands = render(&editor);
        assert_eq!(commands.len(), 2);
        match &commands[1] {
            DrawCommand::Stroke { path, style, .. } => {
                assert!((style.width - 2.0).abs() < f64::EPSILON);
                assert_eq!(path.bounding_box(), kurbo::Rect::new(100.0, 100.0, 200.0, 200.0));
            }
            other => panic!("Expected stroke, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_outline_and_handles() {
        let mut editor = editor();
        draw_rect(&mut editor);
        editor.set_tool(ToolKind::Select);
        editor.pointer_down(Point::new(150.0, 150.0));
        editor.pointer_up(Point::new(150.0, 150.0));

        let commands = render(&editor);
        // clear, shape, outline, 8 x (fill + stroke)
        assert_eq!(commands.len(), 3 + 16);
        match &commands[2] {
            DrawCommand::Stroke { path, style, .. } => {
                assert!(!style.dash_pattern.is_empty());
                assert_eq!(path.bounding_box(), kurbo::Rect::new(98.0, 98.0, 202.0, 202.0));
            }
            other => panic!("Expected dashed outline, got {other:?}"),
        }
        let fills = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .count();
        assert_eq!(fills, 8);
    }

    #[test]
    fn test_preview_drawn_last_and_not_stored() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Line);
        editor.pointer_down(Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(50.0, 80.0));

        let commands = render(&editor);
        assert_eq!(editor.annotations().count(), 0);
        let strokes = strokes(&commands);
        assert_eq!(strokes.len(), 1);
        assert!((strokes[0].width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_other_pages_not_drawn() {
        let mut editor = editor();
        draw_rect(&mut editor);
        editor.set_page(2);
        assert_eq!(render(&editor).len(), 1);
    }

    #[test]
    fn test_text_and_pending_entry() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Text);
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_up(Point::new(10.0, 10.0));
        editor.handle_key(&Key::Character("Hi".to_string()));

        let commands = render(&editor);
        assert!(matches!(
            commands.last(),
            Some(DrawCommand::Text { content, .. }) if content == "Hi"
        ));

        editor.handle_key(&Key::Enter);
        let commands = render(&editor);
        assert_eq!(commands.len(), 2);
        match &commands[1] {
            DrawCommand::Text {
                origin,
                content,
                font_size,
                ..
            } => {
                assert_eq!(*origin, Point::new(10.0, 10.0));
                assert_eq!(content, "Hi");
                assert!((font_size - 16.0).abs() < f64::EPSILON);
            }
            other => panic!("Expected text, got {other:?}"),
        }
    }
}
