//! Scripted editing sessions.
//!
//! A session script is a JSON list of input steps. Replaying it drives an
//! [`AnnotationEditor`] exactly as a UI host would: pointer events go straight
//! in, key presses go through the keyboard bus, and a frame is rendered after
//! every step that needs a redraw.

use crate::app::{AppError, AppResult};
use kurbo::{Point, Size};
use pagemark_core::annotations::Annotation;
use pagemark_core::editor::AnnotationEditor;
use pagemark_core::input::{Key, KeyboardBus, PointerEvent};
use pagemark_core::tools::ToolKind;
use pagemark_render::{DisplayListRenderer, RenderContext, Renderer};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    /// Select the active tool.
    Tool { tool: ToolKind },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    /// Down, one move and up.
    Drag { from: [f64; 2], to: [f64; 2] },
    /// Press a named key ("Delete", "Enter", "Escape", "Backspace" or a character).
    Key { key: String },
    /// Type each character of `text`.
    Type { text: String },
    Page { page: u32 },
    Surface { width: f64, height: f64 },
    /// Edit the selected text annotation.
    Text {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        font_size: Option<f64>,
        #[serde(default)]
        color: Option<String>,
    },
}

/// A list of steps, replayed in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl SessionScript {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    /// Annotations announced through the creation callback, in order.
    pub created: Vec<Annotation>,
    /// Every annotation left in the editor, all pages.
    pub annotations: Vec<Annotation>,
    /// Frames rendered while replaying.
    pub frames: usize,
}

/// An editor wired to a keyboard bus and a renderer.
pub struct Session {
    editor: AnnotationEditor,
    bus: KeyboardBus,
    renderer: DisplayListRenderer,
    created: Rc<RefCell<Vec<Annotation>>>,
    frames: usize,
}

impl Session {
    pub fn new(mut editor: AnnotationEditor) -> Self {
        let bus = KeyboardBus::new();
        editor.activate(&bus);

        let created = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&created);
        editor.set_on_create(move |annotation| sink.borrow_mut().push(annotation.clone()));

        Self {
            editor,
            bus,
            renderer: DisplayListRenderer::new(),
            created,
            frames: 0,
        }
    }

    /// Replay every step, rendering after each one that changed the picture.
    pub fn replay(&mut self, script: &SessionScript) -> AppResult<SessionReport> {
        for (index, step) in script.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", index, step);
            self.apply(step)?;
            self.editor.pump_keyboard();
            if self.editor.take_redraw() {
                self.renderer.build_scene(&RenderContext::new(&self.editor))?;
                self.frames += 1;
            }
        }

        Ok(SessionReport {
            created: self.created.borrow().clone(),
            annotations: self.editor.annotations().cloned().collect(),
            frames: self.frames,
        })
    }

    fn apply(&mut self, step: &Step) -> AppResult<()> {
        let editor = &mut self.editor;
        match step {
            Step::Tool { tool } => editor.set_tool(*tool),
            Step::Down { x, y } => editor.handle_pointer(PointerEvent::Down {
                position: Point::new(*x, *y),
            }),
            Step::Move { x, y } => editor.handle_pointer(PointerEvent::Move {
                position: Point::new(*x, *y),
            }),
            Step::Up { x, y } => editor.handle_pointer(PointerEvent::Up {
                position: Point::new(*x, *y),
            }),
            Step::Drag { from, to } => {
                let (from, to) = (Point::new(from[0], from[1]), Point::new(to[0], to[1]));
                editor.pointer_down(from);
                editor.pointer_move(to);
                editor.pointer_up(to);
            }
            Step::Key { key } => match Key::from_name(key) {
                Some(key) => self.bus.press(key),
                None => log::warn!("Ignoring empty key name"),
            },
            Step::Type { text } => {
                for c in text.chars() {
                    self.bus.press(Key::Character(c.to_string()));
                }
            }
            Step::Page { page } => editor.set_page(*page),
            Step::Surface { width, height } => {
                if *width <= 0.0 || *height <= 0.0 {
                    return Err(AppError::InvalidConfig(format!(
                        "Surface must be non-empty, got {width}x{height}"
                    )));
                }
                editor.set_surface_size(Size::new(*width, *height));
            }
            Step::Text {
                content,
                font_size,
                color,
            } => {
                let Some(mut attributes) = editor.text_attributes() else {
                    log::warn!("Text edit ignored: no text annotation selected");
                    return Ok(());
                };
                if let Some(content) = content {
                    attributes.set_content(content.as_str());
                }
                if let Some(font_size) = font_size {
                    attributes.set_font_size(*font_size)?;
                }
                if let Some(color) = color {
                    attributes.set_color(color)?;
                }
            }
        }
        Ok(())
    }
}
