//! Pagemark Core Library
//!
//! Annotation editing engine for paged documents: the annotation model,
//! hit testing and resize handles, and the pointer/keyboard state machine.

pub mod annotations;
pub mod attributes;
pub mod config;
pub mod editor;
pub mod factory;
pub mod geometry;
pub mod input;
pub mod selection;
pub mod store;
pub mod text_entry;
pub mod tools;

pub use annotations::{
    Annotation, AnnotationId, AnnotationKind, AnnotationShape, BoxedShape, ColorParseError,
    SerializableColor, StrokeStyle, TextStyle,
};
pub use attributes::{AttributeError, TextAttributeEditor};
pub use config::EditorConfig;
pub use editor::{AnnotationEditor, CreationCallback, CursorHint, InteractionMode};
pub use geometry::{BoundingBox, MIN_BOX_SIZE};
pub use input::{Key, KeyEvent, KeySubscription, KeyboardBus, PointerEvent};
pub use selection::{Handle, ManipulationState};
pub use store::AnnotationStore;
pub use text_entry::{TextEntry, TextEntryResult};
pub use tools::{GesturePreview, ToolKind, ToolManager};
