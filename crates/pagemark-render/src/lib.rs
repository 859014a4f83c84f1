//! Pagemark Render Library
//!
//! Renderer abstraction for the annotation editor and a display-list
//! implementation that records each frame as draw commands.

mod display_list;
mod renderer;

pub use display_list::{DisplayListRenderer, DrawCommand};
pub use renderer::{
    RenderContext, RenderResult, Renderer, RendererError, annotation_path, boxed_path, handle_rect,
    polyline, preview_path, stroke_color,
};
