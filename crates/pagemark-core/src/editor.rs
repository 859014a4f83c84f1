//! The interaction state machine.
//!
//! [`AnnotationEditor`] owns the annotation collection and turns pointer and
//! keyboard events into drawing, selection, move, resize, delete and text
//! entry. Hosts feed it events, read it back for rendering, and learn about
//! new annotations through the creation callback.

use crate::annotations::{Annotation, AnnotationId};
use crate::attributes::TextAttributeEditor;
use crate::config::EditorConfig;
use crate::factory;
use crate::geometry::point_in_box;
use crate::input::{Key, KeyEvent, KeySubscription, KeyboardBus, PointerEvent};
use crate::selection::{Handle, ManipulationState, apply_move, apply_resize, handle_at_point};
use crate::store::AnnotationStore;
use crate::text_entry::{TextEntry, TextEntryResult};
use crate::tools::{GesturePreview, ToolKind, ToolManager};
use kurbo::{Point, Size, Vec2};
use std::fmt;

/// Callback invoked once per committed annotation.
pub type CreationCallback = Box<dyn FnMut(&Annotation)>;

/// What the current pointer gesture (if any) is doing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    /// No gesture in progress. Clicks select when no drawing tool is active.
    #[default]
    Idle,
    /// A drawing tool drag is in progress.
    Drawing,
    /// The selected annotation is being dragged.
    Moving(ManipulationState),
    /// A handle of the selected annotation is being dragged.
    Resizing(ManipulationState),
    /// A text entry is open, waiting for Enter or Escape.
    TextEntry(TextEntry),
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::Drawing => "drawing",
            InteractionMode::Moving(_) => "moving",
            InteractionMode::Resizing(_) => "resizing",
            InteractionMode::TextEntry(_) => "text-entry",
        }
    }

    /// A pointer gesture is between its down and up events.
    pub fn is_gesture(&self) -> bool {
        matches!(
            self,
            InteractionMode::Drawing | InteractionMode::Moving(_) | InteractionMode::Resizing(_)
        )
    }
}

/// Cursor a host should show at a given surface position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Crosshair,
    Text,
    Move,
    Resize(Handle),
}

impl CursorHint {
    /// CSS cursor name.
    pub fn name(&self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Crosshair => "crosshair",
            CursorHint::Text => "text",
            CursorHint::Move => "move",
            CursorHint::Resize(Handle::Nw | Handle::Se) => "nwse-resize",
            CursorHint::Resize(Handle::Ne | Handle::Sw) => "nesw-resize",
            CursorHint::Resize(Handle::N | Handle::S) => "ns-resize",
            CursorHint::Resize(Handle::E | Handle::W) => "ew-resize",
        }
    }
}

/// Redraw bookkeeping: a revision counter plus a dirty flag.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Redraw {
    revision: u64,
    dirty: bool,
}

impl Redraw {
    pub(crate) fn mark(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    pub(crate) fn take(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// The annotation editing engine for one drawing surface.
pub struct AnnotationEditor {
    config: EditorConfig,
    store: AnnotationStore,
    tools: ToolManager,
    selection: Option<AnnotationId>,
    mode: InteractionMode,
    page: u32,
    surface: Size,
    on_create: Option<CreationCallback>,
    keyboard: Option<KeySubscription>,
    redraw: Redraw,
}

impl fmt::Debug for AnnotationEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationEditor")
            .field("page", &self.page)
            .field("surface", &self.surface)
            .field("tool", &self.tools.current_tool())
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .field("annotations", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl Default for AnnotationEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl AnnotationEditor {
    pub fn new(config: EditorConfig) -> Self {
        let tools = ToolManager::new(config.stroke);
        Self {
            config,
            store: AnnotationStore::new(),
            tools,
            selection: None,
            mode: InteractionMode::Idle,
            page: 0,
            surface: Size::ZERO,
            on_create: None,
            keyboard: None,
            redraw: Redraw::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Register the creation callback, replacing any previous one.
    pub fn set_on_create(&mut self, callback: impl FnMut(&Annotation) + 'static) {
        self.on_create = Some(Box::new(callback));
    }

    // --- External inputs ---

    pub fn surface_size(&self) -> Size {
        self.surface
    }

    /// Size the surface to the page background.
    pub fn set_surface_size(&mut self, size: Size) {
        if self.surface != size {
            log::debug!("Surface resized to {}x{}", size.width, size.height);
            self.surface = size;
            self.redraw.mark();
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Switch to another page. Drops the selection and any gesture or text entry.
    pub fn set_page(&mut self, page: u32) {
        if self.page == page {
            return;
        }
        log::info!("Page changed {} -> {}", self.page, page);
        self.page = page;
        self.reset_interaction();
        self.select(None);
        self.redraw.mark();
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool()
    }

    /// Switch the active tool. An unfinished drawing or text entry is discarded.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tools.current_tool() == tool {
            return;
        }
        log::debug!("Tool changed to {}", tool.name());
        if matches!(self.mode, InteractionMode::Drawing | InteractionMode::TextEntry(_)) {
            self.reset_interaction();
        }
        self.tools.set_tool(tool);
        self.redraw.mark();
    }

    // --- Pointer handling ---

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if self.mode.is_gesture() {
            log::warn!("Ignoring pointer down during {} gesture", self.mode.name());
            return;
        }
        if matches!(self.mode, InteractionMode::TextEntry(_)) {
            log::debug!("Ignoring click while a text entry is open");
            return;
        }

        let tool = self.tools.current_tool();
        if tool.is_drag_tool() {
            self.tools.begin(point);
            self.mode = InteractionMode::Drawing;
            log::debug!("Drawing {} from ({}, {})", tool.name(), point.x, point.y);
            self.redraw.mark();
            return;
        }
        if tool == ToolKind::Text {
            self.mode = InteractionMode::TextEntry(TextEntry::new(point));
            log::debug!("Text entry opened at ({}, {})", point.x, point.y);
            self.redraw.mark();
            return;
        }

        if let Some(selected) = self.selected() {
            let id = selected.id();
            let bounds = selected.bounds();
            if let Some(handle) = handle_at_point(point, &bounds, self.config.handle_size) {
                log::debug!("Resizing {} from handle {}", id, handle.name());
                self.mode =
                    InteractionMode::Resizing(ManipulationState::new(id, Some(handle), point));
                return;
            }
            if point_in_box(point, &bounds) {
                log::debug!("Moving {}", id);
                self.mode = InteractionMode::Moving(ManipulationState::new(id, None, point));
                return;
            }
        }

        let hit = self.store.topmost_at(self.page, point);
        self.select(hit);
    }

    pub fn pointer_move(&mut self, point: Point) {
        match &mut self.mode {
            InteractionMode::Drawing => {
                self.tools.update(point);
                self.redraw.mark();
            }
            InteractionMode::Moving(state) | InteractionMode::Resizing(state) => {
                let delta = state.advance(point);
                let (id, handle) = (state.annotation_id, state.handle);
                self.manipulate(id, handle, delta);
            }
            InteractionMode::Idle | InteractionMode::TextEntry(_) => {}
        }
    }

    pub fn pointer_up(&mut self, point: Point) {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Drawing => {
                if let Some(annotation) = self.tools.end(point, self.page) {
                    self.commit(annotation);
                }
                self.redraw.mark();
            }
            InteractionMode::Moving(mut state) | InteractionMode::Resizing(mut state) => {
                let delta = state.advance(point);
                self.manipulate(state.annotation_id, state.handle, delta);
                log::debug!(
                    "Finished manipulating {} (total delta {:?})",
                    state.annotation_id,
                    state.total_delta()
                );
            }
            entry @ InteractionMode::TextEntry(_) => self.mode = entry,
            InteractionMode::Idle => {}
        }
    }

    /// Apply one incremental move (`handle` is None) or resize step.
    fn manipulate(&mut self, id: AnnotationId, handle: Option<Handle>, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let Some(annotation) = self.store.get_mut(id) else {
            return;
        };
        match handle {
            None => apply_move(annotation, delta),
            Some(handle) => apply_resize(
                annotation,
                handle,
                delta,
                self.config.min_box_size,
                self.config.min_font_size,
            ),
        }
        self.redraw.mark();
    }

    // --- Keyboard handling ---

    /// Handle a keyboard event. Only presses act; returns whether it was consumed.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        match event {
            KeyEvent::Pressed(key) => self.handle_key(key),
            KeyEvent::Released(_) => false,
        }
    }

    /// Handle a key press. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: &Key) -> bool {
        if let InteractionMode::TextEntry(entry) = &mut self.mode {
            match entry.handle_key(key) {
                TextEntryResult::Handled => {
                    self.redraw.mark();
                    return true;
                }
                TextEntryResult::Commit(content) => {
                    let anchor = entry.anchor();
                    self.mode = InteractionMode::Idle;
                    if let Some(annotation) =
                        factory::create_text(anchor, &content, self.page, &self.config)
                    {
                        self.commit(annotation);
                    }
                    self.redraw.mark();
                    return true;
                }
                TextEntryResult::Cancel => {
                    log::debug!("Text entry cancelled");
                    self.mode = InteractionMode::Idle;
                    self.redraw.mark();
                    return true;
                }
                TextEntryResult::NotHandled => {}
            }
        }

        match key {
            Key::Delete => self.delete_selected().is_some(),
            _ => false,
        }
    }

    /// Remove the selected annotation and clear the selection. No-op without a selection.
    pub fn delete_selected(&mut self) -> Option<Annotation> {
        let id = self.selection.take()?;
        let manipulating = match &self.mode {
            InteractionMode::Moving(state) | InteractionMode::Resizing(state) => {
                state.annotation_id == id
            }
            _ => false,
        };
        if manipulating {
            self.mode = InteractionMode::Idle;
        }
        let removed = self.store.remove(id);
        if let Some(annotation) = &removed {
            log::info!("Deleted {} annotation {}", annotation.kind().name(), id);
        }
        self.redraw.mark();
        removed
    }

    /// Subscribe to the global keyboard bus, replacing any earlier subscription.
    pub fn activate(&mut self, bus: &KeyboardBus) {
        self.keyboard = Some(bus.subscribe());
        log::debug!("Editor subscribed to keyboard");
    }

    /// Drop the keyboard subscription.
    pub fn deactivate(&mut self) {
        if self.keyboard.take().is_some() {
            log::debug!("Editor unsubscribed from keyboard");
        }
    }

    pub fn is_active(&self) -> bool {
        self.keyboard.is_some()
    }

    /// Feed every queued keyboard event into the state machine.
    /// Returns how many were consumed.
    pub fn pump_keyboard(&mut self) -> usize {
        let events = match &self.keyboard {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };
        events
            .iter()
            .filter(|event| self.handle_key_event(event))
            .count()
    }

    // --- Queries ---

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn selection(&self) -> Option<AnnotationId> {
        self.selection
    }

    /// The selected annotation.
    pub fn selected(&self) -> Option<&Annotation> {
        self.selection.and_then(|id| self.store.get(id))
    }

    /// Every annotation of every page, in creation order.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.store.iter()
    }

    pub fn annotations_on_page(&self, page: u32) -> impl Iterator<Item = &Annotation> {
        self.store.on_page(page)
    }

    /// Attribute editor for the selection, present only when it is a text annotation.
    pub fn text_attributes(&mut self) -> Option<TextAttributeEditor<'_>> {
        let id = self.selection?;
        let annotation = self.store.get_mut(id)?;
        TextAttributeEditor::new(annotation, &mut self.redraw)
    }

    /// Live preview of the drawing gesture in progress.
    pub fn preview(&self) -> Option<GesturePreview<'_>> {
        match self.mode {
            InteractionMode::Drawing => self.tools.preview(),
            _ => None,
        }
    }

    /// The open text entry, if any.
    pub fn text_entry(&self) -> Option<&TextEntry> {
        match &self.mode {
            InteractionMode::TextEntry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Cursor to show at `point`, using the same hit tests as pointer-down.
    pub fn cursor_at(&self, point: Point) -> CursorHint {
        match &self.mode {
            InteractionMode::Drawing => return CursorHint::Crosshair,
            InteractionMode::Moving(_) => return CursorHint::Move,
            InteractionMode::Resizing(state) => {
                return state.handle.map_or(CursorHint::Move, CursorHint::Resize);
            }
            InteractionMode::TextEntry(_) => return CursorHint::Text,
            InteractionMode::Idle => {}
        }

        match self.tools.current_tool() {
            ToolKind::Text => return CursorHint::Text,
            tool if tool.is_drag_tool() => return CursorHint::Crosshair,
            _ => {}
        }

        let Some(selected) = self.selected() else {
            return CursorHint::Default;
        };
        let bounds = selected.bounds();
        if let Some(handle) = handle_at_point(point, &bounds, self.config.handle_size) {
            CursorHint::Resize(handle)
        } else if point_in_box(point, &bounds) {
            CursorHint::Move
        } else {
            CursorHint::Default
        }
    }

    /// Increases on every visual change.
    pub fn revision(&self) -> u64 {
        self.redraw.revision
    }

    /// Whether a redraw is needed since the last call. Clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    // --- Internals ---

    fn select(&mut self, id: Option<AnnotationId>) {
        if self.selection == id {
            return;
        }
        match id {
            Some(id) => log::debug!("Selected {}", id),
            None => log::debug!("Selection cleared"),
        }
        self.selection = id;
        self.redraw.mark();
    }

    fn reset_interaction(&mut self) {
        match std::mem::take(&mut self.mode) {
            InteractionMode::Drawing => {
                log::debug!("Discarding drawing gesture");
                self.tools.cancel();
            }
            InteractionMode::TextEntry(_) => log::debug!("Text entry cancelled"),
            _ => {}
        }
    }

    fn commit(&mut self, annotation: Annotation) {
        let id = annotation.id();
        log::info!(
            "Created {} annotation {} on page {}",
            annotation.kind().name(),
            id,
            annotation.page()
        );
        self.store.add(annotation);
        if let (Some(callback), Some(annotation)) = (self.on_create.as_mut(), self.store.get(id)) {
            callback(annotation);
        }
    }
}
