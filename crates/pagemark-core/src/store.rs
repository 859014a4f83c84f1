//! Ordered annotation collection.

use crate::annotations::{Annotation, AnnotationId};
use crate::geometry::point_in_box;
use kurbo::Point;

/// All annotations in creation order (back to front).
///
/// Creation order is paint order; hit testing walks it in reverse so the most
/// recent annotation wins.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation on top of the others.
    pub fn add(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Remove an annotation by id.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id() == id)?;
        Some(self.annotations.remove(index))
    }

    /// Get an annotation by id.
    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    /// Get a mutable reference to an annotation by id.
    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id() == id)
    }

    /// Annotations in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Annotations of one page, in creation order.
    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.page() == page)
    }

    /// Most recently created annotation on `page` whose box contains `point`.
    pub fn topmost_at(&self, page: u32, point: Point) -> Option<AnnotationId> {
        self.annotations
            .iter()
            .rev()
            .find(|a| a.page() == page && point_in_box(point, &a.bounds()))
            .map(Annotation::id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
