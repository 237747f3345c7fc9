//! Ordered drawing arena. List order is paint order and hit-test priority.

mod ids;

pub use ids::{IdGenerator, SequentialIds};

use std::collections::HashSet;
use std::fmt;

use crate::drawing::{Drawing, DrawingId, DrawingPatch, Shape};
use thiserror::Error;

/// Called synchronously after every mutation; the host coalesces repaints.
pub type RepaintHook = Box<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(DrawingId),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub struct DrawingStore {
    drawings: Vec<Drawing>,
    /// Ids in insertion order, independent of paint order.
    added: Vec<DrawingId>,
    ids: Box<dyn IdGenerator>,
    repaint: Option<RepaintHook>,
}

impl Default for DrawingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DrawingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingStore")
            .field("drawings", &self.drawings)
            .field("repaint_hook", &self.repaint.is_some())
            .finish()
    }
}

impl DrawingStore {
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(SequentialIds::new()))
    }

    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            drawings: Vec::new(),
            added: Vec::new(),
            ids,
            repaint: None,
        }
    }

    pub fn set_repaint_hook(&mut self, hook: Option<RepaintHook>) {
        self.repaint = hook;
    }

    pub(crate) fn request_repaint(&self) {
        if let Some(hook) = &self.repaint {
            hook();
        }
    }

    fn position(&self, id: DrawingId) -> StoreResult<usize> {
        self.drawings
            .iter()
            .position(|drawing| drawing.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn add(&mut self, shape: impl Into<Shape>) -> DrawingId {
        let id = self.ids.next_id();
        let drawing = Drawing::new(id, shape);
        tracing::debug!(%id, kind = ?drawing.kind(), "drawing added");
        self.drawings.push(drawing);
        self.added.push(id);
        self.request_repaint();
        id
    }

    pub fn get(&self, id: DrawingId) -> Option<&Drawing> {
        self.drawings.iter().find(|drawing| drawing.id == id)
    }

    pub fn contains(&self, id: DrawingId) -> bool {
        self.get(id).is_some()
    }

    /// Mutates a drawing in place through `edit`, then requests a repaint.
    pub fn edit<R>(&mut self, id: DrawingId, edit: impl FnOnce(&mut Shape) -> R) -> StoreResult<R> {
        let index = self.position(id)?;
        let result = edit(&mut self.drawings[index].shape);
        self.request_repaint();
        Ok(result)
    }

    pub fn update_by_id(&mut self, id: DrawingId, patch: &DrawingPatch) -> StoreResult<()> {
        let changed = self.edit(id, |shape| patch.apply(shape))?;
        tracing::debug!(%id, changed, "drawing updated");
        Ok(())
    }

    pub fn remove_by_id(&mut self, id: DrawingId) -> StoreResult<Drawing> {
        let index = self.position(id)?;
        let removed = self.drawings.remove(index);
        self.added.retain(|added| *added != id);
        tracing::debug!(%id, "drawing removed");
        self.request_repaint();
        Ok(removed)
    }

    /// Drops the most recently added drawing, whatever its current paint order.
    pub fn remove_last(&mut self) -> Option<Drawing> {
        let id = self.added.pop()?;
        let index = self.position(id).ok()?;
        let removed = self.drawings.remove(index);
        tracing::debug!(%id, "last drawing removed");
        self.request_repaint();
        Some(removed)
    }

    pub fn clear(&mut self) {
        let count = self.drawings.len();
        self.drawings.clear();
        self.added.clear();
        tracing::debug!(count, "drawings cleared");
        self.request_repaint();
    }

    pub fn list(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    pub fn bring_to_front(&mut self, id: DrawingId) -> StoreResult<()> {
        let index = self.position(id)?;
        let drawing = self.drawings.remove(index);
        self.drawings.push(drawing);
        tracing::debug!(%id, "drawing brought to front");
        self.request_repaint();
        Ok(())
    }

    pub fn send_to_back(&mut self, id: DrawingId) -> StoreResult<()> {
        let index = self.position(id)?;
        let drawing = self.drawings.remove(index);
        self.drawings.insert(0, drawing);
        tracing::debug!(%id, "drawing sent to back");
        self.request_repaint();
        Ok(())
    }

    /// Replaces the contents with previously persisted records. Duplicate ids
    /// keep their first occurrence; the id generator moves past every restored
    /// id. Records carrying a foreign id get a fresh `DrawingId` and keep the
    /// foreign one for encoding.
    pub fn restore(&mut self, drawings: Vec<Drawing>) {
        let mut seen = HashSet::with_capacity(drawings.len());
        let mut seen_foreign = HashSet::new();
        let mut restored = Vec::with_capacity(drawings.len());
        for drawing in drawings {
            let first = match &drawing.foreign_id {
                Some(foreign_id) => seen_foreign.insert(foreign_id.clone()),
                None => seen.insert(drawing.id),
            };
            if !first {
                match &drawing.foreign_id {
                    Some(foreign_id) => {
                        tracing::warn!(id = %foreign_id, "skipping drawing with duplicate id");
                    }
                    None => tracing::warn!(id = %drawing.id, "skipping drawing with duplicate id"),
                }
                continue;
            }
            if drawing.foreign_id.is_none() {
                self.ids.observe(drawing.id);
            }
            restored.push(drawing);
        }
        for drawing in restored.iter_mut().filter(|d| d.foreign_id.is_some()) {
            drawing.id = self.ids.next_id();
        }

        self.added = restored.iter().map(|drawing| drawing.id).collect();
        self.drawings = restored;
        tracing::debug!(count = self.drawings.len(), "drawings restored");
        self.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{
        Color, ForeignId, Freehand, HorizontalLine, LogicalPoint, TextBox, TrendLine, DEFAULT_DRAWING_COLOR,
    };
    use std::cell::Cell;
    use std::rc::Rc;

    fn line(price: f64) -> HorizontalLine {
        HorizontalLine::new(price, DEFAULT_DRAWING_COLOR)
    }

    fn ids(store: &DrawingStore) -> Vec<u64> {
        store.list().iter().map(|drawing| drawing.id.get()).collect()
    }

    fn counting_store() -> (DrawingStore, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let mut store = DrawingStore::new();
        let hook_count = Rc::clone(&count);
        store.set_repaint_hook(Some(Box::new(move || hook_count.set(hook_count.get() + 1))));
        (store, count)
    }

    #[test]
    fn add_assigns_sequential_ids_in_append_order() {
        let mut store = DrawingStore::new();
        let first = store.add(line(1.0));
        let second = store.add(TrendLine::starting_at(
            LogicalPoint::new(1.0, 1.0),
            DEFAULT_DRAWING_COLOR,
        ));

        assert_eq!(first, DrawingId::new(1));
        assert_eq!(second, DrawingId::new(2));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn custom_id_generator_is_used() {
        let mut store = DrawingStore::with_id_generator(Box::new(SequentialIds::starting_at(500)));
        assert_eq!(store.add(line(1.0)), DrawingId::new(500));
    }

    #[test]
    fn every_mutation_requests_repaint() {
        let (mut store, count) = counting_store();
        let id = store.add(line(1.0));
        store.add(line(2.0));
        store
            .update_by_id(id, &DrawingPatch::color(Color::WHITE))
            .unwrap();
        store.bring_to_front(id).unwrap();
        store.send_to_back(id).unwrap();
        store.remove_by_id(id).unwrap();
        store.remove_last().unwrap();
        store.clear();

        assert_eq!(count.get(), 8);
    }

    #[test]
    fn failed_mutations_do_not_request_repaint() {
        let (mut store, count) = counting_store();
        let missing = DrawingId::new(99);

        assert_eq!(store.remove_by_id(missing), Err(StoreError::NotFound(missing)));
        assert_eq!(store.bring_to_front(missing), Err(StoreError::NotFound(missing)));
        assert!(store.remove_last().is_none());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn update_by_id_applies_patch() {
        let mut store = DrawingStore::new();
        let id = store.add(TextBox::new(LogicalPoint::new(0.0, 10.0), "a"));
        store.update_by_id(id, &DrawingPatch::text("b")).unwrap();

        let text_box = store.get(id).and_then(Drawing::as_text_box).unwrap();
        assert_eq!(text_box.text, "b");
    }

    #[test]
    fn bring_to_front_and_send_to_back_reorder() {
        let mut store = DrawingStore::new();
        let a = store.add(line(1.0));
        let b = store.add(line(2.0));
        let c = store.add(line(3.0));

        store.bring_to_front(a).unwrap();
        assert_eq!(ids(&store), vec![b.get(), c.get(), a.get()]);

        store.send_to_back(c).unwrap();
        assert_eq!(ids(&store), vec![c.get(), b.get(), a.get()]);
    }

    #[test]
    fn remove_last_drops_most_recent_drawing() {
        let mut store = DrawingStore::new();
        store.add(line(1.0));
        let last = store.add(Freehand::new(LogicalPoint::new(0.0, 0.0), DEFAULT_DRAWING_COLOR));

        let removed = store.remove_last().unwrap();
        assert_eq!(removed.id, last);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_last_follows_insertion_order_not_paint_order() {
        let mut store = DrawingStore::new();
        let a = store.add(line(1.0));
        let b = store.add(line(2.0));
        store.send_to_back(b).unwrap();
        assert_eq!(ids(&store), vec![b.get(), a.get()]);

        assert_eq!(store.remove_last().unwrap().id, b);
        assert_eq!(store.remove_last().unwrap().id, a);
        assert!(store.remove_last().is_none());
    }

    #[test]
    fn remove_last_skips_drawings_removed_by_id() {
        let mut store = DrawingStore::new();
        let a = store.add(line(1.0));
        let b = store.add(line(2.0));
        store.bring_to_front(a).unwrap();
        store.remove_by_id(b).unwrap();

        assert_eq!(store.remove_last().unwrap().id, a);
        assert!(store.is_empty());
    }

    #[test]
    fn edit_mutates_shape_in_place() {
        let mut store = DrawingStore::new();
        let id = store.add(Freehand::new(LogicalPoint::new(0.0, 0.0), DEFAULT_DRAWING_COLOR));
        store
            .edit(id, |shape| {
                if let Shape::Freehand(stroke) = shape {
                    stroke.append_point(LogicalPoint::new(1.0, 1.0));
                }
            })
            .unwrap();

        let Shape::Freehand(stroke) = &store.get(id).unwrap().shape else {
            panic!("expected freehand");
        };
        assert_eq!(stroke.len(), 2);
    }

    #[test]
    fn restore_dedupes_and_advances_id_generator() {
        let mut store = DrawingStore::new();
        store.restore(vec![
            Drawing::new(DrawingId::new(10), line(1.0)),
            Drawing::new(DrawingId::new(4), line(2.0)),
            Drawing::new(DrawingId::new(10), line(3.0)),
        ]);

        assert_eq!(ids(&store), vec![10, 4]);
        assert_eq!(store.add(line(4.0)), DrawingId::new(11));
    }

    #[test]
    fn restore_assigns_fresh_ids_to_foreign_records() {
        let mut store = DrawingStore::new();
        store.restore(vec![
            Drawing::new(DrawingId::new(0), line(1.0))
                .with_foreign_id(ForeignId::Text("1700000000000-k3j9".to_string())),
            Drawing::new(DrawingId::new(3), line(2.0)),
            Drawing::new(DrawingId::new(0), line(3.0))
                .with_foreign_id(ForeignId::Text("1700000000000-k3j9".to_string())),
            Drawing::new(DrawingId::new(0), line(4.0))
                .with_foreign_id(ForeignId::Text("x".to_string())),
        ]);

        assert_eq!(ids(&store), vec![4, 3, 5]);
        assert_eq!(
            store.list()[0].foreign_id,
            Some(ForeignId::Text("1700000000000-k3j9".to_string()))
        );
        assert_eq!(store.add(line(5.0)), DrawingId::new(6));
        assert_eq!(store.remove_last().unwrap().id, DrawingId::new(6));
        assert_eq!(store.remove_last().unwrap().id, DrawingId::new(5));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = DrawingStore::new();
        store.add(line(1.0));
        store.add(line(2.0));
        store.clear();
        assert!(store.is_empty());
    }
}
