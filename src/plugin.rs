//! The surface a host chart mounts: one store, one session, one renderer.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::codec;
use crate::config::EngineConfig;
use crate::coords::{ChartProjection, CoordinateMapper};
use crate::drawing::{Drawing, DrawingId, DrawingPatch};
use crate::render::{FrameScale, Painter, Renderer};
use crate::session::{DrawingSession, PointerInput, SessionOutcome, ToolKind};
use crate::storage::{DrawingRepository, StorageResult};
use crate::store::{DrawingStore, StoreResult};

/// Drawing-tools layer for one chart.
///
/// Until [`attach`](Self::attach) and after [`detach`](Self::detach), paint
/// and pointer calls do nothing and no repaint is ever requested.
#[derive(Default)]
pub struct AnnotationPlugin {
    store: DrawingStore,
    session: DrawingSession,
    renderer: Renderer,
    projection: Option<Rc<dyn ChartProjection>>,
    editing_overlay: Option<DrawingId>,
}

impl fmt::Debug for AnnotationPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationPlugin")
            .field("store", &self.store)
            .field("session", &self.session)
            .field("attached", &self.projection.is_some())
            .field("editing_overlay", &self.editing_overlay)
            .finish()
    }
}

impl AnnotationPlugin {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_store(DrawingStore::new(), config)
    }

    pub fn with_store(store: DrawingStore, config: &EngineConfig) -> Self {
        Self {
            store,
            session: DrawingSession::new(config.tool_defaults()),
            renderer: Renderer::new(config.render_style()),
            projection: None,
            editing_overlay: None,
        }
    }

    pub fn attach(&mut self, projection: Rc<dyn ChartProjection>, repaint: impl Fn() + 'static) {
        self.projection = Some(projection);
        self.store.set_repaint_hook(Some(Box::new(repaint)));
        tracing::debug!(drawings = self.store.len(), "plugin attached");
        self.store.request_repaint();
    }

    /// Drops the host hooks. An uncommitted drawing is discarded.
    pub fn detach(&mut self) {
        if self.projection.is_none() {
            return;
        }
        self.store.set_repaint_hook(None);
        self.session.cancel(&mut self.store);
        self.projection = None;
        tracing::debug!("plugin detached");
    }

    pub fn is_attached(&self) -> bool {
        self.projection.is_some()
    }

    /// Replaces render style and tool policy. Existing drawings keep their own styling.
    pub fn apply_config(&mut self, config: &EngineConfig) {
        self.renderer = Renderer::new(config.render_style());
        self.session.set_defaults(config.tool_defaults());
        self.store.request_repaint();
    }

    /// Paints every drawing, then the selection chrome. Returns how many
    /// drawings were painted.
    pub fn paint(&self, painter: &mut dyn Painter, frame: &FrameScale) -> usize {
        let Some(projection) = &self.projection else {
            return 0;
        };
        let mapper = CoordinateMapper::new(&**projection);
        let suppressed: HashSet<DrawingId> = self.editing_overlay.into_iter().collect();

        let painted = self
            .renderer
            .paint(painter, &mapper, frame, self.store.list(), &suppressed);

        if let Some(selected) = self
            .session
            .selected()
            .filter(|id| !suppressed.contains(id))
            .and_then(|id| self.store.get(id))
        {
            self.renderer.paint_selection(painter, &mapper, frame, selected);
        }
        painted
    }

    pub fn pointer_down(&mut self, input: PointerInput) -> SessionOutcome {
        self.dispatch(|session, store, mapper| session.pointer_down(store, mapper, input))
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> SessionOutcome {
        self.dispatch(|session, store, mapper| session.pointer_move(store, mapper, input))
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> SessionOutcome {
        self.dispatch(|session, store, mapper| session.pointer_up(store, mapper, input))
    }

    pub fn cancel(&mut self) -> SessionOutcome {
        if !self.is_attached() {
            return SessionOutcome::Ignored;
        }
        let outcome = self.session.cancel(&mut self.store);
        self.repaint_for(outcome);
        outcome
    }

    fn dispatch(
        &mut self,
        handle: impl FnOnce(
            &mut DrawingSession,
            &mut DrawingStore,
            &CoordinateMapper<'_>,
        ) -> SessionOutcome,
    ) -> SessionOutcome {
        let Some(projection) = self.projection.clone() else {
            return SessionOutcome::Ignored;
        };
        let mapper = CoordinateMapper::new(&*projection);
        let outcome = handle(&mut self.session, &mut self.store, &mapper);
        self.repaint_for(outcome);
        outcome
    }

    /// Selection changes touch no drawing, so the store will not have asked.
    fn repaint_for(&self, outcome: SessionOutcome) {
        if matches!(outcome, SessionOutcome::Selected(_)) {
            self.store.request_repaint();
        }
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.session.select_tool(&mut self.store, tool);
    }

    pub fn deselect_tool(&mut self) {
        self.session.deselect_tool(&mut self.store);
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn selected(&self) -> Option<DrawingId> {
        self.session.selected()
    }

    pub fn drawings(&self) -> &[Drawing] {
        self.store.list()
    }

    pub fn drawing(&self, id: DrawingId) -> Option<&Drawing> {
        self.store.get(id)
    }

    /// Marks a text box as being edited by a host widget; it is left out of
    /// painting until the overlay is cleared.
    pub fn set_editing_overlay(&mut self, id: Option<DrawingId>) {
        if self.editing_overlay == id {
            return;
        }
        tracing::debug!(from = ?self.editing_overlay, to = ?id, "editing overlay changed");
        self.editing_overlay = id;
        self.store.request_repaint();
    }

    pub fn editing_overlay(&self) -> Option<DrawingId> {
        self.editing_overlay
    }

    pub fn update_drawing(&mut self, id: DrawingId, patch: &DrawingPatch) -> StoreResult<()> {
        self.store.update_by_id(id, patch)
    }

    pub fn remove_drawing(&mut self, id: DrawingId) -> StoreResult<Drawing> {
        let removed = self.store.remove_by_id(id)?;
        self.forget(id);
        Ok(removed)
    }

    pub fn remove_last(&mut self) -> Option<Drawing> {
        let removed = self.store.remove_last()?;
        self.forget(removed.id);
        Some(removed)
    }

    pub fn bring_to_front(&mut self, id: DrawingId) -> StoreResult<()> {
        self.store.bring_to_front(id)
    }

    pub fn send_to_back(&mut self, id: DrawingId) -> StoreResult<()> {
        self.store.send_to_back(id)
    }

    pub fn clear(&mut self) {
        self.session.reset();
        self.editing_overlay = None;
        self.store.clear();
    }

    fn forget(&mut self, id: DrawingId) {
        self.session.forget(id);
        if self.editing_overlay == Some(id) {
            self.editing_overlay = None;
        }
    }

    pub fn export(&self) -> Value {
        codec::encode(self.store.list())
    }

    /// Replaces every drawing with the decodable records in `value`. Returns
    /// how many were loaded.
    pub fn import(&mut self, value: &Value) -> usize {
        self.replace_all(codec::decode(value))
    }

    pub fn save_to(&self, repository: &dyn DrawingRepository, key: &str) -> StorageResult<()> {
        repository.save(key, self.store.list())
    }

    pub fn load_from(
        &mut self,
        repository: &dyn DrawingRepository,
        key: &str,
    ) -> StorageResult<usize> {
        let drawings = repository.load(key)?;
        Ok(self.replace_all(drawings))
    }

    fn replace_all(&mut self, drawings: Vec<Drawing>) -> usize {
        self.session.reset();
        self.editing_overlay = None;
        self.store.restore(drawings);
        self.store.len()
    }
}
