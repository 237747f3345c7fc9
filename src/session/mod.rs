//! Pointer-driven authoring of drawings and manipulation of text boxes.

mod manipulation;
mod tool;

pub use manipulation::{rotation_towards, Manipulation, ManipulationMode, MIN_TEXT_BOX_SIZE};
pub use tool::{CreationMode, ToolDefaults, ToolKind, DEFAULT_TEXT_BOX_TEXT};

use crate::coords::CoordinateMapper;
use crate::drawing::{DrawingId, LogicalPoint, Shape};
use crate::geometry::PixelPoint;
use crate::hit_test;
use crate::store::{DrawingStore, StoreError};
use manipulation::BoxGeometry;

/// Pointer position in media pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f64,
    pub y: f64,
}

impl PointerInput {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn pixel(self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Armed(ToolKind),
    /// An uncommitted drawing owned by the session until pointer-up or cancel.
    InProgress { id: DrawingId, tool: ToolKind },
    Manipulating(Manipulation),
}

/// What an input event did, so the host can react (open an editor, persist, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Ignored,
    Created(DrawingId),
    Updated(DrawingId),
    Committed(DrawingId),
    /// Carries the discarded in-progress drawing, if there was one.
    Cancelled(Option<DrawingId>),
    Selected(Option<DrawingId>),
    Manipulated(DrawingId),
}

#[derive(Debug, Default)]
pub struct DrawingSession {
    state: SessionState,
    selected: Option<DrawingId>,
    defaults: ToolDefaults,
}

impl DrawingSession {
    pub fn new(defaults: ToolDefaults) -> Self {
        Self {
            state: SessionState::Idle,
            selected: None,
            defaults,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected(&self) -> Option<DrawingId> {
        self.selected
    }

    pub fn defaults(&self) -> &ToolDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: ToolDefaults) {
        self.defaults = defaults;
    }

    /// The drawing currently being authored, if any.
    pub fn active_drawing(&self) -> Option<DrawingId> {
        match &self.state {
            SessionState::InProgress { id, .. } => Some(*id),
            SessionState::Manipulating(manipulation) => Some(manipulation.id),
            _ => None,
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
    }

    fn armed_tool(&self) -> Option<ToolKind> {
        match &self.state {
            SessionState::Armed(tool) => Some(*tool),
            _ => None,
        }
    }

    fn state_after_commit(&self, tool: ToolKind) -> SessionState {
        if self.defaults.is_sticky(tool) {
            SessionState::Armed(tool)
        } else {
            SessionState::Idle
        }
    }

    pub fn select_tool(&mut self, store: &mut DrawingStore, tool: ToolKind) {
        self.discard_active(store);
        self.transition(SessionState::Armed(tool));
    }

    pub fn deselect_tool(&mut self, store: &mut DrawingStore) {
        self.discard_active(store);
        self.transition(SessionState::Idle);
    }

    pub fn pointer_down(
        &mut self,
        store: &mut DrawingStore,
        mapper: &CoordinateMapper<'_>,
        input: PointerInput,
    ) -> SessionOutcome {
        if !matches!(self.state, SessionState::Idle | SessionState::Armed(_)) {
            return SessionOutcome::Ignored;
        }

        if let Some(hit) = hit_test::hit_text_box(mapper, store.list(), self.selected, input.x, input.y) {
            return self.begin_manipulation(store, mapper, hit, input);
        }

        let Some(tool) = self.armed_tool() else {
            return match self.selected.take() {
                Some(_) => SessionOutcome::Selected(None),
                None => SessionOutcome::Ignored,
            };
        };
        let Some(point) = mapper.unproject(input.pixel()) else {
            tracing::debug!(?tool, x = input.x, y = input.y, "pointer down not resolvable, ignoring");
            return SessionOutcome::Ignored;
        };

        let id = store.add(self.defaults.initial_shape(tool, point));
        match tool.creation_mode() {
            CreationMode::OneShot => {
                if tool == ToolKind::TextBox {
                    self.selected = Some(id);
                }
                let next = self.state_after_commit(tool);
                self.transition(next);
                SessionOutcome::Committed(id)
            }
            CreationMode::TwoPoint | CreationMode::Continuous => {
                self.transition(SessionState::InProgress { id, tool });
                SessionOutcome::Created(id)
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        store: &mut DrawingStore,
        mapper: &CoordinateMapper<'_>,
        input: PointerInput,
    ) -> SessionOutcome {
        match &self.state {
            SessionState::InProgress { id, .. } => {
                let id = *id;
                let Some(point) = mapper.unproject(input.pixel()) else {
                    return SessionOutcome::Ignored;
                };
                match store.edit(id, |shape| extend_shape(shape, point)) {
                    Ok(()) => SessionOutcome::Updated(id),
                    Err(err) => {
                        tracing::warn!(?err, "in-progress drawing disappeared, resetting session");
                        self.transition(SessionState::Idle);
                        SessionOutcome::Ignored
                    }
                }
            }
            SessionState::Manipulating(manipulation) => {
                let manipulation = manipulation.clone();
                let applied = store.edit(manipulation.id, |shape| {
                    shape
                        .as_text_box_mut()
                        .is_some_and(|text_box| manipulation.apply(mapper, text_box, input.pixel()))
                });
                match applied {
                    Ok(true) => SessionOutcome::Manipulated(manipulation.id),
                    Ok(false) => SessionOutcome::Ignored,
                    Err(err) => {
                        tracing::warn!(?err, "manipulated text box disappeared, resetting session");
                        self.transition(SessionState::Idle);
                        SessionOutcome::Ignored
                    }
                }
            }
            SessionState::Idle | SessionState::Armed(_) => SessionOutcome::Ignored,
        }
    }

    /// Commits the active drawing or manipulation. A resolvable release point
    /// is applied first, so a two-point drawing ends exactly under the pointer.
    pub fn pointer_up(
        &mut self,
        store: &mut DrawingStore,
        mapper: &CoordinateMapper<'_>,
        input: PointerInput,
    ) -> SessionOutcome {
        match &self.state {
            SessionState::InProgress { id, tool } => {
                let (id, tool) = (*id, *tool);
                let finished = match mapper.unproject(input.pixel()) {
                    Some(point) if tool.creation_mode() == CreationMode::TwoPoint => {
                        store.edit(id, |shape| extend_shape(shape, point))
                    }
                    _ if store.contains(id) => Ok(()),
                    _ => Err(StoreError::NotFound(id)),
                };
                if let Err(err) = finished {
                    tracing::warn!(?err, "in-progress drawing disappeared, resetting session");
                    self.transition(SessionState::Idle);
                    return SessionOutcome::Ignored;
                }
                tracing::debug!(%id, ?tool, "drawing committed");
                let next = self.state_after_commit(tool);
                self.transition(next);
                SessionOutcome::Committed(id)
            }
            SessionState::Manipulating(manipulation) => {
                let manipulation = manipulation.clone();
                let finished = store.edit(manipulation.id, |shape| {
                    if let Some(text_box) = shape.as_text_box_mut() {
                        manipulation.apply(mapper, text_box, input.pixel());
                    }
                });
                if let Err(err) = finished {
                    tracing::warn!(?err, "manipulated text box disappeared, resetting session");
                    self.transition(SessionState::Idle);
                    return SessionOutcome::Ignored;
                }
                tracing::debug!(id = %manipulation.id, mode = ?manipulation.mode, "text box manipulation finished");
                let next = manipulation
                    .resume
                    .map_or(SessionState::Idle, SessionState::Armed);
                self.transition(next);
                SessionOutcome::Committed(manipulation.id)
            }
            SessionState::Idle | SessionState::Armed(_) => SessionOutcome::Ignored,
        }
    }

    /// Escape: discards an uncommitted drawing or undoes a manipulation, then idles.
    pub fn cancel(&mut self, store: &mut DrawingStore) -> SessionOutcome {
        match &self.state {
            SessionState::Idle => match self.selected.take() {
                Some(_) => SessionOutcome::Selected(None),
                None => SessionOutcome::Ignored,
            },
            SessionState::Armed(_) => {
                self.transition(SessionState::Idle);
                SessionOutcome::Cancelled(None)
            }
            SessionState::InProgress { .. } | SessionState::Manipulating(_) => {
                let discarded = self.discard_active(store);
                self.transition(SessionState::Idle);
                SessionOutcome::Cancelled(discarded)
            }
        }
    }

    /// Drops references to a drawing removed from the store behind the session's back.
    pub fn forget(&mut self, id: DrawingId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.active_drawing() == Some(id) {
            let next = match &self.state {
                SessionState::InProgress { tool, .. } => self.state_after_commit(*tool),
                SessionState::Manipulating(manipulation) => manipulation
                    .resume
                    .map_or(SessionState::Idle, SessionState::Armed),
                _ => SessionState::Idle,
            };
            self.transition(next);
        }
    }

    /// Back to `Idle` with nothing selected. The store is left untouched.
    pub fn reset(&mut self) {
        self.selected = None;
        self.transition(SessionState::Idle);
    }

    fn begin_manipulation(
        &mut self,
        store: &DrawingStore,
        mapper: &CoordinateMapper<'_>,
        hit: hit_test::TextBoxHit,
        input: PointerInput,
    ) -> SessionOutcome {
        let Some(text_box) = store.get(hit.id).and_then(|drawing| drawing.as_text_box()) else {
            return SessionOutcome::Ignored;
        };
        let Some(rect) = hit_test::text_box_rect(mapper, text_box) else {
            return SessionOutcome::Ignored;
        };

        let manipulation = Manipulation {
            id: hit.id,
            mode: hit.region.into(),
            resume: self.armed_tool(),
            original: BoxGeometry::capture(text_box),
            grab_offset: PixelPoint::new(input.x - rect.x, input.y - rect.y),
        };
        tracing::debug!(id = %hit.id, mode = ?manipulation.mode, "text box manipulation started");
        self.selected = Some(hit.id);
        self.transition(SessionState::Manipulating(manipulation));
        SessionOutcome::Selected(Some(hit.id))
    }

    /// Removes the uncommitted drawing or restores the manipulated box.
    /// Returns the id of a removed drawing.
    fn discard_active(&self, store: &mut DrawingStore) -> Option<DrawingId> {
        match &self.state {
            SessionState::InProgress { id, .. } => {
                let id = *id;
                if let Err(err) = store.remove_by_id(id) {
                    tracing::warn!(?err, "in-progress drawing already removed");
                }
                Some(id)
            }
            SessionState::Manipulating(manipulation) => {
                let original = manipulation.original;
                let restored = store.edit(manipulation.id, |shape| {
                    if let Some(text_box) = shape.as_text_box_mut() {
                        original.restore(text_box);
                    }
                });
                if let Err(err) = restored {
                    tracing::warn!(?err, "manipulated text box already removed");
                }
                None
            }
            SessionState::Idle | SessionState::Armed(_) => None,
        }
    }
}

fn extend_shape(shape: &mut Shape, point: LogicalPoint) {
    match shape {
        Shape::TrendLine(line) => line.set_end(point),
        Shape::Ruler(ruler) => ruler.set_end(point),
        Shape::Freehand(stroke) => stroke.append_point(point),
        Shape::HorizontalLine(_) | Shape::TextBox(_) => {}
    }
}
