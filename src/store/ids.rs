use crate::drawing::DrawingId;

/// Source of fresh drawing ids. Injected so hosts can plug in their own
/// scheme and tests can assert deterministic ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> DrawingId;

    /// Called for ids that enter the store from outside (restored records) so
    /// later allocations never collide with them.
    fn observe(&mut self, _id: DrawingId) {}
}

#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub const fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> DrawingId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        DrawingId::new(id)
    }

    fn observe(&mut self, id: DrawingId) {
        self.next = self.next.max(id.get().saturating_add(1));
    }
}
