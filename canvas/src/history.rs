//! Linear undo/redo history of whole-surface snapshots.
//!
//! `History` owns the snapshot list and its cursor and is the only place the
//! truncate-then-append rule lives: committing after an undo discards the
//! redo branch. The list is never empty, and entry 0 is always the initial
//! state of the session.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::sync::Arc;

/// Immutable PNG capture of the surface at one instant. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Arc<[u8]>,
}

impl Snapshot {
    #[must_use]
    pub fn from_png(png: Vec<u8>) -> Self {
        Self { png: png.into() }
    }

    #[must_use]
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Encoded size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.png.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

/// Ordered snapshots plus a cursor at the visible one.
///
/// Invariant: `cursor < entries.len()` and `entries` is never empty.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    capacity: Option<usize>,
}

impl History {
    /// Start a history whose initial (and only) entry is `initial`.
    #[must_use]
    pub fn new(initial: Snapshot) -> Self {
        Self { entries: vec![initial], cursor: 0, capacity: None }
    }

    /// Like [`History::new`], but keep at most `capacity` entries.
    ///
    /// When a commit overflows, the oldest entries after the initial one are
    /// dropped. Capacities below 2 are raised to 2.
    #[must_use]
    pub fn with_capacity(initial: Snapshot, capacity: usize) -> Self {
        Self { entries: vec![initial], cursor: 0, capacity: Some(capacity.max(2)) }
    }

    /// Drop everything after the cursor, append `snapshot`, and move the
    /// cursor onto it.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if let Some(capacity) = self.capacity {
            let overflow = self.entries.len().saturating_sub(capacity);
            if overflow > 0 {
                self.entries.drain(1..=overflow);
            }
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. `None` when already at the initial state.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// The snapshot at the cursor.
    #[must_use]
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }

    /// The newest snapshot, regardless of cursor.
    #[must_use]
    pub fn last(&self) -> &Snapshot {
        &self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
