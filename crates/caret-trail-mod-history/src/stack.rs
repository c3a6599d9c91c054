/// Bounded, position-pointer based selection history.
///
/// The stack is one linear sequence of snapshots with a pointer to the
/// current entry. Undo and redo only move the pointer; recording while the
/// pointer is behind the tail drops everything after it before appending.
use crate::config::HistoryConfig;
use crate::snapshot::StateSnapshot;

/// Selection history for a single editing surface.
///
/// Invariants: `entries` is never empty, and `position < entries.len()`.
/// `entries.len()` never exceeds `capacity`.
#[derive(Clone)]
pub struct HistoryStack {
    /// Snapshots ordered oldest first.
    entries: Vec<StateSnapshot>,
    /// Index of the entry describing the surface's current state.
    position: usize,
    /// Max entries kept (at least 1).
    capacity: usize,
    /// Whether recording the current entry again is ignored.
    skip_duplicates: bool,
}

impl std::fmt::Debug for HistoryStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStack")
            .field("len", &self.entries.len())
            .field("position", &self.position)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl HistoryStack {
    /// Creates a history holding only `initial`.
    pub fn new(initial: StateSnapshot, config: &HistoryConfig) -> Self {
        Self {
            entries: vec![initial],
            position: 0,
            capacity: config.capacity.max(1),
            skip_duplicates: config.skip_duplicates,
        }
    }

    /// Creates a history with the given capacity and default duplicate handling.
    pub fn with_capacity(initial: StateSnapshot, capacity: usize) -> Self {
        let config = HistoryConfig {
            capacity,
            ..HistoryConfig::default()
        };
        Self::new(initial, &config)
    }

    /// Discards every entry; the history becomes `[snapshot]`.
    pub fn reset(&mut self, snapshot: StateSnapshot) {
        tracing::debug!(
            discarded = self.entries.len(),
            "Resetting selection history"
        );
        self.entries.clear();
        self.entries.push(snapshot);
        self.position = 0;
    }

    /// Records a new current state.
    ///
    /// Drops the redo branch, appends `snapshot`, and evicts the oldest
    /// entry once capacity is exceeded. With `skip_duplicates`, a snapshot
    /// equal to the current entry is ignored and the redo branch survives.
    pub fn record(&mut self, snapshot: StateSnapshot) {
        if self.skip_duplicates && self.entries[self.position] == snapshot {
            tracing::trace!(position = self.position, "Skipping duplicate snapshot");
            return;
        }

        if self.position + 1 < self.entries.len() {
            tracing::trace!(
                dropped = self.entries.len() - self.position - 1,
                "Discarding redo branch"
            );
            self.entries.truncate(self.position + 1);
        }

        self.entries.push(snapshot);
        self.position = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            self.position -= 1;
            tracing::trace!(capacity = self.capacity, "Evicted oldest snapshot");
        }
    }

    /// Steps back one entry.
    ///
    /// Returns the snapshot that is now current, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<StateSnapshot> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.entries[self.position].clone())
    }

    /// Steps forward one entry.
    ///
    /// Returns the snapshot that is now current, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<StateSnapshot> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        Some(self.entries[self.position].clone())
    }

    /// The entry at the position pointer.
    pub fn current(&self) -> &StateSnapshot {
        &self.entries[self.position]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[StateSnapshot] {
        &self.entries
    }
}
