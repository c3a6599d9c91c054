//! Soft undo/redo controller.
//!
//! Feeds surface notifications into a `HistoryStack` and writes restored
//! snapshots back through a `SelectionHost`. Writing a snapshot makes the
//! host report a selection change synchronously; the controller is in
//! `ControllerState::Applying` for the duration of that write and ignores
//! the echo, so a restore is never recorded as a new state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;

use crate::events::SurfaceEvent;
use crate::history::{HistoryConfig, HistoryStack, SelectionRange, StateSnapshot};

/// What the controller needs from an editing surface.
///
/// Methods take `&self` because the host calls back into the controller
/// while a write is still in progress.
pub trait SelectionHost {
    /// Current selections; empty when no document is attached.
    fn read_snapshot(&self) -> StateSnapshot;

    /// Replaces every selection on the surface with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot take the selections.
    fn write_snapshot(&self, snapshot: &StateSnapshot) -> Result<()>;

    /// Scrolls `range` into view. Best effort.
    fn reveal_range(&self, range: &SelectionRange);
}

/// Controller state. `Applying` only lasts for one synchronous host write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Applying,
}

/// Sets the controller to `Applying` and restores the previous state on drop.
struct ApplyingGuard<'a> {
    state: &'a Cell<ControllerState>,
    previous: ControllerState,
}

impl<'a> ApplyingGuard<'a> {
    fn enter(state: &'a Cell<ControllerState>) -> Self {
        let previous = state.replace(ControllerState::Applying);
        Self { state, previous }
    }
}

impl Drop for ApplyingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(self.previous);
    }
}

/// Tracks the selection states of one surface and steps through them.
pub struct SoftUndoController<H: SelectionHost + ?Sized> {
    host: Rc<H>,
    history: RefCell<HistoryStack>,
    state: Cell<ControllerState>,
    reveal_on_restore: bool,
}

impl<H: SelectionHost + ?Sized> std::fmt::Debug for SoftUndoController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftUndoController")
            .field("history", &self.history)
            .field("state", &self.state.get())
            .field("reveal_on_restore", &self.reveal_on_restore)
            .finish()
    }
}

impl<H: SelectionHost + ?Sized> SoftUndoController<H> {
    /// Creates a controller whose history starts at the host's current state.
    pub fn new(host: Rc<H>, config: &HistoryConfig) -> Self {
        let initial = host.read_snapshot();
        Self {
            host,
            history: RefCell::new(HistoryStack::new(initial, config)),
            state: Cell::new(ControllerState::Idle),
            reveal_on_restore: true,
        }
    }

    /// Sets whether restored selections are scrolled into view.
    pub fn with_reveal_on_restore(mut self, reveal: bool) -> Self {
        self.reveal_on_restore = reveal;
        self
    }

    /// Routes a surface notification to its handler.
    pub fn handle_event(&self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::DocumentReplaced => self.on_document_replaced(),
            SurfaceEvent::ContentChanged => self.on_content_changed(),
            SurfaceEvent::SelectionChanged => self.on_selection_changed(),
        }
    }

    pub fn on_document_replaced(&self) {
        tracing::debug!("Document replaced; resetting selection history");
        self.reset_from_host();
    }

    pub fn on_content_changed(&self) {
        tracing::debug!("Document content changed; resetting selection history");
        self.reset_from_host();
    }

    /// Records the host's selections unless they come from our own restore.
    pub fn on_selection_changed(&self) {
        if self.state.get() == ControllerState::Applying {
            tracing::trace!("Ignoring selection change caused by restore");
            return;
        }
        let snapshot = self.host.read_snapshot();
        self.history.borrow_mut().record(snapshot);
    }

    /// Restores the previous selection state, if any.
    pub fn perform_undo(&self) {
        // The history borrow must end before the host write re-enters.
        let snapshot = self.history.borrow_mut().undo();
        match snapshot {
            Some(snapshot) => {
                if !self.apply(&snapshot) {
                    // The surface kept its selections, so the pointer goes back
                    self.history.borrow_mut().redo();
                }
            }
            None => tracing::trace!("Nothing to soft undo"),
        }
    }

    /// Restores the next selection state, if any.
    pub fn perform_redo(&self) {
        let snapshot = self.history.borrow_mut().redo();
        match snapshot {
            Some(snapshot) => {
                if !self.apply(&snapshot) {
                    self.history.borrow_mut().undo();
                }
            }
            None => tracing::trace!("Nothing to soft redo"),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state.get()
    }

    pub fn can_undo(&self) -> bool {
        self.history.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.borrow().can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn history_position(&self) -> usize {
        self.history.borrow().position()
    }

    /// Copy of the recorded snapshots, oldest first.
    pub fn history_entries(&self) -> Vec<StateSnapshot> {
        self.history.borrow().entries().to_vec()
    }

    fn reset_from_host(&self) {
        let snapshot = self.host.read_snapshot();
        self.history.borrow_mut().reset(snapshot);
    }

    /// Writes `snapshot` to the host and reveals its primary range.
    /// Returns `false` if the host rejected the write.
    fn apply(&self, snapshot: &StateSnapshot) -> bool {
        {
            let _guard = ApplyingGuard::enter(&self.state);
            if let Err(e) = self.host.write_snapshot(snapshot) {
                tracing::warn!("Failed to restore selections: {e:#}");
                return false;
            }
        }
        tracing::debug!(selections = %snapshot, "Restored selection state");
        if self.reveal_on_restore {
            if let Some(primary) = snapshot.primary() {
                self.host.reveal_range(primary);
            }
        }
        true
    }
}
