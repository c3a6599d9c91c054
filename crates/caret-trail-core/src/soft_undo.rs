//! One-time registration of a soft undo controller on a surface.

use std::rc::Rc;

use crate::commands::SoftUndoCommand;
use crate::controller::SoftUndoController;
use crate::events::Subscription;
use crate::history::HistoryConfig;
use crate::surface::ObservableSurface;

/// A controller bound to a surface's notifications.
///
/// Dropping it releases the subscription; the surface stops feeding the
/// history and nothing else keeps the controller alive.
pub struct SoftUndo<H: ObservableSurface + 'static> {
    controller: Rc<SoftUndoController<H>>,
    _subscription: Subscription,
}

impl<H: ObservableSurface + 'static> std::fmt::Debug for SoftUndo<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftUndo")
            .field("controller", &self.controller)
            .finish()
    }
}

impl<H: ObservableSurface + 'static> SoftUndo<H> {
    /// Creates a controller for `surface` and subscribes it to the
    /// surface's events.
    pub fn attach(surface: &Rc<H>, config: &HistoryConfig, reveal_on_restore: bool) -> Self {
        let controller = Rc::new(
            SoftUndoController::new(Rc::clone(surface), config)
                .with_reveal_on_restore(reveal_on_restore),
        );
        let weak = Rc::downgrade(&controller);
        let subscription = surface.events().subscribe(move |event| {
            if let Some(controller) = weak.upgrade() {
                controller.handle_event(event);
            }
        });
        tracing::debug!(capacity = config.capacity, "Soft undo attached");
        Self {
            controller,
            _subscription: subscription,
        }
    }

    pub fn perform_undo(&self) {
        self.controller.perform_undo();
    }

    pub fn perform_redo(&self) {
        self.controller.perform_redo();
    }

    /// Runs a registered command.
    pub fn execute(&self, command: SoftUndoCommand) {
        tracing::trace!(%command, "Executing command");
        match command {
            SoftUndoCommand::Undo => self.perform_undo(),
            SoftUndoCommand::Redo => self.perform_redo(),
        }
    }

    pub fn controller(&self) -> &SoftUndoController<H> {
        &self.controller
    }
}
