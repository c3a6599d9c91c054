//! Editing surface and soft undo controller.
//!
//! `EditorSurface` is an in-process host with one document and multi-cursor
//! selections. `SoftUndo::attach` wires a `SoftUndoController` to it so
//! cursor moves are recorded and can be stepped back and forth, separately
//! from content undo.
pub mod buffer;
pub mod commands;
pub mod controller;
pub mod events;
pub mod history;
pub mod soft_undo;
pub mod surface;

pub use buffer::TextBuffer;
pub use commands::SoftUndoCommand;
pub use controller::{ControllerState, SelectionHost, SoftUndoController};
pub use events::{EventHub, Subscription, SurfaceEvent};
pub use history::{HistoryConfig, HistoryStack, Position, SelectionRange, StateSnapshot};
pub use soft_undo::SoftUndo;
pub use surface::{Document, DocumentId, EditorSurface, ObservableSurface};
