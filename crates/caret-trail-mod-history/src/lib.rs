/// Cursor and selection history with soft undo/redo.
///
/// Provides a `HistoryStack` that remembers the selection states a user
/// visits on one editing surface and walks back and forth through them,
/// independently of content undo. History is in-memory only and is bounded
/// by a fixed capacity.
pub mod config;
pub mod snapshot;
pub mod stack;

pub use config::HistoryConfig;
pub use snapshot::{Position, SelectionRange, StateSnapshot};
pub use stack::HistoryStack;
