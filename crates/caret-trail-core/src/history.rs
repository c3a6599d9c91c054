// Re-exports from caret-trail-mod-history so hosts only need this crate.
pub use caret_trail_mod_history::{
    HistoryConfig, HistoryStack, Position, SelectionRange, StateSnapshot,
};
