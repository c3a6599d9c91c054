/// Configuration for the selection history.
use caret_trail_config::TrailConfig;

/// Maximum number of snapshots kept per editing surface.
pub const DEFAULT_CAPACITY: usize = 50;

/// Configuration for a `HistoryStack`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Max snapshots kept; the oldest is evicted beyond this.
    pub capacity: usize,
    /// Ignore a recorded snapshot equal to the current entry.
    pub skip_duplicates: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            skip_duplicates: true,
        }
    }
}

impl From<&TrailConfig> for HistoryConfig {
    fn from(config: &TrailConfig) -> Self {
        Self {
            capacity: config.history_capacity.max(1),
            skip_duplicates: config.skip_duplicates,
        }
    }
}
