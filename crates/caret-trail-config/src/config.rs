/// Application configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name used for the configuration file.
const CONFIG_FILE_NAME: &str = "caret-trail.json";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "CARET_TRAIL_CONFIG";

/// Upper bound for `history_capacity`.
pub const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Maximum number of selection snapshots kept per editing surface.
    pub history_capacity: usize,
    /// Skip recording a snapshot that equals the current history entry.
    pub skip_duplicates: bool,
    /// Scroll the primary range into view after a soft undo/redo.
    pub reveal_on_restore: bool,
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            skip_duplicates: true,
            reveal_on_restore: true,
            log_filter: "info".to_string(),
        }
    }
}

impl TrailConfig {
    /// Returns the config file path.
    ///
    /// Resolution order:
    /// 1. `CARET_TRAIL_CONFIG` environment variable
    /// 2. `caret-trail.json` next to the executable
    /// 3. `caret-trail/caret-trail.json` under the user's config directory
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
            .or_else(|| dirs::config_dir().map(|d| d.join("caret-trail").join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (unreadable file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<TrailConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Don't overwrite a broken file
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Clamps values to valid ranges and resets invalid fields.
    pub fn sanitize(&mut self) {
        self.history_capacity = self.history_capacity.clamp(1, MAX_HISTORY_CAPACITY);
        if self.log_filter.trim().is_empty() {
            self.log_filter = "info".to_string();
        }
    }
}
