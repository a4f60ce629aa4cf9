//! Editor configuration
//!
//! Optional JSON file; every field falls back to its default when missing.
//!
//! ```json
//! { "default_bpm": 120.0, "default_sector_count": 4,
//!   "frame_interval_ms": 16, "preview_duration_ms": 5000 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::{Chart, DEFAULT_BPM, DEFAULT_SECTOR_COUNT};
use crate::error::{ChartError, Result};

/// Default preview frame interval (about 60 fps).
const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Default length of a command line preview run.
const DEFAULT_PREVIEW_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tempo of newly created charts.
    pub default_bpm: f64,
    /// Sectors of newly created charts.
    pub default_sector_count: u32,
    /// Milliseconds between preview frames.
    pub frame_interval_ms: u64,
    /// How long the command line preview runs.
    pub preview_duration_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_bpm: DEFAULT_BPM,
            default_sector_count: DEFAULT_SECTOR_COUNT,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            preview_duration_ms: DEFAULT_PREVIEW_DURATION_MS,
        }
    }
}

impl EditorConfig {
    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ChartError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_bpm.is_finite() || self.default_bpm <= 0.0 {
            return Err(ChartError::Config {
                reason: format!("default_bpm must be positive, got {}", self.default_bpm),
            });
        }
        if self.frame_interval_ms == 0 {
            return Err(ChartError::Config {
                reason: "frame_interval_ms must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// An empty chart using the configured defaults.
    pub fn new_chart(&self) -> Result<Chart> {
        Ok(Chart::with_settings(self.default_bpm, self.default_sector_count)?)
    }
}
