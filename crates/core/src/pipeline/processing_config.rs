use serde::{Deserialize, Serialize};

use crate::shared::constants::{DEFAULT_MIN_CONFIDENCE, DEFAULT_TARGET_SIZE, VALID_TARGET_SIZES};

/// Tunables for a processing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Requested output edge in pixels; see [`ProcessingConfig::target_size`].
    pub target_size: u32,
    pub min_confidence: f64,
    pub workers: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            workers: 1,
        }
    }
}

impl ProcessingConfig {
    /// Effective output edge: the requested size when it is one of
    /// `VALID_TARGET_SIZES`, otherwise the default.
    pub fn target_size(&self) -> u32 {
        resolve_target_size(self.target_size)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "Minimum confidence must be between 0.0 and 1.0, got {}",
                self.min_confidence
            ));
        }
        if self.workers == 0 {
            return Err("Workers must be at least 1".to_string());
        }
        Ok(())
    }
}

pub fn resolve_target_size(requested: u32) -> u32 {
    if VALID_TARGET_SIZES.contains(&requested) {
        requested
    } else {
        DEFAULT_TARGET_SIZE
    }
}
