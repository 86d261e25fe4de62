use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use headshot_core::pipeline::processing_config::ProcessingConfig;
use headshot_core::shared::constants::DEFAULT_ARCHIVE_NAME;

/// Defaults that persist between runs. Flags given on the command line win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub processing: ProcessingConfig,
    pub archive_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            processing: ProcessingConfig::default(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Headshot").join("settings.json"))
    }

    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// These settings with `config` as the new processing defaults. The
    /// target size is stored resolved, so an unsupported request is never
    /// persisted.
    pub fn with_processing(&self, config: &ProcessingConfig) -> Self {
        Self {
            processing: ProcessingConfig {
                target_size: config.target_size(),
                ..config.clone()
            },
            ..self.clone()
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialise settings: {e}"),
        }
    }
}
