use std::path::Path;

use super::constants::{ALLOWED_EXTENSIONS, OUTPUT_EXTENSION};

/// One file submitted to a batch: its original filename and raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let filename = if filename.is_empty() {
            "unknown".to_string()
        } else {
            filename
        };
        Self { filename, bytes }
    }

    /// Lowercased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    /// Archive entry name for this upload's result: the file stem plus `.png`.
    pub fn output_name(&self) -> String {
        let stem = Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");
        format!("{stem}.{OUTPUT_EXTENSION}")
    }
}
