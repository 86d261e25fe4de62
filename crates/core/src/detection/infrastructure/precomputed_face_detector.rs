use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::detection::domain::face_detector::{DetectError, FaceDetector};
use crate::shared::face_rect::FaceRect;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum DetectionsError {
    #[error("failed to read detections from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid detections JSON: {0}")]
    Parse(#[source] serde_json::Error),
}

/// One detection as it appears in a detections file.
///
/// Either a pixel rectangle or a normalized `[x1, y1, x2, y2]` box, the
/// latter being what most detector heads emit.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum DetectionRecord {
    Pixel(FaceRect),
    Normalized {
        #[serde(rename = "box")]
        corners: [f64; 4],
        confidence: f64,
    },
}

impl DetectionRecord {
    fn to_face_rect(&self, image_width: u32, image_height: u32) -> FaceRect {
        match *self {
            DetectionRecord::Pixel(rect) => rect,
            DetectionRecord::Normalized {
                corners,
                confidence,
            } => FaceRect::from_normalized_corners(corners, confidence, image_width, image_height),
        }
    }
}

/// Serves detections produced ahead of time by an external detector.
///
/// The file maps upload filenames to detection lists:
///
/// ```json
/// {
///   "alice.jpg": [{ "x": 410, "y": 220, "width": 180, "height": 230, "confidence": 0.93 }],
///   "bob.png":   [{ "box": [0.31, 0.18, 0.52, 0.47], "confidence": 0.88 }]
/// }
/// ```
///
/// Images missing from the file have no faces.
pub struct PrecomputedFaceDetector {
    detections: HashMap<String, Vec<DetectionRecord>>,
}

impl PrecomputedFaceDetector {
    pub fn from_path(path: &Path) -> Result<Self, DetectionsError> {
        let json = fs::read_to_string(path).map_err(|e| DetectionsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DetectionsError> {
        let detections = serde_json::from_str(json).map_err(DetectionsError::Parse)?;
        Ok(Self { detections })
    }

    pub fn image_count(&self) -> usize {
        self.detections.len()
    }

    fn records_for(&self, name: &str) -> Option<&Vec<DetectionRecord>> {
        self.detections.get(name).or_else(|| {
            let base = Path::new(name).file_name()?.to_str()?;
            self.detections.get(base)
        })
    }
}

impl FaceDetector for PrecomputedFaceDetector {
    fn detect(&self, name: &str, frame: &Frame) -> Result<Vec<FaceRect>, DetectError> {
        let Some(records) = self.records_for(name) else {
            log::debug!("{name}: no precomputed detections");
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .map(|r| r.to_face_rect(frame.width(), frame.height()))
            .collect())
    }
}
