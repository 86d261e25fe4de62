use crate::detection::domain::face_detector::{DetectError, FaceDetector};
use crate::shared::face_rect::FaceRect;
use crate::shared::frame::Frame;

/// Decorator that drops detections below a confidence threshold.
pub struct ConfidenceFilterDetector {
    inner: Box<dyn FaceDetector>,
    min_confidence: f64,
}

impl ConfidenceFilterDetector {
    pub fn new(inner: Box<dyn FaceDetector>, min_confidence: f64) -> Result<Self, &'static str> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err("min_confidence must be within 0.0..=1.0");
        }
        Ok(Self {
            inner,
            min_confidence,
        })
    }
}

impl FaceDetector for ConfidenceFilterDetector {
    fn detect(&self, name: &str, frame: &Frame) -> Result<Vec<FaceRect>, DetectError> {
        let faces = self.inner.detect(name, frame)?;
        let total = faces.len();
        let kept: Vec<FaceRect> = faces
            .into_iter()
            .filter(|f| f.confidence >= self.min_confidence)
            .collect();
        if kept.len() < total {
            log::debug!(
                "{name}: dropped {} of {total} detections below {:.2}",
                total - kept.len(),
                self.min_confidence
            );
        }
        Ok(kept)
    }
}
