use crate::detection::domain::face_detector::{DetectError, FaceDetector};
use crate::shared::face_rect::FaceRect;
use crate::shared::frame::Frame;

/// Detector that never finds a face, so every image takes the fallback crop.
pub struct NullFaceDetector;

impl FaceDetector for NullFaceDetector {
    fn detect(&self, _name: &str, _frame: &Frame) -> Result<Vec<FaceRect>, DetectError> {
        Ok(Vec::new())
    }
}
