use crate::shared::face_rect::FaceRect;
use crate::shared::frame::Frame;

pub type DetectError = Box<dyn std::error::Error + Send + Sync>;

/// Domain interface for face detection.
///
/// Images in a batch are independent, so implementations are shared across
/// worker threads and must not carry per-image state.
pub trait FaceDetector: Send + Sync {
    /// Faces in `frame`, in source-image pixel coordinates. `name` is the
    /// upload's filename, for detectors keyed on it.
    fn detect(&self, name: &str, frame: &Frame) -> Result<Vec<FaceRect>, DetectError>;
}
