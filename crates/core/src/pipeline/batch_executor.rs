use std::sync::atomic::AtomicBool;

use crate::framing::domain::framing_decision::FramingDecision;
use crate::shared::upload::Upload;

/// A finished headshot and how it was framed.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    pub output_name: String,
    pub encoded: Vec<u8>,
    pub decision: FramingDecision,
    pub faces_detected: usize,
    /// `(stage, milliseconds)` in execution order.
    pub timings: Vec<(&'static str, f64)>,
}

/// Per-image outcome; the error is a human-readable reason.
pub type ImageResult = Result<ProcessedImage, String>;

/// Work applied to each upload. Must be callable from several threads.
pub type ImageTask<'a> = dyn Fn(&Upload) -> ImageResult + Sync + 'a;

/// The batch was aborted through its cancel flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Abstracts how per-image work is scheduled.
///
/// Images have no ordering dependency, so implementations may run them in
/// any order or concurrently, but the returned results always follow
/// `uploads` order.
pub trait BatchExecutor: Send {
    /// Runs `task` over every upload. `on_result` is invoked on the calling
    /// thread as each image finishes, with that image's input index.
    fn execute(
        &self,
        uploads: &[Upload],
        task: &ImageTask<'_>,
        cancelled: &AtomicBool,
        on_result: &mut dyn FnMut(usize, &ImageResult),
    ) -> Result<Vec<ImageResult>, Cancelled>;
}
