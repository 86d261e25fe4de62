use std::sync::atomic::{AtomicBool, Ordering};

use crate::pipeline::batch_executor::{BatchExecutor, Cancelled, ImageResult, ImageTask};
use crate::shared::upload::Upload;

/// Processes images one after another on the calling thread.
pub struct SequentialBatchExecutor;

impl BatchExecutor for SequentialBatchExecutor {
    fn execute(
        &self,
        uploads: &[Upload],
        task: &ImageTask<'_>,
        cancelled: &AtomicBool,
        on_result: &mut dyn FnMut(usize, &ImageResult),
    ) -> Result<Vec<ImageResult>, Cancelled> {
        let mut results = Vec::with_capacity(uploads.len());
        for (index, upload) in uploads.iter().enumerate() {
            if cancelled.load(Ordering::Relaxed) {
                return Err(Cancelled);
            }
            let result = task(upload);
            on_result(index, &result);
            results.push(result);
        }
        Ok(results)
    }
}
