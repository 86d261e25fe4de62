use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::pipeline::batch_executor::{BatchExecutor, Cancelled, ImageResult, ImageTask};
use crate::shared::upload::Upload;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

/// Processes images on a fixed pool of worker threads.
///
/// Layout: `feeder → [worker × N] → main [reorder]`
///
/// Each result carries its input index, so the main thread can slot it back
/// into upload order however the workers interleave.
pub struct ThreadedBatchExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedBatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl BatchExecutor for ThreadedBatchExecutor {
    fn execute(
        &self,
        uploads: &[Upload],
        task: &ImageTask<'_>,
        cancelled: &AtomicBool,
        on_result: &mut dyn FnMut(usize, &ImageResult),
    ) -> Result<Vec<ImageResult>, Cancelled> {
        let total = uploads.len();
        let mut slots: Vec<Option<ImageResult>> = (0..total).map(|_| None).collect();

        thread::scope(|scope| {
            let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, &Upload)>(self.channel_capacity);
            let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, ImageResult)>();

            let feeder = scope.spawn(move || {
                for job in uploads.iter().enumerate() {
                    if cancelled.load(Ordering::Relaxed) || job_tx.send(job).is_err() {
                        break;
                    }
                }
            });

            let workers: Vec<_> = (0..self.workers.min(total.max(1)))
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || {
                        for (index, upload) in job_rx {
                            if cancelled.load(Ordering::Relaxed) {
                                break;
                            }
                            if result_tx.send((index, task(upload))).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();
            drop(job_rx);
            drop(result_tx);

            for (index, result) in result_rx {
                on_result(index, &result);
                slots[index] = Some(result);
            }

            if feeder.join().is_err() {
                log::error!("Batch feeder thread panicked");
            }
            for handle in workers {
                if handle.join().is_err() {
                    log::error!("Batch worker thread panicked");
                }
            }
        });

        // A flag raised after the last image finished leaves nothing undone.
        if slots.iter().any(Option::is_none) && cancelled.load(Ordering::Relaxed) {
            return Err(Cancelled);
        }

        Ok(slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err("worker thread stopped unexpectedly".to_string())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::framing::domain::framing_decision::FramingDecision;
    use crate::pipeline::batch_executor::ProcessedImage;

    fn uploads(n: usize) -> Vec<Upload> {
        (0..n)
            .map(|i| Upload::new(format!("{i}.jpg"), vec![i as u8]))
            .collect()
    }

    /// Earlier uploads sleep longer, so completion order is reversed.
    fn slow_first_task(upload: &Upload) -> ImageResult {
        let i = upload.bytes[0] as u64;
        thread::sleep(Duration::from_millis(5 * (8 - i.min(8))));
        Ok(ProcessedImage {
            output_name: upload.output_name(),
            encoded: upload.bytes.clone(),
            decision: FramingDecision::decide(&[], 10, 10),
            faces_detected: 0,
            timings: Vec::new(),
        })
    }

    #[test]
    fn test_results_reassembled_in_input_order() {
        let flag = AtomicBool::new(false);
        let executor = ThreadedBatchExecutor::new(4);
        let results = executor
            .execute(&uploads(8), &slow_first_task, &flag, &mut |_, _| {})
            .unwrap();
        let names: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().output_name)
            .collect();
        let expected: Vec<_> = (0..8).map(|i| format!("{i}.png")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_on_result_sees_every_index_once() {
        let flag = AtomicBool::new(false);
        let mut seen = Vec::new();
        ThreadedBatchExecutor::new(3)
            .execute(&uploads(6), &slow_first_task, &flag, &mut |i, _| seen.push(i))
            .unwrap();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_batch() {
        let flag = AtomicBool::new(false);
        let results = ThreadedBatchExecutor::new(2)
            .execute(&[], &slow_first_task, &flag, &mut |_, _| {})
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_failures_stay_in_their_slot() {
        let flag = AtomicBool::new(false);
        let task = |upload: &Upload| -> ImageResult {
            if upload.bytes[0] % 2 == 1 {
                Err(format!("{}: odd", upload.filename))
            } else {
                slow_first_task(upload)
            }
        };
        let results = ThreadedBatchExecutor::new(2)
            .execute(&uploads(4), &task, &flag, &mut |_, _| {})
            .unwrap();
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err(), "1.jpg: odd");
        assert!(results[2].is_ok());
        assert!(results[3].is_err());
    }

    #[test]
    fn test_cancel_flag_aborts_batch() {
        let flag = AtomicBool::new(false);
        let started = Mutex::new(0usize);
        let task = |upload: &Upload| -> ImageResult {
            *started.lock().unwrap() += 1;
            flag.store(true, Ordering::Relaxed);
            Err(upload.filename.clone())
        };
        let result = ThreadedBatchExecutor::new(1).execute(&uploads(50), &task, &flag, &mut |_, _| {});
        assert_eq!(result.err(), Some(Cancelled));
        assert!(*started.lock().unwrap() < 50);
    }

    #[test]
    fn test_cancel_after_last_image_still_succeeds() {
        let flag = AtomicBool::new(false);
        let task = |upload: &Upload| -> ImageResult {
            if upload.filename == "2.jpg" {
                flag.store(true, Ordering::Relaxed);
            }
            slow_first_task(upload)
        };
        // A single worker handles images in order, so the flag is raised
        // while the last one is being processed.
        let results = ThreadedBatchExecutor::new(1)
            .execute(&uploads(3), &task, &flag, &mut |_, _| {})
            .unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_zero_workers_is_raised_to_one() {
        assert_eq!(ThreadedBatchExecutor::new(0).workers(), 1);
    }
}
