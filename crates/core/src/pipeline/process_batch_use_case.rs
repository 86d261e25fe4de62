use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::archive::domain::archive_entry::ArchiveEntry;
use crate::archive::domain::archive_error::UnsupportedInputError;
use crate::archive::domain::archive_writer::ArchiveWriter;
use crate::detection::domain::face_detector::FaceDetector;
use crate::framing::domain::framing_decision::FramingDecision;
use crate::imaging::domain::image_codec::ImageCodec;
use crate::pipeline::batch_executor::{BatchExecutor, ImageResult, ProcessedImage};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::crop_region::CropRegion;
use crate::shared::face_rect::FaceRect;
use crate::shared::upload::Upload;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No files uploaded")]
    NoFilesUploaded,
    #[error("{}", no_images_message(.errors))]
    NoImagesProcessed { errors: Vec<String> },
    #[error("Batch cancelled")]
    Cancelled,
    #[error("failed to build archive: {0}")]
    Archive(#[from] UnsupportedInputError),
}

fn no_images_message(errors: &[String]) -> String {
    if errors.is_empty() {
        "No images processed".to_string()
    } else {
        format!("No images processed: {}", errors.join("; "))
    }
}

/// How one upload ended up in the archive.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageReport {
    pub source: String,
    pub output_name: String,
    pub face: Option<FaceRect>,
    pub crop: CropRegion,
    pub faces_detected: usize,
}

/// Archive bytes plus per-image bookkeeping for a completed batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub archive: Vec<u8>,
    pub reports: Vec<ImageReport>,
    /// `"{filename}: {reason}"` for every upload that was left out.
    pub errors: Vec<String>,
}

impl BatchOutcome {
    pub fn processed(&self) -> usize {
        self.reports.len()
    }
}

/// Batch headshot pipeline: filter → decode → detect → frame → render → archive.
pub struct ProcessBatchUseCase {
    codec: Box<dyn ImageCodec>,
    detector: Box<dyn FaceDetector>,
    archive_writer: Box<dyn ArchiveWriter>,
    executor: Box<dyn BatchExecutor>,
    logger: Box<dyn PipelineLogger>,
    target_size: u32,
    cancelled: Arc<AtomicBool>,
}

impl ProcessBatchUseCase {
    pub fn new(
        codec: Box<dyn ImageCodec>,
        detector: Box<dyn FaceDetector>,
        archive_writer: Box<dyn ArchiveWriter>,
        executor: Box<dyn BatchExecutor>,
        logger: Box<dyn PipelineLogger>,
        target_size: u32,
    ) -> Self {
        Self {
            codec,
            detector,
            archive_writer,
            executor,
            logger,
            target_size,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares an externally owned cancel flag; setting it aborts the batch.
    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn execute(&mut self, uploads: &[Upload]) -> Result<BatchOutcome, BatchError> {
        if uploads.is_empty() {
            return Err(BatchError::NoFilesUploaded);
        }

        let mut errors: Vec<Option<String>> = vec![None; uploads.len()];
        let mut accepted = Vec::with_capacity(uploads.len());
        let mut accepted_index = Vec::with_capacity(uploads.len());
        for (i, upload) in uploads.iter().enumerate() {
            if upload.has_allowed_extension() {
                accepted.push(upload.clone());
                accepted_index.push(i);
            } else {
                log::warn!("Skipping {}: unsupported format", upload.filename);
                errors[i] = Some(format!("{}: unsupported format", upload.filename));
            }
        }

        let codec = &*self.codec;
        let detector = &*self.detector;
        let target_size = self.target_size;
        let task = |upload: &Upload| process_upload(codec, detector, upload, target_size);

        let total = accepted.len();
        let mut completed = 0;
        let logger = &mut self.logger;
        let results = self
            .executor
            .execute(&accepted, &task, &self.cancelled, &mut |_, result| {
                completed += 1;
                record(&mut **logger, result);
                logger.progress(completed, total);
            })
            .map_err(|_| BatchError::Cancelled)?;

        let mut entries: Vec<ArchiveEntry> = Vec::with_capacity(results.len());
        let mut reports: Vec<ImageReport> = Vec::with_capacity(results.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (result, &i) in results.into_iter().zip(&accepted_index) {
            let upload = &uploads[i];
            let image = match result {
                Ok(image) => image,
                Err(reason) => {
                    log::warn!("Error processing {}: {reason}", upload.filename);
                    errors[i] = Some(format!("{}: {reason}", upload.filename));
                    continue;
                }
            };

            let report = ImageReport {
                source: upload.filename.clone(),
                output_name: image.output_name.clone(),
                face: image.decision.face,
                crop: image.decision.crop,
                faces_detected: image.faces_detected,
            };

            // Same output name: the later image replaces the earlier one in place.
            if let Some(&pos) = positions.get(&image.output_name) {
                log::warn!(
                    "{} replaces earlier output {}",
                    upload.filename,
                    image.output_name
                );
                entries[pos].data = image.encoded;
                reports[pos] = report;
            } else {
                positions.insert(image.output_name.clone(), entries.len());
                entries.push(ArchiveEntry::new(image.output_name, image.encoded));
                reports.push(report);
            }
        }

        let errors: Vec<String> = errors.into_iter().flatten().collect();
        if entries.is_empty() {
            return Err(BatchError::NoImagesProcessed { errors });
        }

        let start = Instant::now();
        let archive = self.archive_writer.write(&entries)?;
        self.logger
            .timing("archive", start.elapsed().as_secs_f64() * 1000.0);
        self.logger.info(&format!(
            "Packed {} headshots into {} bytes",
            entries.len(),
            archive.len()
        ));
        self.logger.summary();

        Ok(BatchOutcome {
            archive,
            reports,
            errors,
        })
    }
}

fn record(logger: &mut dyn PipelineLogger, result: &ImageResult) {
    if let Ok(image) = result {
        for &(stage, ms) in &image.timings {
            logger.timing(stage, ms);
        }
        logger.metric("faces", image.faces_detected as f64);
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Runs one upload through decode → detect → frame → render.
fn process_upload(
    codec: &dyn ImageCodec,
    detector: &dyn FaceDetector,
    upload: &Upload,
    target_size: u32,
) -> ImageResult {
    let mut timings = Vec::with_capacity(4);

    let start = Instant::now();
    let frame = codec
        .decode(&upload.bytes)
        .map_err(|e| format!("decode failed: {e}"))?;
    timings.push(("decode", elapsed_ms(start)));

    let start = Instant::now();
    let faces = detector
        .detect(&upload.filename, &frame)
        .map_err(|e| format!("detection failed: {e}"))?;
    timings.push(("detect", elapsed_ms(start)));

    let start = Instant::now();
    let decision = FramingDecision::decide(&faces, frame.width(), frame.height());
    timings.push(("frame", elapsed_ms(start)));

    if decision.used_fallback() {
        log::debug!("{}: no face found, using centered crop", upload.filename);
    }

    let start = Instant::now();
    let encoded = codec
        .render(&frame, decision.crop, target_size)
        .map_err(|e| format!("render failed: {e}"))?;
    timings.push(("render", elapsed_ms(start)));

    Ok(ProcessedImage {
        output_name: upload.output_name(),
        encoded,
        decision,
        faces_detected: faces.len(),
        timings,
    })
}
