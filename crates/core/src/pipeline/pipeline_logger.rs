use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for batch orchestration events.
///
/// The batch use case reports through this trait so callers choose where
/// progress and timings end up.
pub trait PipelineLogger: Send {
    /// Called once per finished image, successful or not.
    fn progress(&mut self, current: usize, total: usize);

    /// Duration of one stage (`decode`, `detect`, `frame`, `render`, `archive`).
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A per-image measurement such as the number of detected faces.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// End-of-batch report. Default: no-op.
    fn summary(&self) {}
}

pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _value: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running aggregate of one stage or metric.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl Stats {
    fn record(&mut self, value: f64) {
        if self.count == 0 || value > self.max {
            self.max = value;
        }
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Forwards batch events to the `log` facade.
///
/// Progress lines are emitted every `throttle_images` images and on the
/// last one; the summary lists every stage in name order.
pub struct StdoutPipelineLogger {
    throttle_images: usize,
    stages: BTreeMap<String, Stats>,
    metrics: BTreeMap<String, Stats>,
    started: Instant,
    images_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_images: usize) -> Self {
        Self {
            throttle_images: throttle_images.max(1),
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
            started: Instant::now(),
            images_seen: 0,
        }
    }

    pub fn stage(&self, stage: &str) -> Option<Stats> {
        self.stages.get(stage).copied()
    }

    pub fn metric_stats(&self, name: &str) -> Option<Stats> {
        self.metrics.get(name).copied()
    }

    /// `None` until at least one timing or metric has been recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.started.elapsed().as_secs_f64();
        let images = self.images_seen;
        let mut lines = vec![format!(
            "Batch summary ({images} images, {elapsed_s:.1}s total):"
        )];

        for (stage, stats) in &self.stages {
            lines.push(format!(
                "  {stage:8}: avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                stats.mean(),
                stats.max,
                stats.total
            ));
        }
        for (name, stats) in &self.metrics {
            lines.push(format!("  {name}: avg {:.1}", stats.mean()));
        }
        if images > 0 && elapsed_s > 0.0 {
            lines.push(format!("  Throughput: {:.1} images/s", images as f64 / elapsed_s));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.images_seen = self.images_seen.max(current);
        if total == 0 {
            return;
        }
        if current % self.throttle_images == 0 || current == total {
            log::info!("Processed {current}/{total} images");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages.entry(stage.to_string()).or_default().record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
