// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Progress
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Observers for sampling progress.
//!
//! Progress advances once per completed slice along the outermost (x) axis,
//! independent of how many inner cells a slice holds. Observers only watch;
//! they cannot influence the sampling result.

use tracing::info;

pub trait ProgressSink {
    /// Called once before the first cell with the number of outer slices.
    fn begin(&mut self, _total_slices: usize) {}

    /// Called after each completed outer slice.
    fn advance(&mut self, completed: usize, total_slices: usize);

    /// Called once after the last slice.
    fn finish(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&mut self, _completed: usize, _total_slices: usize) {}
}

/// Logs progress through `tracing`, at most once per percentage step.
#[derive(Debug, Clone)]
pub struct LogProgress {
    step_percent: usize,
    last_reported: Option<usize>,
}

impl LogProgress {
    /// Report every `step_percent` percent (clamped to 1..=100).
    pub fn new(step_percent: usize) -> Self {
        LogProgress {
            step_percent: step_percent.clamp(1, 100),
            last_reported: None,
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressSink for LogProgress {
    fn begin(&mut self, total_slices: usize) {
        self.last_reported = None;
        info!("Sampling {total_slices} x-slice(s)");
    }

    fn advance(&mut self, completed: usize, total_slices: usize) {
        let total = total_slices.max(1);
        let percent = completed * 100 / total;
        let bucket = percent / self.step_percent;
        if self.last_reported == Some(bucket) && completed < total {
            return;
        }
        self.last_reported = Some(bucket);
        info!("slice {completed}/{total_slices} ({percent}%)");
    }

    fn finish(&mut self) {
        info!("Sampling complete");
    }
}

/// Records every callback. Useful for checking progress granularity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingProgress {
    pub total: Option<usize>,
    pub steps: Vec<usize>,
    pub finished: bool,
}

impl ProgressSink for RecordingProgress {
    fn begin(&mut self, total_slices: usize) {
        self.total = Some(total_slices);
    }

    fn advance(&mut self, completed: usize, _total_slices: usize) {
        self.steps.push(completed);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
