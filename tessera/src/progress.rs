//! Progress reporting for stitching operations.

use std::sync::atomic::{AtomicUsize, Ordering};

use common::SharedFn;
use strum_macros::Display;

/// Progress information for a stitching stage.
#[derive(Debug, Clone)]
pub struct StitchProgress {
    /// Completed units (rows, or tile pairs while weighting).
    pub current: usize,
    /// Total units for the stage.
    pub total: usize,
    pub stage: StitchStage,
}

/// Stage of a stitching operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StitchStage {
    /// Deriving overlap blend coefficients.
    Weighting,
    /// Accumulating shifted tiles into the mosaic.
    Compositing,
    /// Evaluating the spatial blend per output sample.
    Blending,
    /// Running a pre-processing filter.
    Filtering,
}

/// Callback type for progress reporting.
pub type ProgressCallback = SharedFn<dyn Fn(StitchProgress) + Send + Sync>;

/// Report progress using the callback if set.
pub fn report_progress(
    callback: &ProgressCallback,
    current: usize,
    total: usize,
    stage: StitchStage,
) {
    if let Some(f) = callback.as_ref() {
        f(StitchProgress {
            current,
            total,
            stage,
        });
    }
}

/// Counts completed units from parallel workers and forwards the running total.
pub(crate) struct ProgressCounter<'a> {
    callback: &'a ProgressCallback,
    done: AtomicUsize,
    total: usize,
    stage: StitchStage,
}

impl<'a> ProgressCounter<'a> {
    pub(crate) fn new(callback: &'a ProgressCallback, total: usize, stage: StitchStage) -> Self {
        Self {
            callback,
            done: AtomicUsize::new(0),
            total,
            stage,
        }
    }

    pub(crate) fn advance(&self, units: usize) {
        if self.callback.is_none() {
            return;
        }
        let current = self.done.fetch_add(units, Ordering::Relaxed) + units;
        report_progress(self.callback, current, self.total, self.stage);
    }
}
