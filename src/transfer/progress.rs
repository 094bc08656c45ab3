//! Weighted progress aggregation for one job

use super::types::{TransferProgress, PROGRESS_BUDGET};

/// Single progress counter fed by per-task fractional reports.
///
/// Each report only contributes the delta since that task's previous report, so the
/// counter never moves backwards no matter how reports from different tasks interleave.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    weights: Vec<f64>,
    fractions: Vec<f64>,
    done: Vec<bool>,
    completed: usize,
    counter: f64,
    /// `None` until the first report: progress is unknown at job start.
    last_reported: Option<f64>,
    last_completed: usize,
}

impl ProgressTracker {
    pub fn new(weights: Vec<f64>) -> Self {
        let count = weights.len();
        Self {
            weights,
            fractions: vec![0.0; count],
            done: vec![false; count],
            completed: 0,
            counter: 0.0,
            last_reported: None,
            last_completed: 0,
        }
    }

    /// Record that task `id` is `fraction` done. Returns the new aggregate when it rose.
    pub fn advance(&mut self, id: usize, fraction: f64) -> Option<TransferProgress> {
        if id >= self.weights.len() || self.done[id] || !fraction.is_finite() {
            return None;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        self.apply(id, fraction)
    }

    /// Mark task `id` finished. Once every task is finished the aggregate is exactly 100.
    pub fn complete(&mut self, id: usize) -> Option<TransferProgress> {
        if id >= self.weights.len() || self.done[id] {
            return None;
        }
        self.done[id] = true;
        self.completed += 1;
        if self.completed == self.weights.len() {
            self.fractions[id] = 1.0;
            self.counter = PROGRESS_BUDGET;
            return self.publish();
        }
        self.apply(id, 1.0).or_else(|| self.publish())
    }

    /// Close out the job, forcing the counter to 100 regardless of rounding drift.
    pub fn finish(&mut self) -> Option<TransferProgress> {
        self.completed = self.weights.len();
        self.counter = PROGRESS_BUDGET;
        self.publish()
    }

    pub fn percent(&self) -> Option<f64> {
        self.last_reported
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.weights.len()
    }

    fn apply(&mut self, id: usize, fraction: f64) -> Option<TransferProgress> {
        let previous = self.fractions[id];
        if fraction <= previous {
            return None;
        }
        self.fractions[id] = fraction;
        self.counter += (fraction - previous) * self.weights[id];
        self.publish()
    }

    fn publish(&mut self) -> Option<TransferProgress> {
        let percent = self.counter.clamp(0.0, PROGRESS_BUDGET);
        if let Some(last) = self.last_reported {
            if percent < last || (percent == last && self.completed == self.last_completed) {
                return None;
            }
        }
        self.last_reported = Some(percent);
        self.last_completed = self.completed;
        Some(TransferProgress {
            percent,
            completed: self.completed,
            total: self.weights.len(),
        })
    }
}
