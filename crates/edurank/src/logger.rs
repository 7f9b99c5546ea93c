//! Evaluation progress logging.
//!
//! [`EvalLogger`] turns evaluation milestones into `tracing` events, gated by
//! a [`Verbosity`] level. The crate never installs a subscriber; whichever the
//! caller registered receives the events.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::eval::RankingMetrics;

/// How much the evaluator reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Silent,
    /// Excluded users and degenerate evaluations.
    Warning,
    /// Batch progress and the final metric line.
    Info,
    /// Per-batch detail.
    Debug,
}

/// Emits evaluation events at or below the configured [`Verbosity`].
#[derive(Debug)]
pub struct EvalLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
}

impl EvalLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        self.verbosity >= level
    }

    pub fn start_evaluation(&mut self, n_users: usize, n_items: usize, k: usize) {
        self.started = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            tracing::info!(users = n_users, items = n_items, k, "starting ranking evaluation");
        }
    }

    /// Users with no positive test item.
    pub fn log_excluded(&self, excluded: usize) {
        if excluded > 0 && self.enabled(Verbosity::Warning) {
            tracing::warn!(excluded, "users without test positives excluded from evaluation");
        }
    }

    pub fn log_empty(&self) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!("no user has a test positive; all metrics are zero");
        }
    }

    pub fn log_batch(&self, batch: usize, n_batches: usize, users: usize, hits: usize) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(batch = batch + 1, n_batches, users, hits, "scored batch");
        } else if self.enabled(Verbosity::Info) {
            tracing::info!(batch = batch + 1, n_batches, "scored batch");
        }
    }

    pub fn finish_evaluation(&self, metrics: &RankingMetrics) {
        if self.enabled(Verbosity::Info) {
            let elapsed_ms = self
                .started
                .map_or(0, |t| t.elapsed().as_millis() as u64);
            tracing::info!(users = metrics.users_evaluated, elapsed_ms, "{metrics}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(Verbosity::Debug > Verbosity::Info);
        assert!(Verbosity::Info > Verbosity::Warning);
        assert!(Verbosity::Warning > Verbosity::Silent);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn gating_follows_verbosity() {
        let logger = EvalLogger::new(Verbosity::Warning);
        assert!(logger.enabled(Verbosity::Warning));
        assert!(!logger.enabled(Verbosity::Info));
        assert!(!EvalLogger::new(Verbosity::Silent).enabled(Verbosity::Warning));
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Verbosity::Info).unwrap(), "\"info\"");
        let parsed: Verbosity = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(parsed, Verbosity::Debug);
    }
}
