//! Sub-scores of the rating blend.
//!
//! - performance: correctness scaled by difficulty and a decay in elapsed time
//! - efficiency: `1 / (1 + k · selection_change)`
//! - strategy: `1 - hint_used`
//!
//! The time decay of the performance score is pluggable through
//! [`PerformanceModel`].

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use super::SignalsView;
use crate::error::Error;

/// Normalising constant applied to every performance score.
const PERFORMANCE_SCALE: f64 = 3.0;

// =============================================================================
// Time decay
// =============================================================================

/// A decay of performance with elapsed time.
pub trait TimeDecay {
    /// Factor in `[0, 1]` for a non-negative `elapsed` time.
    fn factor(&self, elapsed: f64, k: f64, mid: f64) -> f64;

    /// Name used in configuration.
    fn name(&self) -> &'static str;
}

/// Logistic decay centred at `mid`: `1 / (1 + e^{k (t - mid)})`.
///
/// Evaluated in its two numerically stable forms on either side of `mid`,
/// which agree at `t = mid`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogisticDecay;

impl TimeDecay for LogisticDecay {
    #[inline]
    fn factor(&self, elapsed: f64, k: f64, mid: f64) -> f64 {
        let diff = elapsed - mid;
        if diff < 0.0 {
            1.0 / (1.0 + (k * diff).exp())
        } else {
            let tail = (-k * diff).exp();
            tail / (1.0 + tail)
        }
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}

/// Logarithmic decay: `1 / (1 + k ln(1 + t / mid))`.
///
/// Starts at 1 for instant answers and decays slowly without a plateau.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LogarithmicDecay;

impl TimeDecay for LogarithmicDecay {
    #[inline]
    fn factor(&self, elapsed: f64, k: f64, mid: f64) -> f64 {
        1.0 / (1.0 + k * (elapsed / mid).ln_1p())
    }

    fn name(&self) -> &'static str {
        "logarithmic"
    }
}

/// Performance model selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceModel {
    /// [`LogisticDecay`].
    #[default]
    Logistic,
    /// [`LogarithmicDecay`].
    Logarithmic,
}

impl PerformanceModel {
    /// Time factor of the selected decay.
    #[inline]
    pub fn factor(self, elapsed: f64, k: f64, mid: f64) -> f64 {
        match self {
            Self::Logistic => LogisticDecay.factor(elapsed, k, mid),
            Self::Logarithmic => LogarithmicDecay.factor(elapsed, k, mid),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Logistic => LogisticDecay.name(),
            Self::Logarithmic => LogarithmicDecay.name(),
        }
    }
}

impl fmt::Display for PerformanceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PerformanceModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logistic" => Ok(Self::Logistic),
            "logarithmic" => Ok(Self::Logarithmic),
            other => Err(Error::invalid(
                "performance model",
                other,
                "must be one of `logistic`, `logarithmic`",
            )),
        }
    }
}

// =============================================================================
// Element-wise scores
// =============================================================================

/// Performance score of a single interaction.
///
/// Negative elapsed times are clamped to zero, an unset (`0`) difficulty
/// feedback falls back to the item difficulty, and a feedback that is still
/// zero yields a score of zero.
#[inline]
pub fn performance_score(
    model: PerformanceModel,
    answer_state: f64,
    difficulty: f64,
    difficulty_feedback: f64,
    time_span: f64,
    k: f64,
    mid: f64,
) -> f64 {
    let elapsed = time_span.max(0.0);
    let feedback = if difficulty_feedback == 0.0 {
        difficulty
    } else {
        difficulty_feedback
    };
    if feedback == 0.0 {
        return 0.0;
    }

    answer_state * difficulty * model.factor(elapsed, k, mid) / feedback / PERFORMANCE_SCALE
}

/// Performance scores for every interaction in `signals`.
pub fn performance(
    model: PerformanceModel,
    signals: &SignalsView<'_>,
    k: f64,
    mid: f64,
) -> Array1<f64> {
    Zip::from(&signals.answer_state)
        .and(&signals.difficulty)
        .and(&signals.difficulty_feedback)
        .and(&signals.time_span)
        .map_collect(|&answer, &difficulty, &feedback, &time| {
            performance_score(model, answer, difficulty, feedback, time, k, mid)
        })
}

/// Efficiency scores, in `(0, 1]` and decreasing in the number of changes.
///
/// Change counts are non-negative; negative inputs are treated as zero.
pub fn efficiency(selection_change: ArrayView1<'_, f64>, k: f64) -> Array1<f64> {
    selection_change.mapv(|changes| 1.0 / (1.0 + k * changes.max(0.0)))
}

/// Strategy scores: `1` without a hint, `0` with one.
pub fn strategy(hint_used: ArrayView1<'_, f64>) -> Array1<f64> {
    hint_used.mapv(|hint| 1.0 - hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    #[case(PerformanceModel::Logistic)]
    #[case(PerformanceModel::Logarithmic)]
    fn continuous_at_mid(#[case] model: PerformanceModel) {
        let mid = 60.0;
        let at = performance_score(model, 1.0, 4.0, 2.0, mid, 0.1, mid);
        let below = performance_score(model, 1.0, 4.0, 2.0, mid - 1e-9, 0.1, mid);
        let above = performance_score(model, 1.0, 4.0, 2.0, mid + 1e-9, 0.1, mid);
        assert_abs_diff_eq!(at, below, epsilon = 1e-9);
        assert_abs_diff_eq!(at, above, epsilon = 1e-9);
    }

    #[test]
    fn logistic_branches_match_reference_sigmoid() {
        for t in [0.0, 15.0, 59.0, 60.0, 61.0, 120.0, 900.0] {
            let expected = 1.0 / (1.0 + (0.1f64 * (t - 60.0)).exp());
            assert_abs_diff_eq!(LogisticDecay.factor(t, 0.1, 60.0), expected, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(LogisticDecay.factor(60.0, 0.1, 60.0), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn logistic_tail_does_not_overflow() {
        let factor = LogisticDecay.factor(1e6, 0.1, 60.0);
        assert!(factor.is_finite());
        assert!(factor >= 0.0);
    }

    #[test]
    fn elapsed_time_clamped_to_zero() {
        let negative = performance_score(PerformanceModel::Logistic, 1.0, 2.0, 2.0, -30.0, 0.1, 60.0);
        let zero = performance_score(PerformanceModel::Logistic, 1.0, 2.0, 2.0, 0.0, 0.1, 60.0);
        assert_eq!(negative, zero);
    }

    #[test]
    fn unset_feedback_falls_back_to_difficulty() {
        let unset = performance_score(PerformanceModel::Logistic, 1.0, 5.0, 0.0, 30.0, 0.1, 60.0);
        let same = performance_score(PerformanceModel::Logistic, 1.0, 5.0, 5.0, 30.0, 0.1, 60.0);
        assert_eq!(unset, same);
        assert_eq!(
            performance_score(PerformanceModel::Logistic, 1.0, 0.0, 0.0, 30.0, 0.1, 60.0),
            0.0
        );
    }

    #[test]
    fn wrong_answer_scores_zero() {
        let score = performance_score(PerformanceModel::Logarithmic, 0.0, 5.0, 3.0, 10.0, 0.1, 60.0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn efficiency_bounded_and_decreasing() {
        let changes = array![0.0, 1.0, 2.0, 5.0, 40.0, 1000.0];
        let scores = efficiency(changes.view(), 0.05);
        assert_eq!(scores[0], 1.0);
        for pair in scores.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        assert!(scores.iter().all(|&s| s > 0.0 && s <= 1.0));
    }

    #[test]
    fn strategy_is_exact() {
        let scores = strategy(array![0.0, 1.0, 0.0].view());
        assert_eq!(scores, array![1.0, 0.0, 1.0]);
    }

    #[test]
    fn model_names_round_trip() {
        for model in [PerformanceModel::Logistic, PerformanceModel::Logarithmic] {
            assert_eq!(model.to_string().parse::<PerformanceModel>().unwrap(), model);
        }
        assert!(matches!(
            "exponential".parse::<PerformanceModel>(),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
