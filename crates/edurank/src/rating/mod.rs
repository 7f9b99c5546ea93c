//! Implicit-feedback rating synthesis.
//!
//! Each interaction's raw signals (correctness, difficulty, elapsed time,
//! answer changes, hint use) are blended into one scalar weight:
//!
//! ```text
//! weight = w_p · performance + w_e · efficiency + w_s · strategy
//! ```
//!
//! All scores are computed element-wise over equal-length columns
//! ([`SignalsView`]). The weight is a blended strength of interest and is
//! not guaranteed to be non-negative.
//!
//! # Example
//!
//! ```
//! use edurank::rating::{Interaction, RatingConfig};
//!
//! let record = Interaction {
//!     student_id: "s1".into(),
//!     question_id: "q1".into(),
//!     answer_status: true,
//!     difficulty: 5,
//!     difficulty_feedback: 5,
//!     time_span: 30.0,
//!     selection_change: 0,
//!     hint_used: false,
//!     start_time: 0,
//! };
//!
//! let weights = RatingConfig::default().rate_interactions(&[record]);
//! assert!((weights[0] - 0.590515).abs() < 1e-6);
//! ```

mod config;
mod performance;
mod signals;

pub use config::{
    RatingConfig, RatingConfigBuilder, DEFAULT_K_SELECTION, DEFAULT_K_TIME, DEFAULT_MID,
    DEFAULT_W_EFFICIENCY, DEFAULT_W_PERFORMANCE, DEFAULT_W_STRATEGY,
};
pub use performance::{
    efficiency, performance, performance_score, strategy, LogarithmicDecay, LogisticDecay,
    PerformanceModel, TimeDecay,
};
pub use signals::{Interaction, Signals, SignalsView};
