//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use edurank::{Interaction, InteractionDataset, RatingConfig};

static TRACING: Once = Once::new();

/// Route `tracing` events to the test harness output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn record(student: &str, question: &str, start_time: i64) -> Interaction {
    Interaction {
        student_id: student.into(),
        question_id: question.into(),
        answer_status: true,
        difficulty: 3,
        difficulty_feedback: 3,
        time_span: 40.0,
        selection_change: 1,
        hint_used: false,
        start_time,
    }
}

/// A few hundred observations over 60 students and 40 questions.
pub fn synthetic() -> InteractionDataset {
    edurank::testing::synthetic_dataset(60, 40, 0.25, 2024).unwrap()
}

/// The default rating configuration.
pub fn default_config() -> RatingConfig {
    RatingConfig::default()
}
