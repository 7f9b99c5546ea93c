//! Error taxonomy shared by every module.
//!
//! All operations in this crate are pure and deterministic, so errors are
//! surfaced synchronously and never retried: the same input reproduces the
//! same error.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by indexing, rating synthesis, dataset construction,
/// splitting and evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An id or index lookup missed the mapping.
    #[error("{kind} `{key}` not found")]
    KeyNotFound {
        /// What was looked up (e.g. "player id", "question index").
        kind: &'static str,
        /// The missing key, rendered for display.
        key: String,
    },

    /// Parallel arrays disagree in length, or a shape is too small for the
    /// indices it must hold.
    #[error("shape mismatch for {field}: expected {expected}, got {actual}")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter is outside its valid range.
    #[error("{name} {reason}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The evaluator saw a test user outside the train user space.
    #[error("user {user} is outside the train user space of {n_users} users")]
    UnknownUser { user: u32, n_users: usize },

    /// The interaction source failed to produce records.
    #[error("interaction source failed: {0}")]
    Source(String),
}

impl Error {
    pub(crate) fn key_not_found(kind: &'static str, key: impl std::fmt::Display) -> Self {
        Self::KeyNotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Check that a parallel column has the expected length.
    pub(crate) fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(Self::ShapeMismatch {
                field,
                expected,
                actual,
            });
        }
        Ok(())
    }
}
