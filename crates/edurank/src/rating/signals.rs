//! Raw interaction records and their columnar signal layout.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One student–question interaction as delivered by the data source.
///
/// The source is expected to hand over at most one record per
/// `(student_id, question_id)` pair; see
/// [`deduplicate_latest`](crate::source::deduplicate_latest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub student_id: String,
    pub question_id: String,
    /// Whether the submitted answer was correct.
    pub answer_status: bool,
    /// Difficulty assigned to the question.
    pub difficulty: i32,
    /// Difficulty reported by the student. `0` means unset.
    pub difficulty_feedback: i32,
    /// Seconds spent on the question.
    pub time_span: f64,
    /// How many times the student changed the selected answer.
    pub selection_change: u32,
    pub hint_used: bool,
    /// Start of the interaction, as a Unix timestamp in seconds.
    pub start_time: i64,
}

/// Owned signal columns, one entry per interaction.
///
/// All columns are `f64`; booleans are encoded as `0.0` / `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    answer_state: Array1<f64>,
    difficulty: Array1<f64>,
    difficulty_feedback: Array1<f64>,
    time_span: Array1<f64>,
    selection_change: Array1<f64>,
    hint_used: Array1<f64>,
}

impl Signals {
    /// Extract the signal columns from interaction records.
    pub fn from_interactions(records: &[Interaction]) -> Self {
        let column = |f: fn(&Interaction) -> f64| records.iter().map(f).collect::<Array1<f64>>();
        Self {
            answer_state: column(|r| f64::from(u8::from(r.answer_status))),
            difficulty: column(|r| f64::from(r.difficulty)),
            difficulty_feedback: column(|r| f64::from(r.difficulty_feedback)),
            time_span: column(|r| r.time_span),
            selection_change: column(|r| f64::from(r.selection_change)),
            hint_used: column(|r| f64::from(u8::from(r.hint_used))),
        }
    }

    /// Number of interactions.
    pub fn len(&self) -> usize {
        self.answer_state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answer_state.is_empty()
    }

    /// Borrow the columns as a validated view.
    pub fn view(&self) -> SignalsView<'_> {
        // Columns are built together from the same records.
        SignalsView {
            answer_state: self.answer_state.view(),
            difficulty: self.difficulty.view(),
            difficulty_feedback: self.difficulty_feedback.view(),
            time_span: self.time_span.view(),
            selection_change: self.selection_change.view(),
            hint_used: self.hint_used.view(),
        }
    }
}

/// Borrowed signal columns of equal length.
///
/// Inputs are always arrays: a single interaction is a length-1 array, and
/// columns of different lengths are rejected rather than broadcast.
#[derive(Debug, Clone, Copy)]
pub struct SignalsView<'a> {
    pub(crate) answer_state: ArrayView1<'a, f64>,
    pub(crate) difficulty: ArrayView1<'a, f64>,
    pub(crate) difficulty_feedback: ArrayView1<'a, f64>,
    pub(crate) time_span: ArrayView1<'a, f64>,
    pub(crate) selection_change: ArrayView1<'a, f64>,
    pub(crate) hint_used: ArrayView1<'a, f64>,
}

impl<'a> SignalsView<'a> {
    /// Build a view from individual columns.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if any column differs in length from
    /// `answer_state`.
    pub fn new(
        answer_state: ArrayView1<'a, f64>,
        difficulty: ArrayView1<'a, f64>,
        difficulty_feedback: ArrayView1<'a, f64>,
        time_span: ArrayView1<'a, f64>,
        selection_change: ArrayView1<'a, f64>,
        hint_used: ArrayView1<'a, f64>,
    ) -> Result<Self> {
        let n = answer_state.len();
        Error::check_len("difficulty", n, difficulty.len())?;
        Error::check_len("difficulty_feedback", n, difficulty_feedback.len())?;
        Error::check_len("time_span", n, time_span.len())?;
        Error::check_len("selection_change", n, selection_change.len())?;
        Error::check_len("hint_used", n, hint_used.len())?;

        Ok(Self {
            answer_state,
            difficulty,
            difficulty_feedback,
            time_span,
            selection_change,
            hint_used,
        })
    }

    pub fn len(&self) -> usize {
        self.answer_state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answer_state.is_empty()
    }

    pub fn answer_state(&self) -> ArrayView1<'a, f64> {
        self.answer_state
    }

    pub fn selection_change(&self) -> ArrayView1<'a, f64> {
        self.selection_change
    }

    pub fn hint_used(&self) -> ArrayView1<'a, f64> {
        self.hint_used
    }
}
