//! Interaction dataset container.

use ndarray::{Array1, Array2, ArrayView1};

use super::{CsrMatrix, FeatureTable, ObservationArrays};
use crate::error::{Error, Result};
use crate::index::IdIndex;
use crate::rating::{Interaction, RatingConfig};
use crate::source::{deduplicate_latest, InteractionSource};

/// Players, questions and their weighted interactions.
///
/// # Storage Layout
///
/// Observations are parallel columns: position `i` of
/// `observation_players`, `observation_questions`, `weights` and (when present)
/// `answer_state` describe the same interaction. Players and questions are
/// addressed by their dense index from the two [`IdIndex`] maps.
///
/// The dataset is immutable once built; every view is a pure projection.
///
/// # Example
///
/// ```
/// use edurank::data::InteractionDataset;
/// use edurank::IdIndex;
/// use ndarray::array;
///
/// let ds = InteractionDataset::new(
///     IdIndex::from_ids(vec!["s1".to_string(), "s2".to_string()]),
///     IdIndex::from_ids(vec!["q1".to_string(), "q2".to_string()]),
///     vec![0, 0, 1],
///     vec![0, 1, 0],
///     array![0.7, -0.3, 0.9],
/// )
/// .unwrap();
///
/// let presence = ds.build_sparse(false).unwrap();
/// assert_eq!(presence.data(), &[1.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionDataset {
    players: IdIndex<String>,
    questions: IdIndex<String>,
    observation_players: Vec<u32>,
    observation_questions: Vec<u32>,
    weights: Array1<f64>,
    answer_state: Option<Array1<bool>>,
    player_features: Option<FeatureTable>,
    question_features: Option<FeatureTable>,
}

impl InteractionDataset {
    /// Create a dataset from indexes and aligned observation columns.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the columns differ in length, or an
    /// observation refers to an index outside its [`IdIndex`].
    pub fn new(
        players: IdIndex<String>,
        questions: IdIndex<String>,
        observation_players: Vec<u32>,
        observation_questions: Vec<u32>,
        weights: Array1<f64>,
    ) -> Result<Self> {
        let n = observation_players.len();
        Error::check_len("observation questions", n, observation_questions.len())?;
        Error::check_len("weights", n, weights.len())?;
        check_bound("player indices", &observation_players, players.len())?;
        check_bound("question indices", &observation_questions, questions.len())?;

        Ok(Self {
            players,
            questions,
            observation_players,
            observation_questions,
            weights,
            answer_state: None,
            player_features: None,
            question_features: None,
        })
    }

    /// Build from deduplicated interaction records.
    ///
    /// Players and questions are indexed by the unique values of their id
    /// columns in first-seen order. Weights come from `config`, and each
    /// record's correctness is kept as `answer_state`.
    pub fn from_interactions(records: &[Interaction], config: &RatingConfig) -> Result<Self> {
        let players = IdIndex::from_occurrences(records.iter().map(|r| r.student_id.clone()));
        let questions = IdIndex::from_occurrences(records.iter().map(|r| r.question_id.clone()));

        let observation_players = records
            .iter()
            .map(|r| lookup(&players, "player id", &r.student_id))
            .collect::<Result<Vec<_>>>()?;
        let observation_questions = records
            .iter()
            .map(|r| lookup(&questions, "question id", &r.question_id))
            .collect::<Result<Vec<_>>>()?;
        let weights = config.rate_interactions(records);
        let answer_state = records.iter().map(|r| r.answer_status).collect();

        let ds = Self::new(
            players,
            questions,
            observation_players,
            observation_questions,
            weights,
        )?
        .with_answer_state(answer_state)?;

        tracing::debug!(
            players = ds.n_players(),
            questions = ds.n_questions(),
            observations = ds.n_observations(),
            "built interaction dataset"
        );
        Ok(ds)
    }

    /// Fetch a complete extract from `source`, keep the latest record per
    /// `(student, question)` and build the dataset.
    pub fn from_source<S>(source: &S, config: &RatingConfig) -> Result<Self>
    where
        S: InteractionSource + ?Sized,
    {
        let records = source
            .fetch()
            .map_err(|e| Error::Source(e.to_string()))?;
        let fetched = records.len();
        let records = deduplicate_latest(records);
        tracing::debug!(fetched, kept = records.len(), "deduplicated interaction extract");
        Self::from_interactions(&records, config)
    }

    // =========================================================================
    // Builder-style methods
    // =========================================================================

    /// Attach per-observation correctness.
    pub fn with_answer_state(mut self, answer_state: Array1<bool>) -> Result<Self> {
        Error::check_len("answer state", self.n_observations(), answer_state.len())?;
        self.answer_state = Some(answer_state);
        Ok(self)
    }

    /// Attach player side features, one row per player index.
    pub fn with_player_features(mut self, features: FeatureTable) -> Result<Self> {
        Error::check_len("player feature rows", self.n_players(), features.n_entities())?;
        self.player_features = Some(features);
        Ok(self)
    }

    /// Attach question side features, one row per question index.
    pub fn with_question_features(mut self, features: FeatureTable) -> Result<Self> {
        Error::check_len(
            "question feature rows",
            self.n_questions(),
            features.n_entities(),
        )?;
        self.question_features = Some(features);
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn n_players(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn n_questions(&self) -> usize {
        self.questions.len()
    }

    #[inline]
    pub fn n_observations(&self) -> usize {
        self.weights.len()
    }

    /// `(n_players, n_questions)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_players(), self.n_questions())
    }

    pub fn players(&self) -> &IdIndex<String> {
        &self.players
    }

    pub fn questions(&self) -> &IdIndex<String> {
        &self.questions
    }

    pub fn observation_players(&self) -> &[u32] {
        &self.observation_players
    }

    pub fn observation_questions(&self) -> &[u32] {
        &self.observation_questions
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn answer_state(&self) -> Option<ArrayView1<'_, bool>> {
        self.answer_state.as_ref().map(|a| a.view())
    }

    pub fn player_feature_table(&self) -> Option<&FeatureTable> {
        self.player_features.as_ref()
    }

    pub fn question_feature_table(&self) -> Option<&FeatureTable> {
        self.question_features.as_ref()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn player_index(&self, id: &str) -> Result<u32> {
        lookup(&self.players, "player id", id)
    }

    pub fn question_index(&self, id: &str) -> Result<u32> {
        lookup(&self.questions, "question id", id)
    }

    pub fn player_id(&self, index: u32) -> Result<&str> {
        self.players
            .get_id(index)
            .map(String::as_str)
            .ok_or_else(|| Error::key_not_found("player index", index))
    }

    pub fn question_id(&self, index: u32) -> Result<&str> {
        self.questions
            .get_id(index)
            .map(String::as_str)
            .ok_or_else(|| Error::key_not_found("question index", index))
    }

    /// Index of a player side feature, e.g. a specialization for cold start.
    pub fn player_feature_index(&self, name: &str) -> Result<u32> {
        self.player_features
            .as_ref()
            .ok_or_else(|| Error::key_not_found("player feature", name))?
            .feature_index(name)
    }

    /// Side features of one player.
    pub fn player_features(&self, player: u32) -> Result<ArrayView1<'_, f64>> {
        self.player_features
            .as_ref()
            .ok_or_else(|| Error::key_not_found("player features for", player))?
            .row(player)
    }

    /// Index of a question side feature.
    pub fn question_feature_index(&self, name: &str) -> Result<u32> {
        self.question_features
            .as_ref()
            .ok_or_else(|| Error::key_not_found("question feature", name))?
            .feature_index(name)
    }

    /// Side features of one question.
    pub fn question_features(&self, question: u32) -> Result<ArrayView1<'_, f64>> {
        self.question_features
            .as_ref()
            .ok_or_else(|| Error::key_not_found("question features for", question))?
            .row(question)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Sparse `players × questions` matrix over the bounding box of the
    /// observed indices.
    ///
    /// With `weighted == false` every stored entry is `1.0`.
    pub fn build_sparse(&self, weighted: bool) -> Result<CsrMatrix> {
        self.build_sparse_with_shape(weighted, None)
    }

    /// Sparse matrix with an explicit `(n_players, n_questions)` shape.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if `shape` cannot hold every observed index.
    pub fn build_sparse_with_shape(
        &self,
        weighted: bool,
        shape: Option<(usize, usize)>,
    ) -> Result<CsrMatrix> {
        let values = if weighted {
            self.weights.to_vec()
        } else {
            vec![1.0; self.n_observations()]
        };
        CsrMatrix::from_triplets(
            &self.observation_players,
            &self.observation_questions,
            &values,
            shape,
        )
    }

    /// `[n_observations, 2]` array of `(player_index, question_index)`,
    /// row-aligned with [`weights`](Self::weights).
    pub fn player_question_interaction(&self) -> Array2<u32> {
        let mut pairs = Array2::zeros((self.n_observations(), 2));
        for (i, (&p, &q)) in self
            .observation_players
            .iter()
            .zip(&self.observation_questions)
            .enumerate()
        {
            pairs[[i, 0]] = p;
            pairs[[i, 1]] = q;
        }
        pairs
    }

    /// Pairs and weights as [`ObservationArrays`].
    pub fn observations(&self) -> ObservationArrays {
        ObservationArrays::from_aligned(self.player_question_interaction(), self.weights.clone())
    }

    /// A dataset with the same indexes and features but only the
    /// observations at `positions`, in that order.
    pub(crate) fn select(&self, positions: &[usize]) -> Self {
        Self {
            players: self.players.clone(),
            questions: self.questions.clone(),
            observation_players: positions.iter().map(|&i| self.observation_players[i]).collect(),
            observation_questions: positions
                .iter()
                .map(|&i| self.observation_questions[i])
                .collect(),
            weights: positions.iter().map(|&i| self.weights[i]).collect(),
            answer_state: self
                .answer_state
                .as_ref()
                .map(|a| positions.iter().map(|&i| a[i]).collect()),
            player_features: self.player_features.clone(),
            question_features: self.question_features.clone(),
        }
    }

    pub(crate) fn from_parts(parts: DatasetParts) -> Result<Self> {
        let mut ds = Self::new(
            parts.players,
            parts.questions,
            parts.observation_players,
            parts.observation_questions,
            parts.weights,
        )?;
        if let Some(answer_state) = parts.answer_state {
            ds = ds.with_answer_state(answer_state)?;
        }
        if let Some(features) = parts.player_features {
            ds = ds.with_player_features(features)?;
        }
        if let Some(features) = parts.question_features {
            ds = ds.with_question_features(features)?;
        }
        Ok(ds)
    }
}

/// Owned fields of an [`InteractionDataset`], for persistence.
pub(crate) struct DatasetParts {
    pub players: IdIndex<String>,
    pub questions: IdIndex<String>,
    pub observation_players: Vec<u32>,
    pub observation_questions: Vec<u32>,
    pub weights: Array1<f64>,
    pub answer_state: Option<Array1<bool>>,
    pub player_features: Option<FeatureTable>,
    pub question_features: Option<FeatureTable>,
}

fn lookup(index: &IdIndex<String>, kind: &'static str, id: &str) -> Result<u32> {
    index.get(id).ok_or_else(|| Error::key_not_found(kind, id))
}

fn check_bound(field: &'static str, indices: &[u32], bound: usize) -> Result<()> {
    match indices.iter().max() {
        Some(&max) if max as usize >= bound => Err(Error::ShapeMismatch {
            field,
            expected: bound,
            actual: max as usize + 1,
        }),
        _ => Ok(()),
    }
}
