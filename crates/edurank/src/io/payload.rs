//! Payload structures for the native dataset format.
//!
//! These mirror [`InteractionDataset`] with plain vectors so that postcard
//! can encode them compactly.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::data::{DatasetParts, FeatureTable, InteractionDataset};
use crate::error::{Error, Result};
use crate::index::IdIndex;

use super::native::FormatFlags;

/// Version-tagged payload.
///
/// New format versions add variants rather than modifying existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    V1(DatasetPayloadV1),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPayloadV1 {
    /// Player ids in index order.
    pub players: Vec<String>,
    /// Question ids in index order.
    pub questions: Vec<String>,
    pub observation_players: Vec<u32>,
    pub observation_questions: Vec<u32>,
    pub weights: Vec<f64>,
    pub answer_state: Option<Vec<bool>>,
    pub player_features: Option<FeaturesPayload>,
    pub question_features: Option<FeaturesPayload>,
}

/// A [`FeatureTable`], values stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesPayload {
    pub names: Vec<String>,
    pub n_entities: u32,
    pub values: Vec<f64>,
}

impl From<&FeatureTable> for FeaturesPayload {
    fn from(table: &FeatureTable) -> Self {
        Self {
            names: table.names().ids().to_vec(),
            n_entities: table.n_entities() as u32,
            values: table.values().iter().copied().collect(),
        }
    }
}

impl FeaturesPayload {
    fn into_table(self) -> Result<FeatureTable> {
        let shape = (self.n_entities as usize, self.names.len());
        let actual = self.values.len();
        let values = Array2::from_shape_vec(shape, self.values).map_err(|_| Error::ShapeMismatch {
            field: "feature values",
            expected: shape.0.saturating_mul(shape.1),
            actual,
        })?;
        FeatureTable::new(self.names, values)
    }
}

impl DatasetPayloadV1 {
    pub(crate) fn flags(&self) -> FormatFlags {
        let mut flags = FormatFlags::empty();
        if self.answer_state.is_some() {
            flags.set(FormatFlags::HAS_ANSWER_STATE);
        }
        if self.player_features.is_some() {
            flags.set(FormatFlags::HAS_PLAYER_FEATURES);
        }
        if self.question_features.is_some() {
            flags.set(FormatFlags::HAS_QUESTION_FEATURES);
        }
        flags
    }
}

impl From<&InteractionDataset> for DatasetPayloadV1 {
    fn from(ds: &InteractionDataset) -> Self {
        Self {
            players: ds.players().ids().to_vec(),
            questions: ds.questions().ids().to_vec(),
            observation_players: ds.observation_players().to_vec(),
            observation_questions: ds.observation_questions().to_vec(),
            weights: ds.weights().to_vec(),
            answer_state: ds.answer_state().map(|a| a.to_vec()),
            player_features: ds.player_feature_table().map(FeaturesPayload::from),
            question_features: ds.question_feature_table().map(FeaturesPayload::from),
        }
    }
}

impl DatasetPayloadV1 {
    /// Rebuild and revalidate the dataset.
    pub(crate) fn into_dataset(self) -> Result<InteractionDataset> {
        InteractionDataset::from_parts(DatasetParts {
            players: IdIndex::from_ids(self.players),
            questions: IdIndex::from_ids(self.questions),
            observation_players: self.observation_players,
            observation_questions: self.observation_questions,
            weights: Array1::from(self.weights),
            answer_state: self.answer_state.map(Array1::from),
            player_features: self.player_features.map(FeaturesPayload::into_table).transpose()?,
            question_features: self
                .question_features
                .map(FeaturesPayload::into_table)
                .transpose()?,
        })
    }
}
