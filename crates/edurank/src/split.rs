//! Observation-level train/test partitioning.
//!
//! Every observation draws one uniform value in `[0, 1)` from a
//! [`Xoshiro256PlusPlus`] stream and goes to train when the value is below
//! `train_percentage`. The same seed over the same observation order always
//! produces the same partition.
//!
//! # Flavours
//!
//! - [`TrainTestSplit::split_sparse`]: two full-shape [`CsrMatrix`]es; the test
//!   matrix keeps only strictly positive weights
//! - [`TrainTestSplit::split_arrays`]: two [`ObservationArrays`] with raw weights
//! - [`TrainTestSplit::split_dataset`]: two [`InteractionDataset`]s sharing the
//!   source indexes
//!
//! ```
//! use edurank::split::TrainTestSplit;
//!
//! let split = TrainTestSplit::builder()
//!     .train_percentage(0.8)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let mask = split.mask(10);
//! assert_eq!(mask, split.mask(10));
//! ```

use bon::Builder;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::{CsrMatrix, InteractionDataset, ObservationArrays};
use crate::error::{Error, Result};

/// Seed used by [`TrainTestSplit::default`].
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of observations kept for training by default.
pub const DEFAULT_TRAIN_PERCENTAGE: f64 = 0.8;

/// Random observation-level split.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct TrainTestSplit {
    /// Probability that an observation lands in train. Must be in `(0, 1)`.
    #[builder(default = DEFAULT_TRAIN_PERCENTAGE)]
    pub train_percentage: f64,

    /// Seed of the random stream. `None` draws a fresh seed from the OS,
    /// so the partition is not reproducible.
    pub seed: Option<u64>,
}

impl<S: train_test_split_builder::IsComplete> TrainTestSplitBuilder<S> {
    /// Build and validate the split.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `train_percentage` is not strictly
    /// between 0 and 1.
    pub fn build(self) -> Result<TrainTestSplit> {
        let split = self.__build_internal();
        split.validate()?;
        Ok(split)
    }
}

impl Default for TrainTestSplit {
    fn default() -> Self {
        Self {
            train_percentage: DEFAULT_TRAIN_PERCENTAGE,
            seed: Some(DEFAULT_SEED),
        }
    }
}

impl TrainTestSplit {
    pub fn validate(&self) -> Result<()> {
        let p = self.train_percentage;
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::invalid("train_percentage", p, "must be in (0, 1)"));
        }
        Ok(())
    }

    fn rng(&self) -> Xoshiro256PlusPlus {
        match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Train membership of `n` observations, in order.
    pub fn mask(&self, n: usize) -> Vec<bool> {
        let mut rng = self.rng();
        (0..n)
            .map(|_| rng.r#gen::<f64>() < self.train_percentage)
            .collect()
    }

    /// Train and test positions of `n` observations.
    fn positions(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let (train, test): (Vec<_>, Vec<_>) = self
            .mask(n)
            .into_iter()
            .enumerate()
            .partition(|&(_, in_train)| in_train);
        let train: Vec<usize> = train.into_iter().map(|(i, _)| i).collect();
        let test: Vec<usize> = test.into_iter().map(|(i, _)| i).collect();
        tracing::debug!(
            observations = n,
            train = train.len(),
            test = test.len(),
            "split observations"
        );
        (train, test)
    }

    /// Split into two datasets over the same players and questions.
    pub fn split_dataset(
        &self,
        dataset: &InteractionDataset,
    ) -> Result<(InteractionDataset, InteractionDataset)> {
        self.validate()?;
        let (train, test) = self.positions(dataset.n_observations());
        Ok((dataset.select(&train), dataset.select(&test)))
    }

    /// Split into weighted `n_players × n_questions` matrices.
    ///
    /// Test entries with a weight of zero or below are not positives and are
    /// removed from the test matrix. Train keeps every weight.
    pub fn split_sparse(&self, dataset: &InteractionDataset) -> Result<(CsrMatrix, CsrMatrix)> {
        let (train, test) = self.split_dataset(dataset)?;
        let shape = Some(dataset.shape());
        let train = train.build_sparse_with_shape(true, shape)?;
        let test = test
            .build_sparse_with_shape(true, shape)?
            .retain(|_, _, v| v > 0.0);
        Ok((train, test))
    }

    /// Split into flat pair/weight arrays. Weights are not clipped.
    pub fn split_arrays(
        &self,
        dataset: &InteractionDataset,
    ) -> Result<(ObservationArrays, ObservationArrays)> {
        let (train, test) = self.split_dataset(dataset)?;
        Ok((train.observations(), test.observations()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdIndex;
    use ndarray::Array1;
    use rstest::rstest;

    fn grid(n_players: usize, n_questions: usize) -> InteractionDataset {
        let mut players = Vec::new();
        let mut questions = Vec::new();
        let mut weights = Vec::new();
        for p in 0..n_players {
            for q in 0..n_questions {
                players.push(p as u32);
                questions.push(q as u32);
                // Every third observation is a negative signal.
                weights.push(if (p + q) % 3 == 0 { -0.25 } else { 0.5 });
            }
        }
        InteractionDataset::new(
            IdIndex::from_ids((0..n_players).map(|i| format!("s{i}"))),
            IdIndex::from_ids((0..n_questions).map(|i| format!("q{i}"))),
            players,
            questions,
            Array1::from(weights),
        )
        .unwrap()
    }

    fn seeded(p: f64, seed: u64) -> TrainTestSplit {
        TrainTestSplit::builder()
            .train_percentage(p)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(-0.5)]
    #[case(f64::NAN)]
    fn rejects_percentage_outside_open_interval(#[case] p: f64) {
        assert!(matches!(
            TrainTestSplit::builder().train_percentage(p).build(),
            Err(Error::InvalidParameter { name: "train_percentage", .. })
        ));
    }

    #[rstest]
    #[case(0.2, 1)]
    #[case(0.5, 7)]
    #[case(0.8, 42)]
    fn partition_is_disjoint_and_complete(#[case] p: f64, #[case] seed: u64) {
        let ds = grid(12, 9);
        let (train, test) = seeded(p, seed).split_dataset(&ds).unwrap();
        assert_eq!(train.n_observations() + test.n_observations(), ds.n_observations());

        let mut seen: Vec<(u32, u32)> = train
            .observation_players()
            .iter()
            .zip(train.observation_questions())
            .chain(test.observation_players().iter().zip(test.observation_questions()))
            .map(|(&p, &q)| (p, q))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), ds.n_observations());
    }

    #[test]
    fn same_seed_same_partition() {
        let ds = grid(10, 10);
        let a = seeded(0.7, 3).split_arrays(&ds).unwrap();
        let b = seeded(0.7, 3).split_arrays(&ds).unwrap();
        assert_eq!(a, b);
        let c = seeded(0.7, 4).split_arrays(&ds).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn sparse_split_keeps_shape_and_positive_test() {
        let ds = grid(6, 5);
        let split = seeded(0.5, 11);
        let (train, test) = split.split_sparse(&ds).unwrap();
        assert_eq!(train.shape(), (6, 5));
        assert_eq!(test.shape(), (6, 5));
        assert!(test.data().iter().all(|&v| v > 0.0));

        // Train keeps its negatives; test drops exactly its own.
        let (train_obs, test_obs) = split.split_arrays(&ds).unwrap();
        assert_eq!(train.nnz(), train_obs.len());
        let test_positive = test_obs.weights().iter().filter(|&&w| w > 0.0).count();
        assert_eq!(test.nnz(), test_positive);
    }

    #[test]
    fn array_split_keeps_negative_weights() {
        let ds = grid(6, 5);
        let (train, test) = seeded(0.5, 11).split_arrays(&ds).unwrap();
        assert_eq!(train.len() + test.len(), 30);
        let negatives = train
            .weights()
            .iter()
            .chain(test.weights().iter())
            .filter(|&&w| w < 0.0)
            .count();
        assert_eq!(negatives, 10);
    }

    #[test]
    fn split_dataset_shares_indexes() {
        let ds = grid(4, 4);
        let (train, test) = seeded(0.5, 0).split_dataset(&ds).unwrap();
        assert_eq!(train.players(), ds.players());
        assert_eq!(test.questions(), ds.questions());
        assert_eq!(train.shape(), test.shape());
    }

    #[test]
    fn unseeded_split_is_still_a_partition() {
        let split = TrainTestSplit::builder().train_percentage(0.5).build().unwrap();
        assert_eq!(split.seed, None);
        let ds = grid(5, 5);
        let (train, test) = split.split_arrays(&ds).unwrap();
        assert_eq!(train.len() + test.len(), 25);
    }
}
