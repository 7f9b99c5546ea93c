//! Flat observation arrays.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::CsrMatrix;
use crate::error::{Error, Result};

/// `(player_index, question_index)` pairs with one weight per pair.
///
/// `pairs` has shape `[n, 2]`; row `i` of `pairs` and `weights[i]` describe
/// the same interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationArrays {
    pairs: Array2<u32>,
    weights: Array1<f64>,
}

impl ObservationArrays {
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if `pairs` is not `[weights.len(), 2]`.
    pub fn new(pairs: Array2<u32>, weights: Array1<f64>) -> Result<Self> {
        Error::check_len("pair columns", 2, pairs.ncols())?;
        Error::check_len("weights", pairs.nrows(), weights.len())?;
        Ok(Self { pairs, weights })
    }

    /// Both sides must come from the same observation columns.
    pub(crate) fn from_aligned(pairs: Array2<u32>, weights: Array1<f64>) -> Self {
        debug_assert_eq!(pairs.dim(), (weights.len(), 2));
        Self { pairs, weights }
    }

    /// Build from parallel player and question columns.
    pub fn from_columns(players: &[u32], questions: &[u32], weights: &[f64]) -> Result<Self> {
        Error::check_len("question indices", players.len(), questions.len())?;
        Error::check_len("weights", players.len(), weights.len())?;

        let mut pairs = Array2::zeros((players.len(), 2));
        for (i, (&p, &q)) in players.iter().zip(questions).enumerate() {
            pairs[[i, 0]] = p;
            pairs[[i, 1]] = q;
        }
        Ok(Self {
            pairs,
            weights: Array1::from(weights.to_vec()),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// `[n, 2]` pairs.
    pub fn pairs(&self) -> ArrayView2<'_, u32> {
        self.pairs.view()
    }

    pub fn players(&self) -> ArrayView1<'_, u32> {
        self.pairs.column(0)
    }

    pub fn questions(&self) -> ArrayView1<'_, u32> {
        self.pairs.column(1)
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Largest player index plus one (0 when empty).
    pub fn player_bound(&self) -> usize {
        self.players().iter().max().map_or(0, |&p| p as usize + 1)
    }

    /// Largest question index plus one (0 when empty).
    pub fn question_bound(&self) -> usize {
        self.questions().iter().max().map_or(0, |&q| q as usize + 1)
    }

    /// Sparse `players × questions` view of the weights.
    pub fn to_csr(&self, shape: Option<(usize, usize)>) -> Result<CsrMatrix> {
        let players = self.players().to_vec();
        let questions = self.questions().to_vec();
        let weights = self.weights.to_vec();
        CsrMatrix::from_triplets(&players, &questions, &weights, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn columns_align() {
        let obs = ObservationArrays::from_columns(&[0, 2, 1], &[4, 0, 4], &[0.5, 0.25, 1.0]).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs.pairs(), array![[0u32, 4], [2, 0], [1, 4]]);
        assert_eq!(obs.player_bound(), 3);
        assert_eq!(obs.question_bound(), 5);

        let csr = obs.to_csr(None).unwrap();
        assert_eq!(csr.shape(), (3, 5));
        assert_eq!(csr.get(2, 0), 0.25);
    }

    #[test]
    fn shape_validated() {
        assert!(matches!(
            ObservationArrays::new(Array2::zeros((2, 3)), array![1.0, 1.0]),
            Err(Error::ShapeMismatch { field: "pair columns", .. })
        ));
        assert!(matches!(
            ObservationArrays::new(Array2::zeros((2, 2)), array![1.0]),
            Err(Error::ShapeMismatch { field: "weights", .. })
        ));
        assert!(matches!(
            ObservationArrays::from_columns(&[0], &[0, 1], &[1.0]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn empty_bounds() {
        let obs = ObservationArrays::from_columns(&[], &[], &[]).unwrap();
        assert!(obs.is_empty());
        assert_eq!(obs.player_bound(), 0);
    }
}
