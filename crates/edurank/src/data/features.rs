//! Per-entity side features.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};
use crate::index::IdIndex;

/// Named feature columns for every player (or every question).
///
/// Values are stored entity-major: `[n_entities, n_features]`. Feature names
/// have their own dense index, which is how cold-start recommenders address
/// a feature (e.g. a student's specialization).
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: IdIndex<String>,
    values: Array2<f64>,
}

impl FeatureTable {
    /// Create a table from feature names and an `[n_entities, n_features]` matrix.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the matrix width differs from the number of names.
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        Error::check_len("feature columns", names.len(), values.ncols())?;
        Ok(Self {
            names: IdIndex::from_ids(names),
            values,
        })
    }

    /// One-hot encode a single categorical attribute per entity.
    ///
    /// Categories are indexed in first-seen order.
    ///
    /// ```
    /// use edurank::data::FeatureTable;
    ///
    /// let table = FeatureTable::one_hot(&["math", "physics", "math"]);
    /// assert_eq!(table.n_features(), 2);
    /// assert_eq!(table.feature_index("physics").unwrap(), 1);
    /// assert_eq!(table.row(2).unwrap().to_vec(), vec![1.0, 0.0]);
    /// ```
    pub fn one_hot<S: AsRef<str>>(categories: &[S]) -> Self {
        let names = IdIndex::from_occurrences(categories.iter().map(|c| c.as_ref().to_owned()));
        let mut values = Array2::zeros((categories.len(), names.len()));
        for (entity, category) in categories.iter().enumerate() {
            if let Some(col) = names.get(category.as_ref()) {
                values[[entity, col as usize]] = 1.0;
            }
        }
        Self { names, values }
    }

    #[inline]
    pub fn n_entities(&self) -> usize {
        self.values.nrows()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn names(&self) -> &IdIndex<String> {
        &self.names
    }

    /// All values, `[n_entities, n_features]`.
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Index of the feature called `name`.
    pub fn feature_index(&self, name: &str) -> Result<u32> {
        self.names
            .get(name)
            .ok_or_else(|| Error::key_not_found("feature", name))
    }

    /// Name of the feature at `index`.
    pub fn feature_name(&self, index: u32) -> Result<&str> {
        self.names
            .get_id(index)
            .map(String::as_str)
            .ok_or_else(|| Error::key_not_found("feature index", index))
    }

    /// Feature vector of one entity.
    pub fn row(&self, entity: u32) -> Result<ArrayView1<'_, f64>> {
        if entity as usize >= self.n_entities() {
            return Err(Error::key_not_found("entity index", entity));
        }
        Ok(self.values.row(entity as usize))
    }
}
