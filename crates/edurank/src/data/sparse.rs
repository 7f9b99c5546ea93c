//! Compressed Sparse Row (CSR) matrix for player-major access.
//!
//! Rows are players and columns are questions. CSR is the layout external
//! recommenders consume: every player's interactions are contiguous.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Compressed Sparse Row matrix of `f64` values.
///
/// # Structure
///
/// - `data`: stored values, row by row
/// - `indices`: column index of each value, ascending within a row
/// - `indptr`: `indptr[r]..indptr[r + 1]` delimits row `r`
///
/// Stored entries may hold explicit zeros; [`CsrMatrix::retain`] removes
/// entries by predicate.
///
/// # Example
///
/// ```
/// use edurank::data::CsrMatrix;
///
/// let m = CsrMatrix::from_triplets(&[0, 0, 1], &[0, 2, 1], &[0.7, -0.3, 0.9], None).unwrap();
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.get(0, 2), -0.3);
/// assert_eq!(m.get(1, 0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    indptr: Box<[usize]>,
    indices: Box<[u32]>,
    data: Box<[f64]>,
    n_rows: usize,
    n_cols: usize,
}

impl CsrMatrix {
    /// A matrix with no stored entries.
    pub fn empty(n_rows: usize, n_cols: usize) -> Self {
        Self {
            indptr: vec![0; n_rows + 1].into_boxed_slice(),
            indices: Box::default(),
            data: Box::default(),
            n_rows,
            n_cols,
        }
    }

    /// Build from coordinate triplets.
    ///
    /// Without an explicit `shape` the matrix is the minimal bounding box of
    /// the coordinates. A coordinate that appears more than once keeps the
    /// value of its last occurrence.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`] if the three columns differ in length, or if
    /// `shape` is too small for the largest row or column index.
    pub fn from_triplets(
        rows: &[u32],
        cols: &[u32],
        values: &[f64],
        shape: Option<(usize, usize)>,
    ) -> Result<Self> {
        Error::check_len("column indices", rows.len(), cols.len())?;
        Error::check_len("values", rows.len(), values.len())?;

        let needed_rows = rows.iter().max().map_or(0, |&r| r as usize + 1);
        let needed_cols = cols.iter().max().map_or(0, |&c| c as usize + 1);
        let (n_rows, n_cols) = match shape {
            Some((n_rows, n_cols)) => {
                if n_rows < needed_rows {
                    return Err(Error::ShapeMismatch {
                        field: "rows",
                        expected: needed_rows,
                        actual: n_rows,
                    });
                }
                if n_cols < needed_cols {
                    return Err(Error::ShapeMismatch {
                        field: "columns",
                        expected: needed_cols,
                        actual: n_cols,
                    });
                }
                (n_rows, n_cols)
            }
            None => (needed_rows, needed_cols),
        };

        // Counting sort by row, keeping input order within each row.
        let mut row_starts = vec![0usize; n_rows + 1];
        for &r in rows {
            row_starts[r as usize + 1] += 1;
        }
        for r in 0..n_rows {
            row_starts[r + 1] += row_starts[r];
        }
        let mut cursors = row_starts.clone();
        let mut order = vec![0usize; rows.len()];
        for (pos, &r) in rows.iter().enumerate() {
            order[cursors[r as usize]] = pos;
            cursors[r as usize] += 1;
        }

        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::with_capacity(rows.len());
        let mut data = Vec::with_capacity(rows.len());
        let mut scratch: Vec<(u32, f64)> = Vec::new();
        indptr.push(0);

        for r in 0..n_rows {
            scratch.clear();
            scratch.extend(
                order[row_starts[r]..row_starts[r + 1]]
                    .iter()
                    .map(|&pos| (cols[pos], values[pos])),
            );
            // Stable: repeated columns stay in input order, so the last wins.
            scratch.sort_by_key(|&(c, _)| c);

            let start = indices.len();
            for &(c, v) in &scratch {
                let n = indices.len();
                if n > start && indices[n - 1] == c {
                    data[n - 1] = v;
                } else {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }

        Ok(Self {
            indptr: indptr.into_boxed_slice(),
            indices: indices.into_boxed_slice(),
            data: data.into_boxed_slice(),
            n_rows,
            n_cols,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Column indices and values of row `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r >= n_rows()`.
    #[inline]
    pub fn row(&self, r: usize) -> (&[u32], &[f64]) {
        let range = self.indptr[r]..self.indptr[r + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Number of stored entries in row `r`.
    #[inline]
    pub fn row_nnz(&self, r: usize) -> usize {
        self.indptr[r + 1] - self.indptr[r]
    }

    /// Value at `(r, c)`, or `0.0` if nothing is stored there.
    pub fn get(&self, r: usize, c: u32) -> f64 {
        if r >= self.n_rows {
            return 0.0;
        }
        let (cols, vals) = self.row(r);
        cols.binary_search(&c).map_or(0.0, |pos| vals[pos])
    }

    /// Iterate stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32, f64)> + '_ {
        (0..self.n_rows).flat_map(move |r| {
            let (cols, vals) = self.row(r);
            cols.iter().zip(vals).map(move |(&c, &v)| (r, c, v))
        })
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// Replace every stored value with `f(value)`, keeping the structure.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            ..self.clone()
        }
    }

    /// Drop stored entries for which `keep(row, col, value)` is false.
    pub fn retain(&self, keep: impl Fn(usize, u32, f64) -> bool) -> Self {
        let mut indptr = Vec::with_capacity(self.n_rows + 1);
        let mut indices = Vec::with_capacity(self.nnz());
        let mut data = Vec::with_capacity(self.nnz());
        indptr.push(0);

        for r in 0..self.n_rows {
            let (cols, vals) = self.row(r);
            for (&c, &v) in cols.iter().zip(vals) {
                if keep(r, c, v) {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }

        Self {
            indptr: indptr.into_boxed_slice(),
            indices: indices.into_boxed_slice(),
            data: data.into_boxed_slice(),
            n_rows: self.n_rows,
            n_cols: self.n_cols,
        }
    }

    /// Dense `[n_rows, n_cols]` copy.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.n_rows, self.n_cols));
        for (r, c, v) in self.iter() {
            dense[[r, c as usize]] = v;
        }
        dense
    }
}
