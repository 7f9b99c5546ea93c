//! Bidirectional mapping between external identifiers and dense indices.
//!
//! Every numeric structure in the crate (sparse matrices, observation
//! arrays, feature tables) addresses players and questions by a dense
//! zero-based `u32` index. [`IdIndex`] owns that assignment.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Forward (`id -> index`) and inverse (`index -> id`) maps over a dense
/// `0..n` index range.
///
/// Indices are assigned in the order ids are supplied. The map is built once
/// and never mutated afterwards.
///
/// # Example
///
/// ```
/// use edurank::IdIndex;
///
/// let index = IdIndex::from_ids(["q7", "q3", "q9"]);
/// assert_eq!(index.index_of(&"q3").unwrap(), 1);
/// assert_eq!(*index.id_of(2).unwrap(), "q9");
/// ```
#[derive(Debug, Clone)]
pub struct IdIndex<K> {
    forward: HashMap<K, u32>,
    inverse: Vec<K>,
}

impl<K: Eq + Hash + Clone> IdIndex<K> {
    /// Assign index `i` to the `i`-th id.
    ///
    /// Ids are expected to be unique. A repeated id keeps both of its slots
    /// in the inverse map, while the forward map points at the later slot.
    /// Use [`IdIndex::from_occurrences`] for columns that contain repeats.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let inverse: Vec<K> = ids.into_iter().collect();
        let mut forward = HashMap::with_capacity(inverse.len());
        for (ix, id) in inverse.iter().enumerate() {
            forward.insert(id.clone(), ix as u32);
        }
        Self { forward, inverse }
    }

    /// Index the unique values of a column, in first-seen order.
    pub fn from_occurrences<I>(column: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut forward = HashMap::new();
        let mut inverse = Vec::new();
        for id in column {
            if !forward.contains_key(&id) {
                forward.insert(id.clone(), inverse.len() as u32);
                inverse.push(id);
            }
        }
        Self { forward, inverse }
    }

    /// Number of assigned indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.inverse.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inverse.is_empty()
    }

    /// Whether `id` has an index.
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.contains_key(id)
    }

    /// Index of `id`, if assigned.
    pub fn get<Q>(&self, id: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(id).copied()
    }

    /// Id at `index`, if assigned.
    pub fn get_id(&self, index: u32) -> Option<&K> {
        self.inverse.get(index as usize)
    }

    /// The ids in index order.
    pub fn ids(&self) -> &[K] {
        &self.inverse
    }

    /// Iterate `(index, id)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &K)> + '_ {
        self.inverse
            .iter()
            .enumerate()
            .map(|(ix, id)| (ix as u32, id))
    }
}

impl<K: Eq + Hash + Clone + Display> IdIndex<K> {
    /// Look up the index of `id`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `id` was never indexed.
    pub fn index_of(&self, id: &K) -> Result<u32> {
        self.get(id).ok_or_else(|| Error::key_not_found("id", id))
    }

    /// Look up the id at `index`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if `index >= len()`.
    pub fn id_of(&self, index: u32) -> Result<&K> {
        self.get_id(index)
            .ok_or_else(|| Error::key_not_found("index", index))
    }

    /// Map a column of ids to their indices.
    pub fn indices_of<'a, I>(&self, ids: I) -> Result<Vec<u32>>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        ids.into_iter().map(|id| self.index_of(id)).collect()
    }
}

// The forward map is a function of the inverse one.
impl<K: PartialEq> PartialEq for IdIndex<K> {
    fn eq(&self, other: &Self) -> bool {
        self.inverse == other.inverse
    }
}

impl<K: Eq> Eq for IdIndex<K> {}

impl<K> Default for IdIndex<K> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            inverse: Vec::new(),
        }
    }
}
