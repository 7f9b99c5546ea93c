//! Top-K ranking metrics.

use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// MetricValue
// =============================================================================

/// A computed metric value with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Name of the metric (e.g., "precision@10", "auc").
    pub name: String,
    pub value: f64,
    /// Whether higher values are better. True for every ranking metric here.
    pub higher_is_better: bool,
}

impl MetricValue {
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            value,
            higher_is_better,
        }
    }

    /// Returns true if this value is better than another.
    pub fn is_better_than(&self, other: &Self) -> bool {
        if self.higher_is_better {
            self.value > other.value
        } else {
            self.value < other.value
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}

// =============================================================================
// RankingMetrics
// =============================================================================

/// Aggregated precision@K, MAP@K, NDCG@K and AUC.
///
/// Precision is pooled (total hits over total capped positives); the other
/// three are arithmetic means over evaluated users.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingMetrics {
    pub k: usize,
    pub precision: f64,
    pub map: f64,
    pub ndcg: f64,
    pub auc: f64,
    /// Users with at least one positive test item.
    pub users_evaluated: usize,
}

impl RankingMetrics {
    /// All-zero metrics for an evaluation with no evaluable user.
    pub fn empty(k: usize) -> Self {
        Self {
            k,
            precision: 0.0,
            map: 0.0,
            ndcg: 0.0,
            auc: 0.0,
            users_evaluated: 0,
        }
    }

    /// `{precision, map, ndcg, auc}`.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("precision", self.precision),
            ("map", self.map),
            ("ndcg", self.ndcg),
            ("auc", self.auc),
        ])
    }

    /// The four metrics with their K-qualified names.
    pub fn metric_values(&self) -> Vec<MetricValue> {
        vec![
            MetricValue::new(format!("precision@{}", self.k), self.precision, true),
            MetricValue::new(format!("map@{}", self.k), self.map, true),
            MetricValue::new(format!("ndcg@{}", self.k), self.ndcg, true),
            MetricValue::new("auc", self.auc, true),
        ]
    }
}

impl fmt::Display for RankingMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, metric) in self.metric_values().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{metric}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Accumulation
// =============================================================================

/// Per-user contributions, summed over a whole evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MetricTotals {
    relevant: f64,
    precision_denominator: f64,
    average_precision: f64,
    ndcg: f64,
    auc: f64,
    users: usize,
}

impl MetricTotals {
    /// Score one user's ranked list against their positive items.
    ///
    /// `liked` must be sorted ascending and non-empty. Only the first `k`
    /// entries of `ranked` count. Returns the number of hits.
    pub(crate) fn add_user(&mut self, ranked: &[u32], liked: &[u32], k: usize, n_items: usize) -> usize {
        let n_pos = liked.len();
        let n_neg = n_items.saturating_sub(n_pos);
        let cutoff = k.min(n_pos);

        let idcg: f64 = (0..cutoff).map(discount).sum();

        let mut hits = 0usize;
        let mut misses = 0usize;
        let mut ap = 0.0;
        let mut dcg = 0.0;
        let mut auc = 0.0;
        for (rank, item) in ranked.iter().take(k).enumerate() {
            if liked.binary_search(item).is_ok() {
                hits += 1;
                ap += hits as f64 / (rank + 1) as f64;
                dcg += discount(rank);
            } else {
                misses += 1;
                auc += hits as f64;
            }
        }
        auc += (hits + n_pos) as f64 / 2.0 * n_neg.saturating_sub(misses) as f64;

        self.relevant += hits as f64;
        self.precision_denominator += cutoff as f64;
        self.average_precision += ap / cutoff as f64;
        self.ndcg += dcg / idcg;
        self.auc += if n_neg == 0 {
            1.0
        } else {
            auc / (n_pos * n_neg) as f64
        };
        self.users += 1;
        hits
    }

    pub(crate) fn finish(&self, k: usize) -> RankingMetrics {
        if self.users == 0 {
            return RankingMetrics::empty(k);
        }
        let users = self.users as f64;
        RankingMetrics {
            k,
            precision: self.relevant / self.precision_denominator,
            map: self.average_precision / users,
            ndcg: self.ndcg / users,
            auc: self.auc / users,
            users_evaluated: self.users,
        }
    }
}

/// `1 / log2(rank + 2)` for a zero-based rank.
#[inline]
fn discount(rank: usize) -> f64 {
    1.0 / ((rank + 2) as f64).log2()
}
