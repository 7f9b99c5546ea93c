//! Batched ranking evaluation.

use bon::Builder;

use super::metrics::{MetricTotals, RankingMetrics};
use super::recommender::{ColdStartPolicy, RecommendRequest, Recommender};
use crate::data::{CsrMatrix, ObservationArrays};
use crate::error::{Error, Result};
use crate::logger::{EvalLogger, Verbosity};

/// Users scored per recommender call by default.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default list length.
pub const DEFAULT_K: usize = 10;

/// Evaluation parameters.
///
/// ```
/// use edurank::eval::EvalConfig;
///
/// let config = EvalConfig::builder().k(5).build().unwrap();
/// assert_eq!(config.batch_size, 1000);
/// assert!(EvalConfig::builder().k(0).build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct EvalConfig {
    /// Cutoff of every metric. Must be in `1..=n_items`.
    #[builder(default = DEFAULT_K)]
    pub k: usize,

    /// Users per recommender call. Bounds peak memory, not parallelism.
    #[builder(default = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Passed through to the recommender.
    #[builder(default = true)]
    pub filter_already_liked: bool,

    /// Passed through to the recommender.
    #[builder(default)]
    pub cold_start: ColdStartPolicy,

    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: eval_config_builder::IsComplete> EvalConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `k` or `batch_size` is zero. The upper
    /// bound of `k` depends on the data and is checked at evaluation time.
    pub fn build(self) -> Result<EvalConfig> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            batch_size: DEFAULT_BATCH_SIZE,
            filter_already_liked: true,
            cold_start: ColdStartPolicy::default(),
            verbosity: Verbosity::default(),
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::invalid("k", self.k, "must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(Error::invalid("batch_size", self.batch_size, "must be at least 1"));
        }
        Ok(())
    }
}

/// Scores a [`Recommender`]'s top-K lists against held-out positives.
///
/// # Algorithm
///
/// 1. The item universe is the largest item index seen in train or test, plus one.
/// 2. A user's liked set is every test item with weight `> 0`; users with an
///    empty liked set are left out.
/// 3. Remaining users are ranked in batches of `batch_size`.
/// 4. Each list is truncated to K and scored (see [`RankingMetrics`]).
///
/// The evaluator holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct RankingEvaluator {
    config: EvalConfig,
}

impl RankingEvaluator {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate over player × question matrices.
    ///
    /// The train user space is `train.n_rows()`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownUser`] if `test` holds entries for a row at or past
    ///   `train.n_rows()`
    /// - [`Error::InvalidParameter`] if `k` is outside `1..=n_items`
    /// - [`Error::ShapeMismatch`] if the recommender returns a different number
    ///   of lists than users requested
    pub fn evaluate<R>(&self, model: &R, train: &CsrMatrix, test: &CsrMatrix) -> Result<RankingMetrics>
    where
        R: Recommender + ?Sized,
    {
        self.config.validate()?;
        let n_users = train.n_rows();
        if let Some(user) = (n_users..test.n_rows()).find(|&r| test.row_nnz(r) > 0) {
            return Err(Error::UnknownUser {
                user: user as u32,
                n_users,
            });
        }
        let n_items = item_bound(train).max(item_bound(test));
        self.check_k(n_items)?;

        let mut excluded = 0;
        let mut users = Vec::new();
        let mut liked = Vec::new();
        for r in 0..test.n_rows() {
            let (items, values) = test.row(r);
            if items.is_empty() {
                continue;
            }
            // Columns are sorted within a row, so the filtered list stays sorted.
            let positives: Vec<u32> = items
                .iter()
                .zip(values)
                .filter_map(|(&item, &v)| (v > 0.0).then_some(item))
                .collect();
            if positives.is_empty() {
                excluded += 1;
            } else {
                users.push(r as u32);
                liked.push(positives);
            }
        }

        let mut logger = EvalLogger::new(self.config.verbosity);
        logger.start_evaluation(users.len(), n_items, self.config.k);
        logger.log_excluded(excluded);
        if users.is_empty() {
            logger.log_empty();
            return Ok(RankingMetrics::empty(self.config.k));
        }

        let k = self.config.k;
        let n_batches = users.len().div_ceil(self.config.batch_size);
        let mut totals = MetricTotals::default();
        for (batch, (batch_users, batch_liked)) in users
            .chunks(self.config.batch_size)
            .zip(liked.chunks(self.config.batch_size))
            .enumerate()
        {
            let request = RecommendRequest {
                users: batch_users,
                user_items: train,
                n: k,
                filter_already_liked: self.config.filter_already_liked,
                cold_start: self.config.cold_start,
            };
            let lists = model.recommend(&request);
            Error::check_len("recommendation lists", batch_users.len(), lists.len())?;

            let hits: usize = lists
                .iter()
                .zip(batch_liked)
                .map(|(ranked, liked)| totals.add_user(ranked, liked, k, n_items))
                .sum();
            logger.log_batch(batch, n_batches, batch_users.len(), hits);
        }

        let metrics = totals.finish(k);
        logger.finish_evaluation(&metrics);
        Ok(metrics)
    }

    /// Evaluate over flat observation arrays.
    ///
    /// The train user space is the largest train player index plus one.
    pub fn evaluate_arrays<R>(
        &self,
        model: &R,
        train: &ObservationArrays,
        test: &ObservationArrays,
    ) -> Result<RankingMetrics>
    where
        R: Recommender + ?Sized,
    {
        let n_users = train.player_bound();
        if let Some(&user) = test.players().iter().find(|&&p| p as usize >= n_users) {
            return Err(Error::UnknownUser { user, n_users });
        }
        let n_items = train.question_bound().max(test.question_bound());
        let shape = Some((n_users, n_items));
        self.evaluate(model, &train.to_csr(shape)?, &test.to_csr(shape)?)
    }

    fn check_k(&self, n_items: usize) -> Result<()> {
        if self.config.k > n_items {
            return Err(Error::invalid(
                "k",
                self.config.k,
                "must not exceed the number of items",
            ));
        }
        Ok(())
    }
}

/// Evaluate at cutoff `k` with default batching and filtering.
pub fn ranking_metrics_at_k<R>(
    model: &R,
    train: &ObservationArrays,
    test: &ObservationArrays,
    k: usize,
) -> Result<RankingMetrics>
where
    R: Recommender + ?Sized,
{
    let config = EvalConfig::builder().k(k).build()?;
    RankingEvaluator::new(config).evaluate_arrays(model, train, test)
}

fn item_bound(m: &CsrMatrix) -> usize {
    m.indices().iter().max().map_or(0, |&c| c as usize + 1)
}
