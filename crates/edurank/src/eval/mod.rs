//! Ranked-retrieval evaluation of external recommenders.
//!
//! The evaluator treats a recommender as a black box behind the
//! [`Recommender`] trait: it sends batches of users together with the train
//! matrix and scores the returned top-K lists against held-out positives.
//!
//! # Metrics
//!
//! - precision@K: hits over `min(K, |liked|)`, pooled across users
//! - MAP@K: average precision normalised by `min(K, |liked|)`
//! - NDCG@K: DCG with `1 / log2(rank + 2)` gains over the ideal DCG
//! - AUC: rank-based approximation over the K-truncated list
//!
//! # Example
//!
//! ```
//! use edurank::data::ObservationArrays;
//! use edurank::eval::{ranking_metrics_at_k, MostPopular};
//!
//! let train = ObservationArrays::from_columns(&[0, 1, 1], &[0, 0, 1], &[1.0, 1.0, 1.0]).unwrap();
//! let test = ObservationArrays::from_columns(&[0], &[1], &[0.8]).unwrap();
//!
//! let model = MostPopular::fit(&train.to_csr(None).unwrap());
//! let metrics = ranking_metrics_at_k(&model, &train, &test, 1).unwrap();
//! assert_eq!(metrics.precision, 1.0);
//! ```

mod evaluator;
mod metrics;
mod popular;
mod recommender;

pub use evaluator::{
    ranking_metrics_at_k, EvalConfig, EvalConfigBuilder, RankingEvaluator, DEFAULT_BATCH_SIZE,
    DEFAULT_K,
};
pub use metrics::{MetricValue, RankingMetrics};
pub use popular::MostPopular;
pub use recommender::{from_fn, ColdStartPolicy, RecommendRequest, Recommender};
