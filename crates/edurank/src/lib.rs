//! edurank: implicit-feedback datasets and ranked-retrieval evaluation for
//! question recommenders.
//!
//! Raw student–question interactions are rated into a single implicit
//! feedback weight, indexed into a sparse player × question dataset, split
//! into train and test partitions, and used to score the top-K output of an
//! external recommender.
//!
//! # Key Types
//!
//! - [`RatingConfig`] - Rating policy (weights, decay constants, performance model)
//! - [`InteractionDataset`] - Indexed observations with sparse and flat views
//! - [`TrainTestSplit`] - Reproducible observation-level partitioning
//! - [`RankingEvaluator`] / [`RankingMetrics`] - Batched precision/MAP/NDCG/AUC at K
//!
//! # Pipeline
//!
//! ```
//! use edurank::eval::{MostPopular, RankingEvaluator};
//! use edurank::{RatingConfig, InteractionDataset, TrainTestSplit};
//!
//! let records = edurank::testing::synthetic_interactions(50, 30, 0.3, 7);
//! let ds = InteractionDataset::from_interactions(&records, &RatingConfig::default()).unwrap();
//!
//! let split = TrainTestSplit::builder().train_percentage(0.8).seed(42).build().unwrap();
//! let (train, test) = split.split_sparse(&ds).unwrap();
//!
//! let model = MostPopular::fit(&train);
//! let metrics = RankingEvaluator::default().evaluate(&model, &train, &test).unwrap();
//! assert!((0.0..=1.0).contains(&metrics.auc));
//! ```

// Re-export approx for users comparing weights and metrics
pub use approx;

pub mod data;
pub mod error;
pub mod eval;
pub mod index;
pub mod io;
pub mod logger;
pub mod rating;
pub mod source;
pub mod split;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use error::{Error, Result};
pub use index::IdIndex;

pub use rating::{Interaction, PerformanceModel, RatingConfig};
pub use source::{deduplicate_latest, InteractionSource};

pub use data::{CsrMatrix, FeatureTable, InteractionDataset, ObservationArrays};
pub use split::TrainTestSplit;

pub use eval::{
    ranking_metrics_at_k, EvalConfig, MetricValue, RankingEvaluator, RankingMetrics, Recommender,
};
pub use logger::Verbosity;
