//! Interaction datasets and their numeric views.
//!
//! # Overview
//!
//! [`InteractionDataset`] holds the player and question indexes together with
//! one weighted observation per `(player, question)` pair. Recommenders and
//! the evaluator never see identifiers; they consume one of two projections:
//!
//! - [`CsrMatrix`]: sparse `players × questions` matrix, players on rows
//! - [`ObservationArrays`]: flat `[n, 2]` pairs with a parallel weight column
//!
//! Optional side features per player or question live in a [`FeatureTable`].

mod dataset;
mod features;
mod observations;
mod sparse;

pub(crate) use dataset::DatasetParts;
pub use dataset::InteractionDataset;
pub use features::FeatureTable;
pub use observations::ObservationArrays;
pub use sparse::CsrMatrix;
