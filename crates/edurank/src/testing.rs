//! Synthetic interaction data for tests and benchmarks.

use rand::prelude::*;

use crate::data::InteractionDataset;
use crate::error::Result;
use crate::rating::{Interaction, RatingConfig};

/// Generate interaction records over `n_players × n_questions`.
///
/// Each pair is observed with probability `density`, at most once, with
/// timestamps increasing in generation order. Ids are `s{i}` and `q{j}`.
pub fn synthetic_interactions(
    n_players: usize,
    n_questions: usize,
    density: f64,
    seed: u64,
) -> Vec<Interaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::new();
    for p in 0..n_players {
        for q in 0..n_questions {
            if rng.r#gen::<f64>() >= density {
                continue;
            }
            let difficulty = rng.gen_range(1..=5);
            records.push(Interaction {
                student_id: format!("s{p}"),
                question_id: format!("q{q}"),
                answer_status: rng.r#gen::<f64>() < 0.6,
                difficulty,
                // A quarter of the students leave the feedback unset.
                difficulty_feedback: if rng.r#gen::<f64>() < 0.25 {
                    0
                } else {
                    rng.gen_range(1..=5)
                },
                time_span: rng.gen_range(1.0..180.0),
                selection_change: rng.gen_range(0..4),
                hint_used: rng.r#gen::<f64>() < 0.2,
                start_time: records.len() as i64,
            });
        }
    }
    records
}

/// [`synthetic_interactions`] rated with the default [`RatingConfig`].
pub fn synthetic_dataset(
    n_players: usize,
    n_questions: usize,
    density: f64,
    seed: u64,
) -> Result<InteractionDataset> {
    let records = synthetic_interactions(n_players, n_questions, density, seed);
    InteractionDataset::from_interactions(&records, &RatingConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_seed() {
        assert_eq!(
            synthetic_interactions(20, 15, 0.3, 9),
            synthetic_interactions(20, 15, 0.3, 9)
        );
    }

    #[test]
    fn pairs_are_unique() {
        let records = synthetic_interactions(30, 30, 0.5, 1);
        let mut pairs: Vec<_> = records
            .iter()
            .map(|r| (r.student_id.clone(), r.question_id.clone()))
            .collect();
        let n = pairs.len();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), n);
        assert!(records.iter().all(|r| (1..=5).contains(&r.difficulty)));
    }

    #[test]
    fn dataset_is_aligned() {
        let ds = synthetic_dataset(10, 8, 0.5, 3).unwrap();
        assert_eq!(ds.weights().len(), ds.n_observations());
        assert_eq!(ds.answer_state().unwrap().len(), ds.n_observations());
    }
}
