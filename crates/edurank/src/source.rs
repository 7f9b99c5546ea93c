//! Interaction sources.
//!
//! The crate never talks to a database. A source hands over a materialised
//! extract of [`Interaction`] records, which [`deduplicate_latest`] reduces
//! to one record per `(student_id, question_id)` pair.

use std::collections::HashMap;
use std::convert::Infallible;

use crate::rating::Interaction;

/// Anything that can produce a complete interaction extract.
pub trait InteractionSource {
    type Error: std::error::Error;

    /// Fetch every interaction record.
    fn fetch(&self) -> Result<Vec<Interaction>, Self::Error>;
}

impl InteractionSource for Vec<Interaction> {
    type Error = Infallible;

    fn fetch(&self) -> Result<Vec<Interaction>, Self::Error> {
        Ok(self.clone())
    }
}

impl InteractionSource for [Interaction] {
    type Error = Infallible;

    fn fetch(&self) -> Result<Vec<Interaction>, Self::Error> {
        Ok(self.to_vec())
    }
}

/// Keep the latest record per `(student_id, question_id)`.
///
/// Records are stably sorted by `start_time`; for each pair the last record
/// in that order survives. Survivors are returned in ascending `start_time`
/// order, ties kept in input order.
pub fn deduplicate_latest(mut records: Vec<Interaction>) -> Vec<Interaction> {
    records.sort_by_key(|r| r.start_time);

    let mut last: HashMap<(&str, &str), usize> = HashMap::with_capacity(records.len());
    for (pos, r) in records.iter().enumerate() {
        last.insert((r.student_id.as_str(), r.question_id.as_str()), pos);
    }
    let keep: Vec<bool> = records
        .iter()
        .enumerate()
        .map(|(pos, r)| last[&(r.student_id.as_str(), r.question_id.as_str())] == pos)
        .collect();

    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, keep)| keep.then_some(r))
        .collect()
}
