//! Popularity baseline.

use super::{ColdStartPolicy, RecommendRequest, Recommender};
use crate::data::CsrMatrix;

/// Ranks items by how many players interacted positively with them.
///
/// Ties are broken by ascending item index, so the ranking is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MostPopular {
    ranking: Vec<u32>,
}

impl MostPopular {
    /// Count positive entries per column of `train`.
    pub fn fit(train: &CsrMatrix) -> Self {
        let mut counts = vec![0usize; train.n_cols()];
        for (_, item, value) in train.iter() {
            if value > 0.0 {
                counts[item as usize] += 1;
            }
        }
        let mut ranking: Vec<u32> = (0..train.n_cols() as u32).collect();
        ranking.sort_by(|&a, &b| counts[b as usize].cmp(&counts[a as usize]).then(a.cmp(&b)));
        Self { ranking }
    }

    /// Items from most to least popular.
    pub fn ranking(&self) -> &[u32] {
        &self.ranking
    }

    fn rank_for(&self, request: &RecommendRequest<'_>, user: u32) -> Vec<u32> {
        let seen = request.seen_items(user);
        if seen.is_empty() && request.cold_start == ColdStartPolicy::Skip {
            return Vec::new();
        }
        self.ranking
            .iter()
            .copied()
            .filter(|item| !(request.filter_already_liked && seen.binary_search(item).is_ok()))
            .take(request.n)
            .collect()
    }
}

impl Recommender for MostPopular {
    fn recommend(&self, request: &RecommendRequest<'_>) -> Vec<Vec<u32>> {
        request
            .users
            .iter()
            .map(|&user| self.rank_for(request, user))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train() -> CsrMatrix {
        // Item 2 liked by three players, item 0 by two, item 1 and 3 by one.
        CsrMatrix::from_triplets(
            &[0, 0, 1, 1, 2, 2, 3],
            &[2, 0, 2, 1, 2, 0, 3],
            &[1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.4],
            Some((5, 4)),
        )
        .unwrap()
    }

    fn request<'a>(users: &'a [u32], m: &'a CsrMatrix, cold_start: ColdStartPolicy) -> RecommendRequest<'a> {
        RecommendRequest {
            users,
            user_items: m,
            n: 2,
            filter_already_liked: true,
            cold_start,
        }
    }

    #[test]
    fn ranks_by_positive_count() {
        let model = MostPopular::fit(&train());
        assert_eq!(model.ranking(), &[2, 0, 1, 3]);
    }

    #[test]
    fn filters_seen_items() {
        let m = train();
        let model = MostPopular::fit(&m);
        let lists = model.recommend(&request(&[0, 3], &m, ColdStartPolicy::Skip));
        assert_eq!(lists, vec![vec![1, 3], vec![2, 0]]);
    }

    #[test]
    fn cold_start_policy() {
        let m = train();
        let model = MostPopular::fit(&m);
        let skipped = model.recommend(&request(&[4, 9], &m, ColdStartPolicy::Skip));
        assert_eq!(skipped, vec![Vec::<u32>::new(), Vec::new()]);
        let popular = model.recommend(&request(&[4], &m, ColdStartPolicy::Popular));
        assert_eq!(popular, vec![vec![2, 0]]);
    }
}
