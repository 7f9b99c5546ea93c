//! The recommender contract consumed by the evaluator.

use serde::{Deserialize, Serialize};

use crate::data::CsrMatrix;

/// What to return for a user with no train interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStartPolicy {
    /// Return an empty list.
    #[default]
    Skip,
    /// Fall back to globally popular items.
    Popular,
}

/// One batch of users to rank for.
#[derive(Debug, Clone, Copy)]
pub struct RecommendRequest<'a> {
    /// Player indices, one list expected back per entry.
    pub users: &'a [u32],
    /// Train interactions, players on rows.
    pub user_items: &'a CsrMatrix,
    /// Length of each ranked list.
    pub n: usize,
    /// Whether items a user already interacted with in `user_items` must be left out.
    pub filter_already_liked: bool,
    pub cold_start: ColdStartPolicy,
}

impl RecommendRequest<'_> {
    /// Train items of `user`, empty when the user is outside `user_items`.
    pub fn seen_items(&self, user: u32) -> &[u32] {
        let user = user as usize;
        if user < self.user_items.n_rows() {
            self.user_items.row(user).0
        } else {
            &[]
        }
    }
}

/// A model that ranks items for users.
///
/// Implementations return exactly one list per requested user, best item
/// first. Lists may be shorter than `n`; entries past `n` are ignored.
pub trait Recommender {
    fn recommend(&self, request: &RecommendRequest<'_>) -> Vec<Vec<u32>>;
}

impl<F> Recommender for F
where
    F: Fn(&RecommendRequest<'_>) -> Vec<Vec<u32>>,
{
    fn recommend(&self, request: &RecommendRequest<'_>) -> Vec<Vec<u32>> {
        self(request)
    }
}

/// Pin a closure to the [`Recommender`] signature.
///
/// ```
/// use edurank::eval::{from_fn, Recommender};
///
/// let fixed = vec![2, 0, 1];
/// let model = from_fn(move |req| req.users.iter().map(|_| fixed.clone()).collect());
/// # let _: &dyn Recommender = &model;
/// ```
pub fn from_fn<F>(f: F) -> F
where
    F: Fn(&RecommendRequest<'_>) -> Vec<Vec<u32>>,
{
    f
}
