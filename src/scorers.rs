//! Candidate scoring and ordering.
//!
//! Two scoring modes:
//!   - personalized: Σ(weight_i × similarity(interacted_i, item)) over the
//!     user's history, so dislikes pull similar items down
//!   - cold start: popularity_score × rating

use std::cmp::Ordering;

use crate::feature_engine::FeatureMatrix;
use crate::similarity::similarity_to;
use crate::types::{Item, ItemId, RankedCandidate};
use crate::user_profile::UserScoreMap;

/// Weighted similarity score for every row of `matrix`.
///
/// Interacted items missing from the matrix contribute nothing.
pub fn weighted_similarity_scores(user_scores: &UserScoreMap, matrix: &FeatureMatrix) -> Vec<f64> {
    let mut total = vec![0.0; matrix.len()];
    for (item_id, weight) in user_scores.iter() {
        if !matrix.contains(item_id) {
            continue;
        }
        let sims = similarity_to(item_id, matrix);
        for (acc, sim) in total.iter_mut().zip(sims) {
            *acc += sim * weight;
        }
    }
    total
}

/// Non-personalized score per item, in the same order as `items`.
pub fn popularity_scores(items: &[Item]) -> Vec<f64> {
    items.iter().map(Item::popularity_rank_score).collect()
}

/// Pair ids with scores and sort by score, highest first.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_descending(ids: impl IntoIterator<Item = ItemId>, scores: Vec<f64>) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = ids
        .into_iter()
        .zip(scores)
        .map(|(item_id, score)| RankedCandidate { item_id, score })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}
