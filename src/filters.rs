//! Exclusion filters applied to a ranked candidate list.
//!
//! Two rules:
//!   - caller exclusions (e.g. items already in the cart)
//!   - items the user already interacted with

use ahash::AHashSet;

use crate::types::{ItemId, RankedCandidate};
use crate::user_profile::UserScoreMap;

/// Result of a filter pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    /// Accepted candidates, still in rank order.
    pub kept: Vec<RankedCandidate>,
    /// Ids skipped before the limit was reached.
    pub removed: Vec<ItemId>,
}

impl FilterResult {
    pub fn kept_ids(&self) -> Vec<ItemId> {
        self.kept.iter().map(|c| c.item_id).collect()
    }
}

/// Walk `ranked` in order, skipping excluded and already-engaged items,
/// until `limit` candidates are accepted or the list runs out.
pub fn exclusion_filter(
    ranked: Vec<RankedCandidate>,
    exclude: &AHashSet<ItemId>,
    engaged: &UserScoreMap,
    limit: usize,
) -> FilterResult {
    let mut kept = Vec::with_capacity(limit.min(ranked.len()));
    let mut removed = Vec::new();

    for candidate in ranked {
        if kept.len() >= limit {
            break;
        }
        if exclude.contains(&candidate.item_id) || engaged.contains(candidate.item_id) {
            removed.push(candidate.item_id);
            continue;
        }
        kept.push(candidate);
    }

    FilterResult { kept, removed }
}

/// Drop `anchor` from a similarity ranking and keep the next `limit` items.
pub fn without_anchor(ranked: Vec<RankedCandidate>, anchor: ItemId, limit: usize) -> Vec<RankedCandidate> {
    ranked
        .into_iter()
        .filter(|c| c.item_id != anchor)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(ids: &[ItemId]) -> Vec<RankedCandidate> {
        ids.iter()
            .enumerate()
            .map(|(i, &item_id)| RankedCandidate {
                item_id,
                score: 10.0 - i as f64,
            })
            .collect()
    }

    #[test]
    fn skips_excluded_and_engaged() {
        let exclude: AHashSet<ItemId> = [2].into_iter().collect();
        let mut engaged = UserScoreMap::new();
        engaged.add(3, -2.0);
        let res = exclusion_filter(ranked(&[1, 2, 3, 4, 5]), &exclude, &engaged, 3);
        assert_eq!(res.kept_ids(), vec![1, 4, 5]);
        assert_eq!(res.removed, vec![2, 3]);
    }

    #[test]
    fn fewer_than_limit_is_fine() {
        let exclude: AHashSet<ItemId> = [1, 2].into_iter().collect();
        let res = exclusion_filter(ranked(&[1, 2, 3]), &exclude, &UserScoreMap::new(), 6);
        assert_eq!(res.kept_ids(), vec![3]);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let res = exclusion_filter(ranked(&[1, 2]), &AHashSet::new(), &UserScoreMap::new(), 0);
        assert!(res.kept.is_empty());
    }

    #[test]
    fn anchor_is_dropped_wherever_it_ranks() {
        let out = without_anchor(ranked(&[4, 7, 1, 2]), 7, 2);
        let ids: Vec<ItemId> = out.iter().map(|c| c.item_id).collect();
        assert_eq!(ids, vec![4, 1]);
    }
}
