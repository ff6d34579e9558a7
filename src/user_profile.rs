//! Per-user interaction profile.
//!
//! A user's event log is folded into one signed weight per item. An item
//! appears in the profile as soon as the user touched it, even if the
//! weights cancel out to zero or go negative: presence alone marks the
//! item as already engaged with.

use ahash::AHashMap;

use crate::config::InteractionWeights;
use crate::types::{Interaction, ItemId, UserId};

/// Item → accumulated interaction weight, in first-interaction order.
///
/// The order is kept so that downstream float accumulation is reproducible
/// from call to call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserScoreMap {
    entries: Vec<(ItemId, f64)>,
    index: AHashMap<ItemId, usize>,
}

impl UserScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `item_id`, creating the entry if needed.
    pub fn add(&mut self, item_id: ItemId, weight: f64) {
        match self.index.get(&item_id) {
            Some(&pos) => self.entries[pos].1 += weight,
            None => {
                self.index.insert(item_id, self.entries.len());
                self.entries.push((item_id, weight));
            }
        }
    }

    pub fn get(&self, item_id: ItemId) -> Option<f64> {
        self.index.get(&item_id).map(|&pos| self.entries[pos].1)
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.index.contains_key(&item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, f64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Sum interaction weights per item for `user_id`.
///
/// Events belonging to other users are ignored, so the whole log may be
/// passed in.
pub fn build_user_scores(
    user_id: UserId,
    interactions: &[Interaction],
    weights: &InteractionWeights,
) -> UserScoreMap {
    let mut scores = UserScoreMap::new();
    for ev in interactions.iter().filter(|ev| ev.user_id == user_id) {
        scores.add(ev.item_id, weights.weight(&ev.kind));
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InteractionKind;

    fn ev(item: ItemId, kind: &str) -> Interaction {
        Interaction::new(1, item, kind, 0)
    }

    #[test]
    fn no_history_is_empty() {
        let scores = build_user_scores(1, &[], &InteractionWeights::default());
        assert!(scores.is_empty());
        assert!(!scores.contains(5));
    }

    #[test]
    fn repeated_item_sums_weights() {
        let log = vec![ev(5, "view"), ev(5, "cart"), ev(5, "purchase"), ev(6, "like")];
        let scores = build_user_scores(1, &log, &InteractionWeights::default());
        assert_eq!(scores.get(5), Some(9.0));
        assert_eq!(scores.get(6), Some(4.0));
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn cancelled_out_item_is_still_present() {
        let log = vec![ev(3, "view"), ev(3, "view"), ev(3, "dislike")];
        let scores = build_user_scores(1, &log, &InteractionWeights::default());
        assert_eq!(scores.get(3), Some(0.0));
        assert!(scores.contains(3));
    }

    #[test]
    fn dislike_can_go_negative() {
        let scores = build_user_scores(1, &[ev(4, "dislike")], &InteractionWeights::default());
        assert_eq!(scores.get(4), Some(-2.0));
    }

    #[test]
    fn unknown_kind_weighs_fallback() {
        let scores = build_user_scores(1, &[ev(8, "wishlist")], &InteractionWeights::default());
        assert_eq!(scores.get(8), Some(1.0));
    }

    #[test]
    fn other_users_are_ignored() {
        let log = vec![ev(1, "view"), Interaction::new(2, 9, InteractionKind::Purchase, 0)];
        let scores = build_user_scores(1, &log, &InteractionWeights::default());
        assert!(!scores.contains(9));
    }

    #[test]
    fn custom_weights_are_honored() {
        let weights = InteractionWeights {
            view: 0.5,
            ..InteractionWeights::default()
        };
        let scores = build_user_scores(1, &[ev(2, "view")], &weights);
        assert_eq!(scores.get(2), Some(0.5));
    }

    #[test]
    fn keeps_first_interaction_order() {
        let log = vec![ev(7, "view"), ev(3, "view"), ev(7, "like")];
        let scores = build_user_scores(1, &log, &InteractionWeights::default());
        let order: Vec<ItemId> = scores.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![7, 3]);
    }
}
