//! Recommendation entry points.
//!
//! Both surfaces share the same front half:
//!
//! ```text
//! catalog snapshot → extract features → standardize
//!     recommend: user history → weighted similarity (or popularity) → rank → exclude
//!     similar:   anchor similarity → rank → drop anchor
//! ```
//!
//! The engine keeps no state between calls. Each call reads fresh snapshots
//! from its collaborators, so catalog edits and new interactions are picked
//! up immediately. A page that needs both lists can open one
//! [`RequestScope`] and share the normalized catalog between them.

use ahash::AHashSet;
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::feature_engine::{extract_features, FeatureMatrix};
use crate::filters::{exclusion_filter, without_anchor};
use crate::scorers::{popularity_scores, rank_descending, weighted_similarity_scores};
use crate::similarity::similarity_to;
use crate::store::{CatalogSource, InteractionSource};
use crate::types::{Item, ItemId, RankedCandidate, UserId};
use crate::user_profile::{build_user_scores, UserScoreMap};

/// Catalog items with their standardized feature matrix, row-aligned.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    items: Vec<Item>,
    features: FeatureMatrix,
}

impl CatalogSnapshot {
    /// Extract and standardize features for `items`, keeping their order.
    pub fn build(items: Vec<Item>) -> Result<Self> {
        let features = extract_features(&items)?.standardize();
        Ok(CatalogSnapshot { items, features })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn item(&self, item_id: ItemId) -> Option<&Item> {
        self.features.position(item_id).map(|pos| &self.items[pos])
    }

    /// Rank the catalog for a user profile and apply exclusions.
    pub fn rank_for_user(
        &self,
        user_scores: &UserScoreMap,
        count: usize,
        exclude: &AHashSet<ItemId>,
    ) -> Vec<RankedCandidate> {
        if self.is_empty() {
            return Vec::new();
        }

        let scores = if user_scores.is_empty() {
            popularity_scores(&self.items)
        } else {
            weighted_similarity_scores(user_scores, &self.features)
        };
        let ranked = rank_descending(self.features.ids(), scores);
        let filtered = exclusion_filter(ranked, exclude, user_scores, count);
        debug!(
            kept = filtered.kept.len(),
            removed = filtered.removed.len(),
            "exclusions applied"
        );
        filtered.kept
    }

    /// Items most similar to `anchor`, anchor excluded.
    ///
    /// An anchor not in the catalog yields an empty list.
    pub fn rank_similar(&self, anchor: ItemId, count: usize) -> Vec<RankedCandidate> {
        if !self.features.contains(anchor) {
            debug!(anchor, "anchor not in catalog");
            return Vec::new();
        }
        let sims = similarity_to(anchor, &self.features);
        let ranked = rank_descending(self.features.ids(), sims);
        without_anchor(ranked, anchor, count)
    }

    /// Resolve ranked ids back to catalog records, keeping rank order.
    pub fn resolve(&self, ranked: &[RankedCandidate]) -> Vec<Item> {
        ranked
            .iter()
            .filter_map(|c| self.item(c.item_id).cloned())
            .collect()
    }
}

/// Content-based recommender over a catalog and an interaction log.
#[derive(Debug, Clone)]
pub struct RecommendationEngine<C, I> {
    catalog: C,
    interactions: I,
    config: EngineConfig,
}

impl<C: CatalogSource, I: InteractionSource> RecommendationEngine<C, I> {
    pub fn new(catalog: C, interactions: I) -> Self {
        Self::with_config(catalog, interactions, EngineConfig::default())
    }

    pub fn with_config(catalog: C, interactions: I, config: EngineConfig) -> Self {
        RecommendationEngine {
            catalog,
            interactions,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn interactions(&self) -> &I {
        &self.interactions
    }

    /// Read and normalize the catalog once for a single page render.
    pub fn request(&self) -> Result<RequestScope<'_, C, I>> {
        let snapshot = CatalogSnapshot::build(self.catalog.items()?)?;
        debug!(items = snapshot.len(), "catalog snapshot built");
        Ok(RequestScope {
            engine: self,
            snapshot,
        })
    }

    /// Fold the user's interaction log into per-item weights.
    pub fn user_scores(&self, user_id: UserId) -> Result<UserScoreMap> {
        let events = self.interactions.interactions_for(user_id)?;
        Ok(build_user_scores(user_id, &events, &self.config.weights))
    }

    /// Up to `count` item ids recommended for `user_id`, best first.
    pub fn recommend(&self, user_id: UserId, count: usize, exclude: &[ItemId]) -> Result<Vec<ItemId>> {
        self.request()?.recommend(user_id, count, exclude)
    }

    pub fn recommend_ranked(
        &self,
        user_id: UserId,
        count: usize,
        exclude: &[ItemId],
    ) -> Result<Vec<RankedCandidate>> {
        self.request()?.recommend_ranked(user_id, count, exclude)
    }

    pub fn recommend_items(&self, user_id: UserId, count: usize, exclude: &[ItemId]) -> Result<Vec<Item>> {
        self.request()?.recommend_items(user_id, count, exclude)
    }

    /// `recommend` with the configured count and no exclusions.
    pub fn recommend_default(&self, user_id: UserId) -> Result<Vec<ItemId>> {
        self.recommend(user_id, self.config.recommend_count, &[])
    }

    /// Up to `count` item ids most similar to `item_id`, never `item_id` itself.
    pub fn similar(&self, item_id: ItemId, count: usize) -> Result<Vec<ItemId>> {
        self.request()?.similar(item_id, count)
    }

    pub fn similar_ranked(&self, item_id: ItemId, count: usize) -> Result<Vec<RankedCandidate>> {
        Ok(self.request()?.similar_ranked(item_id, count))
    }

    pub fn similar_items(&self, item_id: ItemId, count: usize) -> Result<Vec<Item>> {
        Ok(self.request()?.similar_items(item_id, count))
    }

    /// `similar` with the configured count.
    pub fn similar_default(&self, item_id: ItemId) -> Result<Vec<ItemId>> {
        self.similar(item_id, self.config.similar_count)
    }
}

/// One normalized catalog shared by every list on a page.
pub struct RequestScope<'e, C, I> {
    engine: &'e RecommendationEngine<C, I>,
    snapshot: CatalogSnapshot,
}

impl<'e, C: CatalogSource, I: InteractionSource> RequestScope<'e, C, I> {
    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    #[instrument(skip(self, exclude), fields(catalog = self.snapshot.len()))]
    pub fn recommend_ranked(
        &self,
        user_id: UserId,
        count: usize,
        exclude: &[ItemId],
    ) -> Result<Vec<RankedCandidate>> {
        if self.snapshot.is_empty() {
            debug!("empty catalog");
            return Ok(Vec::new());
        }

        let user_scores = self.engine.user_scores(user_id)?;
        if user_scores.is_empty() {
            debug!("no history, ranking by popularity");
        } else {
            let unknown = user_scores
                .iter()
                .filter(|(id, _)| !self.snapshot.features().contains(*id))
                .count();
            debug!(interacted = user_scores.len(), unknown, "ranking by weighted similarity");
        }

        let exclude: AHashSet<ItemId> = exclude.iter().copied().collect();
        Ok(self.snapshot.rank_for_user(&user_scores, count, &exclude))
    }

    pub fn recommend(&self, user_id: UserId, count: usize, exclude: &[ItemId]) -> Result<Vec<ItemId>> {
        Ok(self
            .recommend_ranked(user_id, count, exclude)?
            .into_iter()
            .map(|c| c.item_id)
            .collect())
    }

    pub fn recommend_items(&self, user_id: UserId, count: usize, exclude: &[ItemId]) -> Result<Vec<Item>> {
        let ranked = self.recommend_ranked(user_id, count, exclude)?;
        Ok(self.snapshot.resolve(&ranked))
    }

    pub fn similar_ranked(&self, item_id: ItemId, count: usize) -> Vec<RankedCandidate> {
        self.snapshot.rank_similar(item_id, count)
    }

    pub fn similar(&self, item_id: ItemId, count: usize) -> Result<Vec<ItemId>> {
        Ok(self
            .similar_ranked(item_id, count)
            .into_iter()
            .map(|c| c.item_id)
            .collect())
    }

    pub fn similar_items(&self, item_id: ItemId, count: usize) -> Vec<Item> {
        self.snapshot.resolve(&self.similar_ranked(item_id, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecError;
    use crate::store::{InMemoryCatalog, InMemoryInteractionLog};
    use crate::types::Interaction;

    struct FailingCatalog;

    impl CatalogSource for FailingCatalog {
        fn items(&self) -> Result<Vec<Item>> {
            Err(RecError::Source("catalog offline".into()))
        }
    }

    fn engine() -> RecommendationEngine<InMemoryCatalog, InMemoryInteractionLog> {
        let catalog = InMemoryCatalog::from_items(vec![
            Item::new(1, 500.0, 0.9, 4.5, 1),
            Item::new(2, 520.0, 0.8, 4.0, 1),
            Item::new(3, 50_000.0, 0.1, 2.0, 2),
        ]);
        RecommendationEngine::new(catalog, InMemoryInteractionLog::new())
    }

    #[test]
    fn purchase_of_a_recommends_b_then_c() {
        let engine = engine();
        engine.interactions().record(Interaction::new(7, 1, "purchase", 0));
        assert_eq!(engine.recommend(7, 2, &[]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn cold_start_uses_popularity() {
        let engine = engine();
        assert_eq!(engine.recommend_default(7).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn exclusions_apply_on_cold_start() {
        let engine = engine();
        assert_eq!(engine.recommend(7, 6, &[1]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn empty_catalog_is_empty_result() {
        let engine = RecommendationEngine::new(InMemoryCatalog::new(), InMemoryInteractionLog::new());
        assert!(engine.recommend_default(1).unwrap().is_empty());
        assert!(engine.similar_default(1).unwrap().is_empty());
    }

    #[test]
    fn similar_skips_anchor() {
        let engine = engine();
        assert_eq!(engine.similar(1, 4).unwrap(), vec![2, 3]);
    }

    #[test]
    fn unknown_anchor_is_empty() {
        assert!(engine().similar(999, 4).unwrap().is_empty());
    }

    #[test]
    fn ranked_results_carry_scores() {
        let engine = engine();
        let ranked = engine.similar_ranked(1, 1).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item_id, 2);
        assert!(ranked[0].score > 0.0 && ranked[0].score <= 1.0);
    }

    #[test]
    fn items_are_resolved_in_rank_order() {
        let engine = engine();
        let items = engine.recommend_items(7, 2, &[]).unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn one_scope_serves_both_lists() {
        let engine = engine();
        engine.interactions().record(Interaction::new(7, 1, "purchase", 0));
        let scope = engine.request().unwrap();
        assert_eq!(scope.recommend(7, 2, &[]).unwrap(), engine.recommend(7, 2, &[]).unwrap());
        assert_eq!(scope.similar(2, 4).unwrap(), engine.similar(2, 4).unwrap());
    }

    #[test]
    fn source_failure_propagates() {
        let engine = RecommendationEngine::new(FailingCatalog, InMemoryInteractionLog::new());
        assert_eq!(
            engine.recommend_default(1).unwrap_err(),
            RecError::Source("catalog offline".into())
        );
    }

    #[test]
    fn malformed_item_is_hard_failure() {
        let engine = engine();
        engine.catalog().upsert(Item::new(4, f64::NAN, 0.5, 3.0, 1));
        assert!(matches!(
            engine.similar(1, 4),
            Err(RecError::MalformedItem { item_id: 4, field: "price" })
        ));
    }
}
