//! Python bindings for the web layer.
//!
//! Python usage:
//!   engine = Engine()
//!   engine.add_item(1, price=499.0, popularity_score=0.9, rating=4.5, category_id=1)
//!   engine.record_interaction(user_id=7, item_id=1, kind="purchase", timestamp=now)
//!   ids = engine.recommend(7, exclude=cart_ids)
//!   ids = engine.similar(1, count=4)

use pyo3::prelude::*;

use crate::config::EngineConfig;
use crate::engine::RecommendationEngine;
use crate::store::{InMemoryCatalog, InMemoryInteractionLog};
use crate::types::{Interaction, Item, ItemId, Timestamp, UserId};

/// Recommendation engine over an in-process catalog and interaction log.
#[pyclass(name = "Engine")]
pub struct PyEngine {
    inner: RecommendationEngine<InMemoryCatalog, InMemoryInteractionLog>,
}

#[pymethods]
impl PyEngine {
    /// Args:
    ///     config_json: optional JSON engine configuration
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => EngineConfig::from_json_str(json)?,
            None => EngineConfig::default(),
        };
        Ok(PyEngine {
            inner: RecommendationEngine::with_config(
                InMemoryCatalog::new(),
                InMemoryInteractionLog::new(),
                config,
            ),
        })
    }

    /// Insert or replace a catalog item.
    fn add_item(&self, id: ItemId, price: f64, popularity_score: f64, rating: f64, category_id: i64) {
        self.inner
            .catalog()
            .upsert(Item::new(id, price, popularity_score, rating, category_id));
    }

    fn remove_item(&self, id: ItemId) -> bool {
        self.inner.catalog().remove(id).is_some()
    }

    /// Append one event to the user's log.
    #[pyo3(signature = (user_id, item_id, kind, timestamp=0))]
    fn record_interaction(&self, user_id: UserId, item_id: ItemId, kind: &str, timestamp: Timestamp) {
        self.inner
            .interactions()
            .record(Interaction::new(user_id, item_id, kind, timestamp));
    }

    /// Log a purchase and nudge the item's popularity.
    ///
    /// Returns the item's new popularity, or None if it is not in the catalog.
    #[pyo3(signature = (user_id, item_id, timestamp=0))]
    fn record_purchase(&self, user_id: UserId, item_id: ItemId, timestamp: Timestamp) -> Option<f64> {
        self.record_interaction(user_id, item_id, "purchase", timestamp);
        let step = self.inner.config().popularity_step;
        self.inner.catalog().record_purchase(item_id, step)
    }

    /// Item ids recommended for `user_id`, best first.
    ///
    /// `count` defaults to the configured `recommend_count`.
    #[pyo3(signature = (user_id, count=None, exclude=None))]
    fn recommend(
        &self,
        py: Python<'_>,
        user_id: UserId,
        count: Option<usize>,
        exclude: Option<Vec<ItemId>>,
    ) -> PyResult<Vec<ItemId>> {
        let count = self.inner.config().recommend_count_or(count);
        let exclude = exclude.unwrap_or_default();
        Ok(py.allow_threads(|| self.inner.recommend(user_id, count, &exclude))?)
    }

    /// Item ids most similar to `item_id`, excluding it.
    ///
    /// `count` defaults to the configured `similar_count`.
    #[pyo3(signature = (item_id, count=None))]
    fn similar(&self, py: Python<'_>, item_id: ItemId, count: Option<usize>) -> PyResult<Vec<ItemId>> {
        let count = self.inner.config().similar_count_or(count);
        Ok(py.allow_threads(|| self.inner.similar(item_id, count))?)
    }

    /// Drop one user's interaction history. Returns the number of events removed.
    fn clear_user(&self, user_id: UserId) -> usize {
        self.inner.interactions().clear_user(user_id)
    }

    /// Empty both the catalog and the interaction log.
    fn clear(&self) {
        self.inner.catalog().clear();
        self.inner.interactions().clear();
    }

    fn __len__(&self) -> usize {
        self.inner.catalog().len()
    }

    fn __repr__(&self) -> String {
        let (users, events) = self.inner.interactions().stats();
        format!(
            "Engine(items={}, users={}, interactions={})",
            self.inner.catalog().len(),
            users,
            events
        )
    }
}
