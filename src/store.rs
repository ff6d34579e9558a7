//! Data providers consumed by the engine, plus thread-safe in-memory
//! implementations.
//!
//! The in-memory stores use DashMap so request threads can read snapshots
//! while other threads record events or update the catalog.

use std::sync::Arc;

use dashmap::DashMap;

use crate::error::Result;
use crate::types::{Interaction, Item, ItemId, UserId};

/// Supplies the current catalog.
pub trait CatalogSource: Send + Sync {
    /// Every current item, in a stable order.
    fn items(&self) -> Result<Vec<Item>>;
}

/// Supplies a user's interaction history.
pub trait InteractionSource: Send + Sync {
    fn interactions_for(&self, user_id: UserId) -> Result<Vec<Interaction>>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for Arc<T> {
    fn items(&self) -> Result<Vec<Item>> {
        (**self).items()
    }
}

impl<T: InteractionSource + ?Sized> InteractionSource for Arc<T> {
    fn interactions_for(&self, user_id: UserId) -> Result<Vec<Interaction>> {
        (**self).interactions_for(user_id)
    }
}

/// Concurrent in-memory catalog keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Arc<DashMap<ItemId, Item>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let catalog = Self::new();
        catalog.upsert_batch(items);
        catalog
    }

    /// Insert or replace an item.
    pub fn upsert(&self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn upsert_batch(&self, items: impl IntoIterator<Item = Item>) {
        for item in items {
            self.upsert(item);
        }
    }

    pub fn remove(&self, item_id: ItemId) -> Option<Item> {
        self.items.remove(&item_id).map(|(_, item)| item)
    }

    pub fn get(&self, item_id: ItemId) -> Option<Item> {
        self.items.get(&item_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Raise an item's popularity after a purchase, capped at 1.0.
    ///
    /// Returns the new popularity, or `None` for an unknown item.
    pub fn record_purchase(&self, item_id: ItemId, step: f64) -> Option<f64> {
        let mut entry = self.items.get_mut(&item_id)?;
        let item = entry.value_mut();
        item.popularity_score = (item.popularity_score + step).min(1.0);
        Some(item.popularity_score)
    }

    pub fn clear(&self) {
        self.items.clear();
    }
}

impl CatalogSource for InMemoryCatalog {
    /// Snapshot ordered by ascending item id.
    fn items(&self) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self.items.iter().map(|e| e.value().clone()).collect();
        items.sort_unstable_by_key(|item| item.id);
        Ok(items)
    }
}

/// Append-only per-user interaction log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInteractionLog {
    /// user_id → events, oldest first
    events_by_user: Arc<DashMap<UserId, Vec<Interaction>>>,
}

impl InMemoryInteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, interaction: Interaction) {
        self.events_by_user
            .entry(interaction.user_id)
            .or_default()
            .push(interaction);
    }

    pub fn record_batch(&self, interactions: impl IntoIterator<Item = Interaction>) {
        for interaction in interactions {
            self.record(interaction);
        }
    }

    /// Drop a user's history. Returns the number of events removed.
    pub fn clear_user(&self, user_id: UserId) -> usize {
        self.events_by_user
            .remove(&user_id)
            .map(|(_, events)| events.len())
            .unwrap_or(0)
    }

    /// `(user count, total event count)`
    pub fn stats(&self) -> (usize, usize) {
        let users = self.events_by_user.len();
        let events = self.events_by_user.iter().map(|e| e.value().len()).sum();
        (users, events)
    }

    pub fn clear(&self) {
        self.events_by_user.clear();
    }
}

impl InteractionSource for InMemoryInteractionLog {
    fn interactions_for(&self, user_id: UserId) -> Result<Vec<Interaction>> {
        Ok(self
            .events_by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
