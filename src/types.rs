//! Catalog and interaction records consumed by the engine.
//!
//! The engine only reads these. Both the catalog and the interaction log are
//! owned by the surrounding application and handed over as snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable catalog item identifier.
pub type ItemId = i64;
/// Requesting user identifier.
pub type UserId = i64;
/// Unix timestamp in seconds.
pub type Timestamp = i64;

/// Snapshot of one catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Non-negative price in the catalog currency.
    pub price: f64,
    /// Popularity in [0, 1]; nudged upward by purchases.
    pub popularity_score: f64,
    /// Average rating in [0, 5].
    pub rating: f64,
    pub category_id: i64,
}

impl Item {
    pub fn new(id: ItemId, price: f64, popularity_score: f64, rating: f64, category_id: i64) -> Self {
        Item {
            id,
            price,
            popularity_score,
            rating,
            category_id,
        }
    }

    /// Non-personalized score used for users without history.
    #[inline]
    pub fn popularity_rank_score(&self) -> f64 {
        self.popularity_score * self.rating
    }
}

/// Kind of user–item event.
///
/// Names outside the known set are kept verbatim in `Other` and weigh as
/// the table's fallback weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionKind {
    View,
    Cart,
    Purchase,
    Like,
    Dislike,
    Other(String),
}

impl InteractionKind {
    pub fn as_str(&self) -> &str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Cart => "cart",
            InteractionKind::Purchase => "purchase",
            InteractionKind::Like => "like",
            InteractionKind::Dislike => "dislike",
            InteractionKind::Other(name) => name,
        }
    }
}

impl From<&str> for InteractionKind {
    fn from(name: &str) -> Self {
        match name {
            "view" => InteractionKind::View,
            "cart" => InteractionKind::Cart,
            "purchase" => InteractionKind::Purchase,
            "like" => InteractionKind::Like,
            "dislike" => InteractionKind::Dislike,
            other => InteractionKind::Other(other.to_string()),
        }
    }
}

impl From<String> for InteractionKind {
    fn from(name: String) -> Self {
        InteractionKind::from(name.as_str())
    }
}

impl From<InteractionKind> for String {
    fn from(kind: InteractionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event from the append-only interaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub kind: InteractionKind,
    pub timestamp: Timestamp,
}

impl Interaction {
    pub fn new(user_id: UserId, item_id: ItemId, kind: impl Into<InteractionKind>, timestamp: Timestamp) -> Self {
        Interaction {
            user_id,
            item_id,
            kind: kind.into(),
            timestamp,
        }
    }
}

/// An item together with the score it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub item_id: ItemId,
    pub score: f64,
}
