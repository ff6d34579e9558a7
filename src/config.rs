//! Engine configuration: the interaction weight table and result sizes.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::InteractionKind;

/// Signed importance of each interaction kind.
///
/// Immutable once built. Pass an alternative table to the engine to try a
/// different weighting scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionWeights {
    pub view: f64,
    pub cart: f64,
    pub purchase: f64,
    pub like: f64,
    pub dislike: f64,
    /// Weight for kinds outside the known set.
    pub fallback: f64,
}

impl Default for InteractionWeights {
    fn default() -> Self {
        InteractionWeights {
            view: 1.0,
            cart: 3.0,
            purchase: 5.0,
            like: 4.0,
            dislike: -2.0,
            fallback: 1.0,
        }
    }
}

impl InteractionWeights {
    #[inline]
    pub fn weight(&self, kind: &InteractionKind) -> f64 {
        match kind {
            InteractionKind::View => self.view,
            InteractionKind::Cart => self.cart,
            InteractionKind::Purchase => self.purchase,
            InteractionKind::Like => self.like,
            InteractionKind::Dislike => self.dislike,
            InteractionKind::Other(_) => self.fallback,
        }
    }
}

/// Tunables for [`RecommendationEngine`](crate::RecommendationEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default size of the "recommended for you" list.
    pub recommend_count: usize,
    /// Default size of the "similar to this item" list.
    pub similar_count: usize,
    pub weights: InteractionWeights,
    /// Popularity increment applied per purchase by the catalog store.
    pub popularity_step: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            recommend_count: 6,
            similar_count: 4,
            weights: InteractionWeights::default(),
            popularity_step: 0.05,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_weights(mut self, weights: InteractionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// `count`, or the configured "recommended for you" size when absent.
    pub fn recommend_count_or(&self, count: Option<usize>) -> usize {
        count.unwrap_or(self.recommend_count)
    }

    /// `count`, or the configured "similar to this item" size when absent.
    pub fn similar_count_or(&self, count: Option<usize>) -> usize {
        count.unwrap_or(self.similar_count)
    }
}
