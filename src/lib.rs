//! Content-based product recommendations for catalog pages.
//!
//! Two surfaces:
//!   - "recommended for you": a user's weighted interaction history is
//!     matched against every item by cosine similarity; users without
//!     history get a popularity ranking
//!   - "similar to this item": items nearest to an anchor item
//!
//! Each item is summarized as `[price / 1000, popularity, rating / 5, category]`,
//! standardized per call against the current catalog.
//!
//! Modules:
//!   - feature_engine: item vectors, per-call z-score standardization
//!   - similarity: cosine similarity against the whole catalog
//!   - user_profile: interaction log → per-item signed weights
//!   - scorers: weighted-similarity and popularity scoring, stable ranking
//!   - filters: exclusion of cart items, engaged items, the anchor
//!   - store: provider traits and DashMap-backed in-memory stores
//!   - engine: `recommend` / `similar` entry points
//!
//! Build the Python module: `maturin develop --release --features python`
//! Usage in Python: `import catalog_rec`

pub mod config;
pub mod engine;
pub mod error;
pub mod feature_engine;
pub mod filters;
pub mod scorers;
pub mod similarity;
pub mod store;
pub mod types;
pub mod user_profile;

#[cfg(feature = "python")]
mod python;

pub use config::{EngineConfig, InteractionWeights};
pub use engine::{CatalogSnapshot, RecommendationEngine, RequestScope};
pub use error::{RecError, Result};
pub use feature_engine::{FeatureMatrix, FeatureVector};
pub use store::{CatalogSource, InMemoryCatalog, InMemoryInteractionLog, InteractionSource};
pub use types::{Interaction, InteractionKind, Item, ItemId, RankedCandidate, Timestamp, UserId};
pub use user_profile::UserScoreMap;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// catalog_rec — Rust recommendation engine for the shop front end.
#[cfg(feature = "python")]
#[pymodule]
fn catalog_rec(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyEngine>()?;
    Ok(())
}
