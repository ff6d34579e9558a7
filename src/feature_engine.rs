//! Item feature extraction and per-call standardization.
//!
//! Every item becomes a 4-dimensional vector:
//!
//! ```text
//! [price / 1000, popularity_score, rating / 5, category_id]
//! ```
//!
//! Vectors live next to their item id in a single ordered [`FeatureMatrix`],
//! so row order and identity can never drift apart. Columns are then
//! z-scored with statistics fitted on that matrix alone; nothing is cached
//! between calls, so the same item can map to different values as the
//! catalog changes.

use ahash::AHashMap;
use rayon::prelude::*;
use tracing::warn;

use crate::error::{RecError, Result};
use crate::types::{Item, ItemId};

/// Number of dimensions per item.
pub const FEATURE_DIM: usize = 4;

/// Fixed-length numeric summary of one item.
pub type FeatureVector = [f64; FEATURE_DIM];

/// Columns whose spread is below this are treated as constant.
const MIN_STD: f64 = 1e-12;

/// Ordered `(item id, vector)` rows with an id → row lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<(ItemId, FeatureVector)>,
    index: AHashMap<ItemId, usize>,
}

impl FeatureMatrix {
    /// Build from rows, keeping the given order.
    pub fn from_rows(rows: Vec<(ItemId, FeatureVector)>) -> Self {
        let mut index = AHashMap::with_capacity(rows.len());
        for (pos, (id, _)) in rows.iter().enumerate() {
            index.entry(*id).or_insert(pos);
        }
        FeatureMatrix { rows, index }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[(ItemId, FeatureVector)] {
        &self.rows
    }

    /// Item ids in row order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.rows.iter().map(|(id, _)| *id)
    }

    /// Row position of `item_id`, if the item is in the matrix.
    pub fn position(&self, item_id: ItemId) -> Option<usize> {
        self.index.get(&item_id).copied()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.index.contains_key(&item_id)
    }

    pub fn vector(&self, item_id: ItemId) -> Option<&FeatureVector> {
        self.position(item_id).map(|pos| &self.rows[pos].1)
    }

    /// Z-score every column using this matrix's own statistics.
    pub fn standardize(&self) -> FeatureMatrix {
        Standardizer::fit(self).transform(self)
    }
}

/// Map one item to its raw feature vector.
///
/// Fails when a numeric field is NaN or infinite; such an item means the
/// catalog snapshot is corrupt.
pub fn item_features(item: &Item) -> Result<FeatureVector> {
    let fields = [
        ("price", item.price),
        ("popularity_score", item.popularity_score),
        ("rating", item.rating),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            warn!(item_id = item.id, field, "malformed catalog item");
            return Err(RecError::MalformedItem {
                item_id: item.id,
                field,
            });
        }
    }

    Ok([
        item.price / 1000.0,
        item.popularity_score,
        item.rating / 5.0,
        item.category_id as f64,
    ])
}

/// Extract the feature matrix for a catalog snapshot, preserving its order.
pub fn extract_features(items: &[Item]) -> Result<FeatureMatrix> {
    let rows = items
        .par_iter()
        .map(|item| item_features(item).map(|v| (item.id, v)))
        .collect::<Result<Vec<_>>>()?;
    Ok(FeatureMatrix::from_rows(rows))
}

/// Column means and standard deviations of one matrix.
///
/// Fitted, applied once, and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardizer {
    pub mean: FeatureVector,
    pub std: FeatureVector,
}

impl Standardizer {
    /// Population mean and standard deviation per column.
    pub fn fit(matrix: &FeatureMatrix) -> Self {
        let n = matrix.len();
        let mut mean = [0.0; FEATURE_DIM];
        let mut std = [0.0; FEATURE_DIM];
        if n == 0 {
            return Standardizer { mean, std };
        }

        for (_, v) in matrix.rows() {
            for d in 0..FEATURE_DIM {
                mean[d] += v[d];
            }
        }
        for m in mean.iter_mut() {
            *m /= n as f64;
        }

        for (_, v) in matrix.rows() {
            for d in 0..FEATURE_DIM {
                let diff = v[d] - mean[d];
                std[d] += diff * diff;
            }
        }
        for s in std.iter_mut() {
            *s = (*s / n as f64).sqrt();
        }

        Standardizer { mean, std }
    }

    /// Rescale one vector. Constant columns map to 0.
    #[inline]
    pub fn apply(&self, v: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_DIM];
        for d in 0..FEATURE_DIM {
            out[d] = if self.std[d] < MIN_STD {
                0.0
            } else {
                (v[d] - self.mean[d]) / self.std[d]
            };
        }
        out
    }

    pub fn transform(&self, matrix: &FeatureMatrix) -> FeatureMatrix {
        let rows = matrix
            .rows()
            .par_iter()
            .map(|(id, v)| (*id, self.apply(v)))
            .collect();
        FeatureMatrix::from_rows(rows)
    }
}
