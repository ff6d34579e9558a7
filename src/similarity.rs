//! Cosine similarity of one item against the whole catalog.

use rayon::prelude::*;

use crate::feature_engine::{FeatureMatrix, FeatureVector};
use crate::types::ItemId;

#[inline]
fn dot(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
fn l2_norm(v: &FeatureVector) -> f64 {
    dot(v, v).sqrt()
}

/// `a·b / (|a| |b|)`, or 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let denom = l2_norm(a) * l2_norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    (dot(a, b) / denom).clamp(-1.0, 1.0)
}

/// Similarity of `target` to every row of `matrix`, in row order.
///
/// The target's own row is exactly 1.0, even when its vector is degenerate.
/// An id missing from the matrix yields all zeros instead of an error, so a
/// deleted item cannot break the page that asked about it.
pub fn similarity_to(target: ItemId, matrix: &FeatureMatrix) -> Vec<f64> {
    let Some(pos) = matrix.position(target) else {
        return vec![0.0; matrix.len()];
    };
    let anchor = matrix.rows()[pos].1;

    matrix
        .rows()
        .par_iter()
        .enumerate()
        .map(|(row, (_, v))| {
            if row == pos {
                1.0
            } else {
                cosine_similarity(&anchor, v)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_engine::extract_features;
    use crate::types::Item;

    #[test]
    fn parallel_vectors_are_identical() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opposite_vectors() {
        let a = [1.0, 0.0, -1.0, 0.5];
        let b = [-1.0, 0.0, 1.0, -0.5];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_magnitude_is_zero() {
        assert_eq!(cosine_similarity(&[0.0; 4], &[1.0, 1.0, 1.0, 1.0]), 0.0);
    }

    #[test]
    fn scores_align_with_rows() {
        let items = vec![
            Item::new(10, 500.0, 0.9, 4.5, 1),
            Item::new(20, 520.0, 0.8, 4.0, 1),
            Item::new(30, 50_000.0, 0.1, 2.0, 2),
        ];
        let m = extract_features(&items).unwrap().standardize();
        let sims = similarity_to(10, &m);
        assert_eq!(sims.len(), 3);
        assert_eq!(sims[0], 1.0);
        assert!(sims[1] > 0.5);
        assert!(sims[2] < 0.0);
    }

    #[test]
    fn unknown_target_gives_zeros() {
        let items = vec![Item::new(1, 1.0, 0.1, 1.0, 1), Item::new(2, 2.0, 0.2, 2.0, 2)];
        let m = extract_features(&items).unwrap().standardize();
        assert_eq!(similarity_to(999, &m), vec![0.0, 0.0]);
    }

    #[test]
    fn single_item_is_self_similar() {
        let m = extract_features(&[Item::new(1, 5.0, 0.5, 3.0, 1)]).unwrap().standardize();
        assert_eq!(similarity_to(1, &m), vec![1.0]);
    }
}
