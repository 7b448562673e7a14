//! Shared view over two users' rating neighborhoods
//!
//! Every measure in this crate is a function of the items both users rated
//! (the "common" set) plus the sizes of the two full rating sets. Building
//! that view once and handing it to each measure keeps the kernels small.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

/// Ratings of two users restricted to the items both of them rated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommonView {
    /// `(rating_a, rating_b)` for every commonly rated item
    pub pairs: Vec<(f64, f64)>,
    /// Number of items rated by the first user
    pub len_a: usize,
    /// Number of items rated by the second user
    pub len_b: usize,
}

impl CommonView {
    /// Build the view from two rating maps keyed by item.
    ///
    /// Iterates the smaller map and probes the larger one, so the cost is
    /// `O(min(|a|, |b|))`. Pairs are always reported as `(a, b)`.
    pub fn from_maps<K, S>(a: &HashMap<K, f64, S>, b: &HashMap<K, f64, S>) -> Self
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        let pairs = if a.len() <= b.len() {
            a.iter()
                .filter_map(|(item, &ra)| b.get(item).map(|&rb| (ra, rb)))
                .collect()
        } else {
            b.iter()
                .filter_map(|(item, &rb)| a.get(item).map(|&ra| (ra, rb)))
                .collect()
        };

        Self {
            pairs,
            len_a: a.len(),
            len_b: b.len(),
        }
    }

    /// Build a view directly from rating pairs (tests and callers that already
    /// joined the two neighborhoods).
    pub fn from_pairs(pairs: Vec<(f64, f64)>, len_a: usize, len_b: usize) -> Self {
        Self { pairs, len_a, len_b }
    }

    /// Number of commonly rated items
    pub fn common_count(&self) -> usize {
        self.pairs.len()
    }

    /// Number of commonly rated items on which both ratings are identical
    pub fn exact_matches(&self) -> usize {
        self.pairs.iter().filter(|(a, b)| a == b).count()
    }

    /// True when the two users share no rated item
    pub fn is_disjoint(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Size of the union of both rating sets
    pub fn union_count(&self) -> usize {
        self.len_a + self.len_b - self.common_count()
    }

    /// Absolute rating differences over the common set
    pub fn abs_diffs(&self) -> impl Iterator<Item = f64> + '_ {
        self.pairs.iter().map(|(a, b)| (a - b).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn ratings(entries: &[(u64, f64)]) -> FxHashMap<u64, f64> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_common_view_orientation() {
        // a is larger than b, pairs must still come out as (a, b)
        let a = ratings(&[(1, 9.0), (2, 4.0), (3, 7.0)]);
        let b = ratings(&[(2, 6.0)]);

        let view = CommonView::from_maps(&a, &b);
        assert_eq!(view.pairs, vec![(4.0, 6.0)]);
        assert_eq!(view.len_a, 3);
        assert_eq!(view.len_b, 1);
        assert_eq!(view.union_count(), 3);
    }

    #[test]
    fn test_exact_matches() {
        let view = CommonView::from_pairs(vec![(8.0, 8.0), (3.0, 5.0), (10.0, 10.0)], 4, 3);
        assert_eq!(view.common_count(), 3);
        assert_eq!(view.exact_matches(), 2);
        assert!(!view.is_disjoint());
    }

    #[test]
    fn test_disjoint() {
        let a = ratings(&[(1, 9.0)]);
        let b = ratings(&[(2, 9.0)]);
        let view = CommonView::from_maps(&a, &b);
        assert!(view.is_disjoint());
        assert_eq!(view.union_count(), 2);
    }
}
