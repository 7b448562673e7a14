//! Similarity engine
//!
//! Pairwise measures are implemented in the `anigraph-similarity` crate.
//! This module is the adapter layer: it joins two users' neighborhoods from
//! the store into a [`CommonView`] and ranks candidate neighbors.

pub mod neighbors;

use crate::graph::{GraphStore, User, UserId};

// Re-export the measures
pub use anigraph_similarity::{
    Affinity, CommonView, Cosine, Euclidean, GraphJaccard, Jaccard, Manhattan, Measure,
    Minkowski, Orientation, PairMeasure, UnknownMeasure,
};
pub use neighbors::most_similar_users;

/// Join two users' ratings into a common view
pub fn view_between(a: &User, b: &User) -> CommonView {
    CommonView::from_maps(a.ratings(), b.ratings())
}

/// Build the common view of two users by id; `None` if either is unknown
pub fn build_view(store: &GraphStore, a: &UserId, b: &UserId) -> Option<CommonView> {
    let a = store.user(a)?;
    let b = store.user(b)?;
    Some(view_between(a, b))
}

/// Evaluate `measure` between two users; `None` if either is unknown
pub fn similarity(store: &GraphStore, a: &UserId, b: &UserId, measure: Measure) -> Option<f64> {
    build_view(store, a, b).map(|view| measure.eval(&view, store.midpoint()))
}

/// Jaccard distance between two known users
pub fn jaccard_distance(a: &User, b: &User) -> f64 {
    Jaccard.eval(&view_between(a, b))
}
