//! Collaborative filtering by neighbor users
//!
//! Two modes, selected by the measure that produced the neighbor list:
//!
//! - Affinity (the default): every favorite of every neighbor is scored
//!   `max(neighbor_rating * neighbor_similarity)` and the whole candidate set
//!   is ranked.
//! - Any other measure: neighbors are walked in rank order and their
//!   favorites accepted first-seen until `limit` items are collected. The
//!   result is not re-ranked globally; this keeps the distance measures,
//!   whose scores cannot weight a rating, from scanning the full pool.

use crate::graph::{GraphStore, ItemId, User, UserId};
use crate::rank::{rank, Direction};
use crate::similarity::Measure;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// Recommend unrated favorites of `neighbors`.
///
/// `neighbors` must be ordered most similar first, as returned by
/// [`crate::similarity::most_similar_users`] for the same `measure`.
pub fn recommend_by_neighbors(
    store: &GraphStore,
    user: &User,
    neighbors: &[(UserId, f64)],
    measure: Measure,
    favorite_threshold: f64,
    limit: usize,
) -> Vec<(ItemId, f64)> {
    if limit == 0 {
        return Vec::new();
    }
    match measure {
        Measure::Affinity => weighted_max(store, user, neighbors, favorite_threshold, limit),
        _ => first_seen(store, user, neighbors, favorite_threshold, limit),
    }
}

fn weighted_max(
    store: &GraphStore,
    user: &User,
    neighbors: &[(UserId, f64)],
    favorite_threshold: f64,
    limit: usize,
) -> Vec<(ItemId, f64)> {
    let mut scores: FxHashMap<ItemId, f64> = FxHashMap::default();

    for (neighbor_id, similarity) in neighbors {
        let Some(neighbor) = store.user(neighbor_id) else {
            continue;
        };
        for (&item_id, &rating) in neighbor.ratings() {
            if rating < favorite_threshold || user.has_rated(item_id) {
                continue;
            }
            let score = rating * similarity;
            scores
                .entry(item_id)
                .and_modify(|best| *best = best.max(score))
                .or_insert(score);
        }
    }

    rank(scores.into_iter().collect(), Direction::Descending, limit)
}

fn first_seen(
    store: &GraphStore,
    user: &User,
    neighbors: &[(UserId, f64)],
    favorite_threshold: f64,
    limit: usize,
) -> Vec<(ItemId, f64)> {
    let mut accepted: IndexMap<ItemId, f64> = IndexMap::new();

    for (neighbor_id, _) in neighbors {
        let Some(neighbor) = store.user(neighbor_id) else {
            continue;
        };
        let favorites = neighbor
            .ratings()
            .iter()
            .filter(|(item_id, rating)| **rating >= favorite_threshold && !user.has_rated(**item_id))
            .map(|(&item_id, &rating)| (item_id, rating))
            .collect();

        // Within one neighbor: highest rating first, then ascending id
        for (item_id, rating) in rank(favorites, Direction::Descending, usize::MAX) {
            accepted.entry(item_id).or_insert(rating);
            if accepted.len() >= limit {
                return accepted.into_iter().collect();
            }
        }
    }

    accepted.into_iter().collect()
}
