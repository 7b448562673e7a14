//! Neighbor ranking
//!
//! Candidates for "most similar users" are the users reachable in two hops
//! (anchor -> rated item -> other rater). Users sharing no item with the
//! anchor carry no signal under any measure, and several distance measures
//! would otherwise rank them as perfectly close (an empty sum is 0).

use super::{view_between, CommonView, Measure};
use crate::graph::{GraphStore, User, UserId};
use crate::rank::{rank, Direction};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// Up to `pool` users most similar to `user` under `measure`.
///
/// Distance measures are returned ascending, similarity measures
/// descending; ties break on ascending user id. The affinity measure keeps
/// only strictly positive totals. Unknown users yield an empty list.
pub fn most_similar_users(
    store: &GraphStore,
    user: &UserId,
    measure: Measure,
    pool: usize,
) -> Vec<(UserId, f64)> {
    let Some(anchor) = store.user(user) else {
        return Vec::new();
    };

    match measure {
        Measure::Affinity => affinity_neighbors(store, anchor, pool),
        Measure::GraphJaccard => graph_jaccard_neighbors(store, anchor, pool),
        _ => distance_neighbors(store, anchor, measure, pool),
    }
}

/// Walk anchor -> item -> rater once, accumulating `midpoint - |ra - rb|`
fn affinity_neighbors(store: &GraphStore, anchor: &User, pool: usize) -> Vec<(UserId, f64)> {
    let midpoint = store.midpoint();
    let mut totals: FxHashMap<&UserId, f64> = FxHashMap::default();

    for (&item_id, &anchor_rating) in anchor.ratings() {
        let Some(item) = store.item(item_id) else {
            continue;
        };
        for (other, &rating) in item.raters() {
            if *other == anchor.id {
                continue;
            }
            *totals.entry(other).or_insert(0.0) += midpoint - (anchor_rating - rating).abs();
        }
    }

    let positive = totals
        .into_iter()
        .filter(|&(_, total)| total > 0.0)
        .map(|(id, total)| (id.clone(), total))
        .collect();
    rank(positive, Direction::Descending, pool)
}

/// Walk anchor -> item -> rater once, counting common and identical ratings
fn graph_jaccard_neighbors(store: &GraphStore, anchor: &User, pool: usize) -> Vec<(UserId, f64)> {
    // (exact matches, common items)
    let mut counts: FxHashMap<&UserId, (usize, usize)> = FxHashMap::default();

    for (&item_id, &anchor_rating) in anchor.ratings() {
        let Some(item) = store.item(item_id) else {
            continue;
        };
        for (other, &rating) in item.raters() {
            if *other == anchor.id {
                continue;
            }
            let entry = counts.entry(other).or_insert((0, 0));
            if rating == anchor_rating {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
    }

    let anchor_len = anchor.rating_count();
    let scored = counts
        .into_iter()
        .filter_map(|(id, (exact, common))| {
            let other = store.user(id)?;
            let union = anchor_len + other.rating_count() - common;
            Some((id.clone(), exact as f64 / union as f64))
        })
        .collect();
    rank(scored, Direction::Descending, pool)
}

/// Score every two-hop candidate with a pairwise distance
fn distance_neighbors(
    store: &GraphStore,
    anchor: &User,
    measure: Measure,
    pool: usize,
) -> Vec<(UserId, f64)> {
    let midpoint = store.midpoint();
    let candidates = two_hop_users(store, anchor);

    let scored: Vec<(UserId, f64)> = candidates
        .par_iter()
        .map(|other| {
            let view: CommonView = view_between(anchor, other);
            (other.id.clone(), measure.eval(&view, midpoint))
        })
        .collect();

    let direction = if measure.is_distance() {
        Direction::Ascending
    } else {
        Direction::Descending
    };
    rank(scored, direction, pool)
}

/// Users other than `anchor` who rated at least one of the anchor's items
pub fn two_hop_users<'a>(store: &'a GraphStore, anchor: &User) -> Vec<&'a User> {
    let mut seen: FxHashSet<&UserId> = FxHashSet::default();
    let mut users = Vec::new();

    for &item_id in anchor.ratings().keys() {
        let Some(item) = store.item(item_id) else {
            continue;
        };
        for other in item.raters().keys() {
            if *other == anchor.id || !seen.insert(other) {
                continue;
            }
            if let Some(user) = store.user(other) {
                users.push(user);
            }
        }
    }

    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ItemAttrs, UserProfile};
    use crate::similarity::similarity;

    /// anchor: 1=9, 2=8, 3=2
    /// twin:   1=9, 2=8, 3=2        (identical)
    /// close:  1=8, 2=8             (near agreement)
    /// hater:  1=1, 2=1, 3=10       (strong disagreement)
    /// loner:  4=7                  (no overlap)
    fn fixture() -> GraphStore {
        let mut store = GraphStore::new();
        for name in ["anchor", "twin", "close", "hater", "loner"] {
            store.add_user(name, UserProfile::default());
        }
        for id in 1..=4u64 {
            store.add_item(id, ItemAttrs::new(format!("Item {}", id))).unwrap();
        }
        let reviews: &[(&str, u64, f64)] = &[
            ("anchor", 1, 9.0),
            ("anchor", 2, 8.0),
            ("anchor", 3, 2.0),
            ("twin", 1, 9.0),
            ("twin", 2, 8.0),
            ("twin", 3, 2.0),
            ("close", 1, 8.0),
            ("close", 2, 8.0),
            ("hater", 1, 1.0),
            ("hater", 2, 1.0),
            ("hater", 3, 10.0),
            ("loner", 4, 7.0),
        ];
        for &(user, item, score) in reviews {
            store.record_review(&UserId::new(user), item, score).unwrap();
        }
        store
    }

    fn ids(ranked: &[(UserId, f64)]) -> Vec<&str> {
        ranked.iter().map(|(id, _)| id.as_str()).collect()
    }

    #[test]
    fn test_affinity_ranking_drops_non_positive() {
        let store = fixture();
        let ranked = most_similar_users(&store, &UserId::new("anchor"), Measure::Affinity, 10);
        assert_eq!(ids(&ranked), vec!["twin", "close"]);
        assert_eq!(ranked[0].1, 16.5);
        assert_eq!(ranked[1].1, 4.5 + 5.5);
    }

    #[test]
    fn test_affinity_matches_pairwise() {
        let store = fixture();
        let anchor = UserId::new("anchor");
        for (other, total) in most_similar_users(&store, &anchor, Measure::Affinity, 10) {
            assert_eq!(similarity(&store, &anchor, &other, Measure::Affinity), Some(total));
        }
    }

    #[test]
    fn test_graph_jaccard_ranking() {
        let store = fixture();
        let ranked =
            most_similar_users(&store, &UserId::new("anchor"), Measure::GraphJaccard, 10);
        assert_eq!(ids(&ranked), vec!["twin", "close", "hater"]);
        assert_eq!(ranked[0].1, 1.0);
        assert_eq!(ranked[1].1, 1.0 / 3.0);
        assert_eq!(ranked[2].1, 0.0);
    }

    #[test]
    fn test_distance_ranking_excludes_disjoint_users() {
        let store = fixture();
        let ranked = most_similar_users(&store, &UserId::new("anchor"), Measure::Euclidean, 10);
        assert_eq!(ids(&ranked), vec!["twin", "close", "hater"]);
        assert_eq!(ranked[0].1, 0.0);
    }

    #[test]
    fn test_pool_truncates() {
        let store = fixture();
        let ranked = most_similar_users(&store, &UserId::new("anchor"), Measure::Manhattan, 1);
        assert_eq!(ids(&ranked), vec!["twin"]);
    }

    #[test]
    fn test_unknown_user() {
        let store = fixture();
        assert!(most_similar_users(&store, &UserId::new("nobody"), Measure::Cosine, 5).is_empty());
    }
}
