//! Content filtering by tag affinity

use crate::graph::{GraphStore, ItemId, TagName, User};
use crate::rank::{rank, Direction};
use rustc_hash::FxHashMap;

/// Score unrated items carrying any of `tags`.
///
/// Each matching tag adds `(item_count - popularity_rank) * tag_weight`, so
/// popular items in well-liked tags rise to the top. Items without a
/// popularity rank are skipped.
pub fn recommend_by_tags(
    store: &GraphStore,
    user: &User,
    tags: &[(TagName, f64)],
    limit: usize,
) -> Vec<(ItemId, f64)> {
    let item_count = store.item_count() as f64;
    let mut scores: FxHashMap<ItemId, f64> = FxHashMap::default();

    for (tag_name, weight) in tags {
        let Some(tag) = store.tag(tag_name) else {
            continue;
        };
        for &item_id in tag.items() {
            if user.has_rated(item_id) {
                continue;
            }
            let Some(popularity) = store.item(item_id).and_then(|i| i.attrs.popularity_rank) else {
                continue;
            };
            *scores.entry(item_id).or_insert(0.0) += (item_count - popularity as f64) * weight;
        }
    }

    rank(scores.into_iter().collect(), Direction::Descending, limit)
}
