//! In-memory rating graph storage
//!
//! Users, items and tags live in id-keyed arenas; every relation is an
//! id-keyed map on both endpoints, so there are no reference cycles and each
//! edge weight is an O(1) lookup from either side.
//!
//! The user–tag relation is an aggregate: for every tag `t` and user `u`,
//! `w(u, t) = Σ (score - midpoint)` over the items of `t` rated by `u`. It is
//! maintained incrementally by [`GraphStore::record_review`] and
//! [`GraphStore::link_item_tag`] and cannot be written any other way.

use super::item::{Item, ItemAttrs};
use super::tag::Tag;
use super::types::{EntityKey, ItemId, TagName, UserId};
use super::user::{User, UserProfile};
use crate::config::RatingScale;
use crate::rank::{rank, rank_keys, Direction};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during graph mutations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Invalid edge: user {0} does not exist")]
    InvalidEdgeUser(UserId),

    #[error("Invalid edge: item {0} does not exist")]
    InvalidEdgeItem(ItemId),

    #[error("Score {score} outside rating scale [{min}, {max}]")]
    ScoreOutOfRange { score: f64, min: f64, max: f64 },

    #[error("Title {title:?} already belongs to {existing}")]
    DuplicateTitle { title: String, existing: ItemId },
}

impl GraphError {
    /// True for writes that referenced a missing endpoint
    pub fn is_invalid_edge(&self) -> bool {
        matches!(self, GraphError::InvalidEdgeUser(_) | GraphError::InvalidEdgeItem(_))
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Entity and edge counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub user_count: usize,
    pub item_count: usize,
    pub tag_count: usize,
    /// Number of distinct user–item edges
    pub review_count: usize,
    /// Number of item–tag memberships
    pub item_tag_links: usize,
    /// Number of materialized user–tag aggregates
    pub user_tag_edges: usize,
}

/// In-memory tripartite graph of users, items and tags
///
/// - users: UserId -> User (ratings, derived tag affinity)
/// - items: ItemId -> Item (attributes, tags, raters)
/// - tags: TagName -> Tag (items, derived user affinity)
/// - title_index: title -> ItemId
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    scale: RatingScale,

    users: FxHashMap<UserId, User>,

    items: FxHashMap<ItemId, Item>,

    tags: FxHashMap<TagName, Tag>,

    /// Secondary index for title lookups
    title_index: FxHashMap<String, ItemId>,

    /// Distinct user–item edges
    review_count: usize,

    item_tag_links: usize,
}

impl GraphStore {
    /// Create an empty store on the default 1–10 scale
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store on a custom rating scale
    pub fn with_scale(scale: RatingScale) -> Self {
        GraphStore {
            scale,
            ..Self::default()
        }
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    pub fn midpoint(&self) -> f64 {
        self.scale.midpoint()
    }

    // ---------------------------------------------------------------------
    // Ingestion
    // ---------------------------------------------------------------------

    /// Register a user. Returns `false` (and changes nothing) if the id is
    /// already taken.
    pub fn add_user(&mut self, id: impl Into<UserId>, profile: UserProfile) -> bool {
        let id = id.into();
        if self.users.contains_key(&id) {
            return false;
        }
        debug!("Created user {}", id);
        self.users.insert(id.clone(), User::new(id, profile));
        true
    }

    /// Register an item. Returns `Ok(false)` if the id is already taken
    /// (first write wins) and rejects a title that another item owns.
    /// Items with an empty title are stored but not indexed by title.
    pub fn add_item(&mut self, id: impl Into<ItemId>, attrs: ItemAttrs) -> GraphResult<bool> {
        let id = id.into();
        if self.items.contains_key(&id) {
            return Ok(false);
        }
        let indexed = !attrs.title.is_empty();
        if let Some(&existing) = self.title_index.get(&attrs.title).filter(|_| indexed) {
            warn!("Rejected {}: title {:?} belongs to {}", id, attrs.title, existing);
            return Err(GraphError::DuplicateTitle {
                title: attrs.title,
                existing,
            });
        }

        debug!("Created item {} ({:?})", id, attrs.title);
        if indexed {
            self.title_index.insert(attrs.title.clone(), id);
        }
        self.items.insert(id, Item::new(id, attrs));
        Ok(true)
    }

    /// Attach a tag to an item, creating the tag on first use.
    ///
    /// Ratings the item already holds are folded into the new tag's user
    /// aggregates. Returns `Ok(false)` if the link already existed.
    pub fn link_item_tag(
        &mut self,
        item_id: impl Into<ItemId>,
        tag_name: impl Into<TagName>,
    ) -> GraphResult<bool> {
        let item_id = item_id.into();
        let tag_name = tag_name.into();
        let scale = self.scale;

        let Some(item) = self.items.get_mut(&item_id) else {
            warn!("Rejected tag link {} -> {}: unknown item", item_id, tag_name);
            return Err(GraphError::InvalidEdgeItem(item_id));
        };
        if !item.tags.insert(tag_name.clone()) {
            return Ok(false);
        }

        let tag = self
            .tags
            .entry(tag_name.clone())
            .or_insert_with(|| Tag::new(tag_name.clone()));
        tag.items.insert(item_id);
        self.item_tag_links += 1;

        for (user_id, &score) in &item.raters {
            let delta = scale.deviation(score);
            *tag.users.entry(user_id.clone()).or_insert(0.0) += delta;
            if let Some(user) = self.users.get_mut(user_id) {
                *user.tag_affinity.entry(tag_name.clone()).or_insert(0.0) += delta;
            }
        }

        Ok(true)
    }

    /// Record (or overwrite) a user's rating of an item.
    ///
    /// Overwriting first retracts the previous rating's deviation from every
    /// tag aggregate, so repeated edits never double count. Returns the
    /// rating that was replaced, if any.
    pub fn record_review(
        &mut self,
        user_id: &UserId,
        item_id: impl Into<ItemId>,
        score: f64,
    ) -> GraphResult<Option<f64>> {
        let item_id = item_id.into();
        let scale = self.scale;

        let Some(user) = self.users.get_mut(user_id) else {
            warn!("Rejected review {} -> {}: unknown user", user_id, item_id);
            return Err(GraphError::InvalidEdgeUser(user_id.clone()));
        };
        let Some(item) = self.items.get_mut(&item_id) else {
            warn!("Rejected review {} -> {}: unknown item", user_id, item_id);
            return Err(GraphError::InvalidEdgeItem(item_id));
        };
        if !scale.contains(score) {
            return Err(GraphError::ScoreOutOfRange {
                score,
                min: scale.min,
                max: scale.max,
            });
        }

        let previous = item.raters.insert(user_id.clone(), score);
        user.ratings.insert(item_id, score);
        if previous.is_none() {
            self.review_count += 1;
        }

        let delta = scale.deviation(score) - previous.map_or(0.0, |p| scale.deviation(p));
        for tag_name in &item.tags {
            *user.tag_affinity.entry(tag_name.clone()).or_insert(0.0) += delta;
            if let Some(tag) = self.tags.get_mut(tag_name) {
                *tag.users.entry(user_id.clone()).or_insert(0.0) += delta;
            }
        }

        Ok(previous)
    }

    // ---------------------------------------------------------------------
    // Entity access
    // ---------------------------------------------------------------------

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn tag(&self, name: &TagName) -> Option<&Tag> {
        self.tags.get(name)
    }

    pub fn has_user(&self, id: &UserId) -> bool {
        self.users.contains_key(id)
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Rating of `item` by `user`, from the user side
    pub fn rating(&self, user: &UserId, item: ItemId) -> Option<f64> {
        self.users.get(user).and_then(|u| u.rating_for(item))
    }

    /// Aggregated affinity of `user` towards `tag`
    pub fn tag_affinity(&self, user: &UserId, tag: &TagName) -> Option<f64> {
        self.users.get(user).and_then(|u| u.tag_affinity(tag))
    }

    pub fn lookup_item_by_title(&self, title: &str) -> Option<&Item> {
        self.title_index.get(title).and_then(|id| self.items.get(id))
    }

    /// All tag names in ascending order
    pub fn all_tag_names(&self) -> Vec<&TagName> {
        let mut names: Vec<&TagName> = self.tags.keys().collect();
        names.sort();
        names
    }

    // ---------------------------------------------------------------------
    // Adjacency
    // ---------------------------------------------------------------------

    /// Weighted neighborhood of any vertex, ordered by key.
    ///
    /// Ratings and tag aggregates carry their weight; item–tag memberships
    /// are unweighted and reported as 1.0. Unknown vertices have no
    /// neighbors.
    pub fn neighbors_of(&self, entity: &EntityKey) -> BTreeMap<EntityKey, f64> {
        let mut neighbors = BTreeMap::new();
        match entity {
            EntityKey::User(id) => {
                if let Some(user) = self.users.get(id) {
                    for (&item, &score) in &user.ratings {
                        neighbors.insert(EntityKey::Item(item), score);
                    }
                    for (tag, &weight) in &user.tag_affinity {
                        neighbors.insert(EntityKey::Tag(tag.clone()), weight);
                    }
                }
            }
            EntityKey::Item(id) => {
                if let Some(item) = self.items.get(id) {
                    for (user, &score) in &item.raters {
                        neighbors.insert(EntityKey::User(user.clone()), score);
                    }
                    for tag in &item.tags {
                        neighbors.insert(EntityKey::Tag(tag.clone()), 1.0);
                    }
                }
            }
            EntityKey::Tag(name) => {
                if let Some(tag) = self.tags.get(name) {
                    for (user, &weight) in &tag.users {
                        neighbors.insert(EntityKey::User(user.clone()), weight);
                    }
                    for &item in &tag.items {
                        neighbors.insert(EntityKey::Item(item), 1.0);
                    }
                }
            }
        }
        neighbors
    }

    /// Whether an edge joins `a` and `b`. Symmetric; vertices of the same
    /// kind are never adjacent.
    pub fn is_adjacent(&self, a: &EntityKey, b: &EntityKey) -> bool {
        match (a, b) {
            (EntityKey::User(u), EntityKey::Item(i)) | (EntityKey::Item(i), EntityKey::User(u)) => {
                self.users.get(u).is_some_and(|user| user.has_rated(*i))
            }
            (EntityKey::User(u), EntityKey::Tag(t)) | (EntityKey::Tag(t), EntityKey::User(u)) => {
                self.users
                    .get(u)
                    .is_some_and(|user| user.tag_affinity.contains_key(t))
            }
            (EntityKey::Item(i), EntityKey::Tag(t)) | (EntityKey::Tag(t), EntityKey::Item(i)) => {
                self.items.get(i).is_some_and(|item| item.has_tag(t))
            }
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // Catalog listings
    // ---------------------------------------------------------------------

    /// Newest items first; items without a release date are skipped
    pub fn top_by_release_date(&self, limit: usize) -> Vec<ItemId> {
        let entries = self
            .items
            .values()
            .filter_map(|item| item.attrs.release_date.map(|date| (item.id, date)))
            .collect();
        rank_keys(entries, Direction::Descending, limit)
    }

    /// Most popular items first (ascending popularity rank); unranked items
    /// are skipped
    pub fn top_by_popularity(&self, limit: usize) -> Vec<ItemId> {
        let entries = self
            .items
            .values()
            .filter_map(|item| item.attrs.popularity_rank.map(|rank| (item.id, rank)))
            .collect();
        rank_keys(entries, Direction::Ascending, limit)
    }

    /// [`GraphStore::top_by_popularity`] restricted to the items of one tag
    pub fn top_by_popularity_within_tag(&self, tag: &TagName, limit: usize) -> Vec<ItemId> {
        let Some(tag) = self.tags.get(tag) else {
            return Vec::new();
        };
        let entries = tag
            .items
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter_map(|item| item.attrs.popularity_rank.map(|rank| (item.id, rank)))
            .collect();
        rank_keys(entries, Direction::Ascending, limit)
    }

    /// The user's `k` tags with the highest strictly positive affinity
    pub fn best_liked_tags(&self, user: &UserId, k: usize) -> Vec<(TagName, f64)> {
        let Some(user) = self.users.get(user) else {
            return Vec::new();
        };
        let liked = user
            .tag_affinity
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(tag, &weight)| (tag.clone(), weight))
            .collect();
        rank(liked, Direction::Descending, k)
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            user_count: self.users.len(),
            item_count: self.items.len(),
            tag_count: self.tags.len(),
            review_count: self.review_count,
            item_tag_links: self.item_tag_links,
            user_tag_edges: self.users.values().map(|u| u.tag_affinity.len()).sum(),
        }
    }
}
