//! Shared graph handle
//!
//! [`SharedGraph`] owns the store behind an `Arc<RwLock<_>>` so a loader and
//! any number of readers can hold clones of the same handle. Mutators take
//! the write lock for one ingestion call; queries take the read lock.

use crate::config::EngineConfig;
use crate::graph::{
    GraphResult, GraphStatistics, GraphStore, Item, ItemAttrs, ItemId, TagName, UserId,
    UserProfile,
};
use crate::recommend::Recommender;
use crate::similarity::Measure;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe handle to a graph and its engine configuration
#[derive(Clone)]
pub struct SharedGraph {
    store: Arc<RwLock<GraphStore>>,
    config: Arc<EngineConfig>,
}

impl SharedGraph {
    /// Empty graph using the configured rating scale
    pub fn new(config: EngineConfig) -> Self {
        Self::from_store(GraphStore::with_scale(config.scale), config)
    }

    pub fn from_store(store: GraphStore, config: EngineConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // A panic inside a critical section leaves the store consistent: every
    // mutation validates before it writes.
    fn read(&self) -> RwLockReadGuard<'_, GraphStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- ingestion ----

    pub fn add_user(&self, id: impl Into<UserId>, profile: UserProfile) -> bool {
        self.write().add_user(id, profile)
    }

    pub fn add_item(&self, id: impl Into<ItemId>, attrs: ItemAttrs) -> GraphResult<bool> {
        self.write().add_item(id, attrs)
    }

    pub fn link_item_tag(
        &self,
        item_id: impl Into<ItemId>,
        tag_name: impl Into<TagName>,
    ) -> GraphResult<bool> {
        self.write().link_item_tag(item_id, tag_name)
    }

    pub fn record_review(
        &self,
        user_id: &UserId,
        item_id: impl Into<ItemId>,
        score: f64,
    ) -> GraphResult<Option<f64>> {
        self.write().record_review(user_id, item_id, score)
    }

    // ---- queries ----

    /// Run `f` against the store under the read lock
    pub fn with_store<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> R {
        f(&self.read())
    }

    /// Run `f` against a [`Recommender`] under the read lock
    pub fn with_recommender<R>(&self, f: impl FnOnce(&Recommender<'_>) -> R) -> R {
        let store = self.read();
        let recommender = Recommender::new(&store, (*self.config).clone());
        f(&recommender)
    }

    pub fn recommend(&self, user: &UserId, limit: usize) -> Vec<ItemId> {
        self.with_recommender(|r| r.recommend(user, limit))
    }

    pub fn similarity(&self, a: &UserId, b: &UserId, measure: Measure) -> Option<f64> {
        self.with_recommender(|r| r.similarity(a, b, measure))
    }

    pub fn item(&self, id: ItemId) -> Option<Item> {
        self.read().item(id).cloned()
    }

    pub fn lookup_item_by_title(&self, title: &str) -> Option<Item> {
        self.read().lookup_item_by_title(title).cloned()
    }

    pub fn top_by_release_date(&self, limit: usize) -> Vec<ItemId> {
        self.read().top_by_release_date(limit)
    }

    pub fn top_by_popularity(&self, limit: usize) -> Vec<ItemId> {
        self.read().top_by_popularity(limit)
    }

    pub fn top_by_popularity_within_tag(&self, tag: &TagName, limit: usize) -> Vec<ItemId> {
        self.read().top_by_popularity_within_tag(tag, limit)
    }

    pub fn all_tag_names(&self) -> Vec<TagName> {
        self.read().all_tag_names().into_iter().cloned().collect()
    }

    pub fn statistics(&self) -> GraphStatistics {
        self.read().statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_writers_and_readers_share_state() {
        let graph = SharedGraph::new(EngineConfig::default());
        graph.add_item(1u64, ItemAttrs::new("Mononoke").with_popularity(2)).unwrap();
        graph.add_item(2u64, ItemAttrs::new("Spirited Away").with_popularity(1)).unwrap();
        graph.link_item_tag(1u64, "Fantasy").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|n| {
                let graph = graph.clone();
                thread::spawn(move || {
                    let user = UserId::new(format!("viewer{}", n));
                    graph.add_user(user.clone(), UserProfile::default());
                    graph.record_review(&user, 1u64, 9.0).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = graph.statistics();
        assert_eq!(stats.user_count, 4);
        assert_eq!(stats.review_count, 4);
        assert_eq!(graph.top_by_popularity(5), vec![ItemId::new(2), ItemId::new(1)]);
        assert_eq!(graph.all_tag_names(), vec![TagName::new("Fantasy")]);
        assert_eq!(
            graph.lookup_item_by_title("Mononoke").map(|item| item.id),
            Some(ItemId::new(1))
        );
    }

    #[test]
    fn test_recommend_through_handle() {
        let graph = SharedGraph::new(EngineConfig::default());
        graph.add_item(1u64, ItemAttrs::new("Akira").with_popularity(2)).unwrap();
        graph.add_item(2u64, ItemAttrs::new("Ghost in the Shell").with_popularity(1)).unwrap();
        graph.link_item_tag(1u64, "Sci-Fi").unwrap();
        graph.link_item_tag(2u64, "Sci-Fi").unwrap();

        let fan = UserId::new("fan");
        graph.add_user(fan.clone(), UserProfile::default());
        graph.record_review(&fan, 1u64, 10.0).unwrap();

        assert_eq!(graph.recommend(&fan, 5), vec![ItemId::new(2)]);
        assert_eq!(graph.similarity(&fan, &fan, Measure::Euclidean), Some(0.0));
    }
}
