//! Recommendation engine
//!
//! The [`Recommender`] borrows a [`GraphStore`] and picks a ranking strategy
//! from the target user's interaction volume:
//! - no ratings: nothing to go on, empty result
//! - fewer than `collaborative_min_ratings`: content filtering over the
//!   user's best-liked tags
//! - otherwise: collaborative filtering over the most similar users
//!
//! Each strategy is also reachable directly, regardless of that policy.

pub mod collaborative;
pub mod content;
pub mod evaluation;
pub mod prediction;

use crate::config::EngineConfig;
use crate::graph::{GraphStore, ItemId, TagName, UserId};
use crate::similarity::{self, Measure};
use tracing::debug;

pub use evaluation::{EvaluatedStrategy, EvaluationReport, HeldOut, StrategyScore};

/// Strategy chosen for a user by [`Recommender::recommend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Unknown user or no ratings
    Empty,
    ContentFiltering,
    CollaborativeFiltering,
}

impl Strategy {
    /// Select a strategy from a rating count
    pub fn select(rating_count: usize, config: &EngineConfig) -> Self {
        if rating_count == 0 {
            Strategy::Empty
        } else if rating_count < config.collaborative_min_ratings {
            Strategy::ContentFiltering
        } else {
            Strategy::CollaborativeFiltering
        }
    }
}

/// Read-only recommendation view over a graph
pub struct Recommender<'g> {
    graph: &'g GraphStore,
    config: EngineConfig,
}

impl<'g> Recommender<'g> {
    pub fn new(graph: &'g GraphStore, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    /// Recommender with [`EngineConfig::default`] tuning
    pub fn with_defaults(graph: &'g GraphStore) -> Self {
        Self::new(graph, EngineConfig::default())
    }

    pub fn graph(&self) -> &'g GraphStore {
        self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Strategy [`recommend`](Self::recommend) would use for `user`
    pub fn strategy_for(&self, user: &UserId) -> Strategy {
        let count = self.graph.user(user).map_or(0, |u| u.rating_count());
        Strategy::select(count, &self.config)
    }

    /// Up to `limit` items `user` has not rated, best first
    pub fn recommend(&self, user: &UserId, limit: usize) -> Vec<ItemId> {
        let strategy = self.strategy_for(user);
        debug!("Recommending for {} with {:?} (limit {})", user, strategy, limit);

        match strategy {
            Strategy::Empty => Vec::new(),
            Strategy::ContentFiltering => self.recommend_by_tags(user, limit),
            Strategy::CollaborativeFiltering => {
                self.recommend_by_users(user, limit, self.config.default_measure)
            }
        }
    }

    /// Content filtering over the user's best-liked tags
    pub fn recommend_by_tags(&self, user: &UserId, limit: usize) -> Vec<ItemId> {
        let Some(target) = self.graph.user(user) else {
            return Vec::new();
        };
        let tags = self.best_liked_tags(user);
        content::recommend_by_tags(self.graph, target, &tags, limit)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Collaborative filtering over the neighbor pool under `measure`
    pub fn recommend_by_users(&self, user: &UserId, limit: usize, measure: Measure) -> Vec<ItemId> {
        let Some(target) = self.graph.user(user) else {
            return Vec::new();
        };
        let neighbors = self.most_similar_users(user, measure);
        debug!("{} has {} neighbors under {}", user, neighbors.len(), measure);

        collaborative::recommend_by_neighbors(
            self.graph,
            target,
            &neighbors,
            measure,
            self.config.favorite_threshold,
            limit,
        )
        .into_iter()
        .map(|(id, _)| id)
        .collect()
    }

    /// Unrated items ranked by predicted score
    pub fn recommend_by_score_prediction(&self, user: &UserId, limit: usize) -> Vec<ItemId> {
        let Some(target) = self.graph.user(user) else {
            return Vec::new();
        };
        prediction::recommend_by_prediction(self.graph, target, limit)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Most popular items the user has not rated
    ///
    /// Unknown users get the plain popularity listing.
    pub fn recommend_popular(&self, user: &UserId, limit: usize) -> Vec<ItemId> {
        let target = self.graph.user(user);
        self.graph
            .top_by_popularity(self.graph.item_count())
            .into_iter()
            .filter(|&id| !target.is_some_and(|u| u.has_rated(id)))
            .take(limit)
            .collect()
    }

    /// Predicted score of `user` for `item`
    pub fn predict_score(&self, user: &UserId, item: ItemId) -> Option<f64> {
        prediction::predict_score(self.graph, user, item)
    }

    /// Pairwise value of `measure` between two users
    pub fn similarity(&self, a: &UserId, b: &UserId, measure: Measure) -> Option<f64> {
        similarity::similarity(self.graph, a, b, measure)
    }

    /// Neighbor pool of `user` under `measure`, sized by configuration
    pub fn most_similar_users(&self, user: &UserId, measure: Measure) -> Vec<(UserId, f64)> {
        similarity::most_similar_users(self.graph, user, measure, self.config.neighbor_pool)
    }

    /// Top tags by positive aggregate, sized by configuration
    pub fn best_liked_tags(&self, user: &UserId) -> Vec<(TagName, f64)> {
        self.graph.best_liked_tags(user, self.config.content_tag_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ItemAttrs, UserProfile};

    fn catalog() -> GraphStore {
        let mut store = GraphStore::new();
        let items: &[(u64, &str, u32, &str)] = &[
            (1, "Cowboy Bebop", 3, "Action"),
            (2, "Trigun", 5, "Action"),
            (3, "Samurai Champloo", 4, "Action"),
            (4, "Toradora!", 1, "Romance"),
            (5, "Clannad", 2, "Romance"),
        ];
        for &(id, title, popularity, tag) in items {
            store
                .add_item(id, ItemAttrs::new(title).with_popularity(popularity))
                .unwrap();
            store.link_item_tag(id, tag).unwrap();
        }
        store
    }

    #[test]
    fn test_strategy_selection() {
        let config = EngineConfig::default();
        assert_eq!(Strategy::select(0, &config), Strategy::Empty);
        assert_eq!(Strategy::select(1, &config), Strategy::ContentFiltering);
        assert_eq!(Strategy::select(2, &config), Strategy::ContentFiltering);
        assert_eq!(Strategy::select(3, &config), Strategy::CollaborativeFiltering);
    }

    #[test]
    fn test_no_ratings_no_recommendations() {
        let mut store = catalog();
        store.add_user("fresh", UserProfile::default());
        let recommender = Recommender::with_defaults(&store);
        assert!(recommender.recommend(&UserId::new("fresh"), 10).is_empty());
        assert!(recommender.recommend(&UserId::new("ghost"), 10).is_empty());
    }

    #[test]
    fn test_content_strategy_favors_liked_tag() {
        let mut store = catalog();
        let fan = UserId::new("fan");
        store.add_user(fan.clone(), UserProfile::default());
        store.record_review(&fan, 1u64, 9.0).unwrap();
        store.record_review(&fan, 4u64, 2.0).unwrap();

        let recommender = Recommender::with_defaults(&store);
        assert_eq!(recommender.strategy_for(&fan), Strategy::ContentFiltering);
        assert_eq!(
            recommender.best_liked_tags(&fan),
            vec![(TagName::new("Action"), 3.5)]
        );
        // (5 - 4) * 3.5 for Champloo beats (5 - 5) * 3.5 for Trigun
        assert_eq!(
            recommender.recommend(&fan, 10),
            vec![ItemId::new(3), ItemId::new(2)]
        );
    }

    #[test]
    fn test_popular_skips_rated() {
        let mut store = catalog();
        let fan = UserId::new("fan");
        store.add_user(fan.clone(), UserProfile::default());
        store.record_review(&fan, 4u64, 7.0).unwrap();

        let recommender = Recommender::with_defaults(&store);
        assert_eq!(
            recommender.recommend_popular(&fan, 2),
            vec![ItemId::new(5), ItemId::new(1)]
        );
        assert_eq!(
            recommender.recommend_popular(&UserId::new("ghost"), 2),
            vec![ItemId::new(4), ItemId::new(5)]
        );
    }
}
