//! JSON dataset loading
//!
//! A dataset document lists users, items (with their tags), reviews and,
//! optionally, held-out liked lists for evaluation. Loading replays every
//! record through the graph's ingestion API; records the graph rejects are
//! logged and counted, not fatal.

use anigraph::{HeldOut, ItemAttrs, ItemId, SharedGraph, UserId, UserProfile};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Score recorded for a favorite listed without an explicit review
pub const FAVORITE_SCORE: f64 = 9.0;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<UserRecord>,
    pub items: Vec<ItemRecord>,
    pub reviews: Vec<ReviewRecord>,
    pub held_out: Vec<HeldOut>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Items the user marked as favorite
    #[serde(default)]
    pub favorites: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: u64,
    #[serde(flatten)]
    pub attrs: ItemAttrs,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub user: String,
    pub item: u64,
    pub score: f64,
}

/// Counts of records applied and rejected during a load
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct LoadSummary {
    pub users: usize,
    pub items: usize,
    pub tag_links: usize,
    pub reviews: usize,
    pub rejected: usize,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("malformed dataset document")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Replay every record into `graph`
    ///
    /// Order: users, items, tag links, reviews, then favorites that were
    /// not already reviewed.
    pub fn replay(&self, graph: &SharedGraph) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for user in &self.users {
            if graph.add_user(user.id.as_str(), user.profile.clone()) {
                summary.users += 1;
            }
        }

        for item in &self.items {
            match graph.add_item(item.id, item.attrs.clone()) {
                Ok(true) => summary.items += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Skipping item {}: {}", item.id, e);
                    summary.rejected += 1;
                    continue;
                }
            }
            for tag in &item.tags {
                match graph.link_item_tag(item.id, tag.as_str()) {
                    Ok(true) => summary.tag_links += 1,
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Skipping tag {} on item {}: {}", tag, item.id, e);
                        summary.rejected += 1;
                    }
                }
            }
        }

        for review in &self.reviews {
            let user = UserId::new(review.user.as_str());
            self.apply_review(graph, &user, review.item, review.score, &mut summary);
        }

        for user in &self.users {
            let user_id = UserId::new(user.id.as_str());
            for &item in &user.favorites {
                let already_rated =
                    graph.with_store(|store| store.rating(&user_id, ItemId::new(item)).is_some());
                if !already_rated {
                    self.apply_review(graph, &user_id, item, FAVORITE_SCORE, &mut summary);
                }
            }
        }

        info!(
            "Loaded {} users, {} items, {} tag links, {} reviews ({} rejected)",
            summary.users, summary.items, summary.tag_links, summary.reviews, summary.rejected
        );
        summary
    }

    fn apply_review(
        &self,
        graph: &SharedGraph,
        user: &UserId,
        item: u64,
        score: f64,
        summary: &mut LoadSummary,
    ) {
        match graph.record_review(user, item, score) {
            Ok(_) => summary.reviews += 1,
            Err(e) => {
                warn!("Skipping review of {} by {}: {}", item, user, e);
                summary.rejected += 1;
            }
        }
    }
}

/// Load a dataset file into a fresh graph
pub fn load(path: &Path, graph: &SharedGraph) -> Result<(Dataset, LoadSummary)> {
    let dataset = Dataset::from_file(path)?;
    let summary = dataset.replay(graph);
    Ok((dataset, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anigraph::EngineConfig;

    const SAMPLE: &str = r#"{
        "users": [
            {"id": "spike", "gender": "Male", "favorites": [2]},
            {"id": "faye"}
        ],
        "items": [
            {"id": 1, "title": "Cowboy Bebop", "popularity_rank": 2,
             "release_date": "1998-04-03", "tags": ["Action", "Sci-Fi"]},
            {"id": 2, "title": "Trigun", "popularity_rank": 1, "tags": ["Action"]},
            {"id": 3, "title": "Cowboy Bebop"}
        ],
        "reviews": [
            {"user": "spike", "item": 1, "score": 10},
            {"user": "faye", "item": 1, "score": 42},
            {"user": "jet", "item": 2, "score": 7}
        ],
        "held_out": [{"user": "faye", "liked": [2]}]
    }"#;

    #[test]
    fn test_replay_counts_and_rejections() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let graph = SharedGraph::new(EngineConfig::default());
        let summary = dataset.replay(&graph);

        assert_eq!(summary.users, 2);
        assert_eq!(summary.items, 2);
        assert_eq!(summary.tag_links, 3);
        // spike's review plus spike's favorite
        assert_eq!(summary.reviews, 2);
        // duplicate title, out-of-range score, unknown user
        assert_eq!(summary.rejected, 3);

        let spike = UserId::new("spike");
        assert_eq!(
            graph.with_store(|s| s.rating(&spike, ItemId::new(2))),
            Some(FAVORITE_SCORE)
        );
        assert_eq!(dataset.held_out[0].liked, vec![ItemId::new(2)]);
    }

    #[test]
    fn test_untitled_items_load() {
        let json = r#"{"items": [{"id": 1}, {"id": 2, "tags": ["Drama"]}]}"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        let graph = SharedGraph::new(EngineConfig::default());
        let summary = dataset.replay(&graph);

        assert_eq!(summary.items, 2);
        assert_eq!(summary.tag_links, 1);
        assert_eq!(summary.rejected, 0);
    }
}
