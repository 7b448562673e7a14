//! Item vertex
//!
//! Items carry the catalog metadata used by the popularity and release-date
//! listings, an unweighted membership set to tags, and the mirror of every
//! user rating they received.

use super::types::{ItemId, TagName, UserId};
use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Descriptive attributes of a catalog item
///
/// Ranks follow the catalog convention: 1 is the best, so a *lower*
/// popularity rank means a *more* popular item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemAttrs {
    pub title: String,
    pub synopsis: String,
    pub release_date: Option<NaiveDate>,
    pub episode_count: u32,
    pub popularity_rank: Option<u32>,
    pub score_rank: Option<u32>,
    pub mean_score: Option<f64>,
    pub cover_url: String,
}

impl ItemAttrs {
    /// Attributes with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn with_episodes(mut self, episode_count: u32) -> Self {
        self.episode_count = episode_count;
        self
    }

    pub fn with_popularity(mut self, rank: u32) -> Self {
        self.popularity_rank = Some(rank);
        self
    }

    pub fn with_score_rank(mut self, rank: u32) -> Self {
        self.score_rank = Some(rank);
        self
    }

    pub fn with_mean_score(mut self, score: f64) -> Self {
        self.mean_score = Some(score);
        self
    }

    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = url.into();
        self
    }
}

/// A catalog item
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub attrs: ItemAttrs,

    /// Tags this item belongs to
    pub(crate) tags: FxHashSet<TagName>,

    /// User -> rating (mirror of `User::ratings`)
    pub(crate) raters: FxHashMap<UserId, f64>,
}

impl Item {
    pub fn new(id: ItemId, attrs: ItemAttrs) -> Self {
        Item {
            id,
            attrs,
            tags: FxHashSet::default(),
            raters: FxHashMap::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.attrs.title
    }

    pub fn tags(&self) -> &FxHashSet<TagName> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &TagName) -> bool {
        self.tags.contains(tag)
    }

    /// Tag names in ascending order
    pub fn sorted_tags(&self) -> Vec<&TagName> {
        let mut tags: Vec<&TagName> = self.tags.iter().collect();
        tags.sort();
        tags
    }

    pub fn raters(&self) -> &FxHashMap<UserId, f64> {
        &self.raters
    }

    pub fn rating_by(&self, user: &UserId) -> Option<f64> {
        self.raters.get(user).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attrs_builder() {
        let attrs = ItemAttrs::new("Cowboy Bebop")
            .with_episodes(26)
            .with_popularity(39)
            .with_score_rank(28)
            .with_mean_score(8.81)
            .with_release_date(NaiveDate::from_ymd_opt(1998, 4, 3).unwrap())
            .with_synopsis("Bounty hunters adrift in 2071.")
            .with_cover_url("https://example.org/bebop.jpg");

        assert_eq!(attrs.title, "Cowboy Bebop");
        assert_eq!(attrs.episode_count, 26);
        assert_eq!(attrs.popularity_rank, Some(39));
        assert_eq!(attrs.score_rank, Some(28));
        assert_eq!(attrs.mean_score, Some(8.81));
        assert_eq!(attrs.synopsis, "Bounty hunters adrift in 2071.");
        assert_eq!(attrs.cover_url, "https://example.org/bebop.jpg");
    }

    #[test]
    fn test_sorted_tags() {
        let mut item = Item::new(ItemId::new(1), ItemAttrs::new("Trigun"));
        item.tags.insert(TagName::new("Sci-Fi"));
        item.tags.insert(TagName::new("Action"));
        let tags: Vec<&str> = item.sorted_tags().iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["Action", "Sci-Fi"]);
    }
}
