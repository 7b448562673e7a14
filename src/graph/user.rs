//! User vertex
//!
//! A user owns two weighted adjacencies: explicit ratings of items and the
//! derived affinity towards tags. The tag side is maintained by the store
//! and never written directly.

use super::types::{ItemId, TagName, UserId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Optional demographic attributes supplied at registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl UserProfile {
    pub fn new(gender: Option<String>, birth_year: Option<i32>) -> Self {
        Self { gender, birth_year }
    }
}

/// A user of the catalog
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub profile: UserProfile,

    /// Item -> rating (mirror of `Item::raters`)
    pub(crate) ratings: FxHashMap<ItemId, f64>,

    /// Tag -> aggregated deviation from the scale midpoint
    pub(crate) tag_affinity: FxHashMap<TagName, f64>,
}

impl User {
    pub fn new(id: UserId, profile: UserProfile) -> Self {
        User {
            id,
            profile,
            ratings: FxHashMap::default(),
            tag_affinity: FxHashMap::default(),
        }
    }

    pub fn ratings(&self) -> &FxHashMap<ItemId, f64> {
        &self.ratings
    }

    pub fn rating_for(&self, item: ItemId) -> Option<f64> {
        self.ratings.get(&item).copied()
    }

    pub fn has_rated(&self, item: ItemId) -> bool {
        self.ratings.contains_key(&item)
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    pub fn tag_affinities(&self) -> &FxHashMap<TagName, f64> {
        &self.tag_affinity
    }

    pub fn tag_affinity(&self, tag: &TagName) -> Option<f64> {
        self.tag_affinity.get(tag).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_empty() {
        let user = User::new(
            UserId::new("skrn"),
            UserProfile::new(Some("Male".to_string()), Some(1990)),
        );
        assert_eq!(user.rating_count(), 0);
        assert!(user.tag_affinities().is_empty());
        assert_eq!(user.profile.birth_year, Some(1990));
        assert_eq!(user.rating_for(ItemId::new(1)), None);
    }
}
