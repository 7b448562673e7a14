//! Tag vertex

use super::types::{ItemId, TagName, UserId};
use rustc_hash::{FxHashMap, FxHashSet};

/// A category label shared by many items
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: TagName,

    /// Items carrying this tag
    pub(crate) items: FxHashSet<ItemId>,

    /// User -> aggregated affinity (mirror of `User::tag_affinity`)
    pub(crate) users: FxHashMap<UserId, f64>,
}

impl Tag {
    pub fn new(name: TagName) -> Self {
        Tag {
            name,
            items: FxHashSet::default(),
            users: FxHashMap::default(),
        }
    }

    pub fn items(&self) -> &FxHashSet<ItemId> {
        &self.items
    }

    pub fn has_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn user_affinities(&self) -> &FxHashMap<UserId, f64> {
        &self.users
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
