//! Core identifier types for the rating graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn new(id: u64) -> Self {
        ItemId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        ItemId(id)
    }
}

/// Unique identifier for a user (the username)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

/// Tag (genre) name, e.g. "Action", "Slice of Life"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    pub fn new(name: impl Into<String>) -> Self {
        TagName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TagName {
    fn from(s: String) -> Self {
        TagName(s)
    }
}

impl From<&str> for TagName {
    fn from(s: &str) -> Self {
        TagName(s.to_string())
    }
}

/// Reference to any vertex of the tripartite graph.
///
/// Ordering is by kind first (users, items, tags) and then by identifier, so
/// neighbor listings keyed by `EntityKey` come out deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum EntityKey {
    User(UserId),
    Item(ItemId),
    Tag(TagName),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::User(id) => write!(f, "user:{}", id),
            EntityKey::Item(id) => write!(f, "item:{}", id.as_u64()),
            EntityKey::Tag(name) => write!(f, "tag:{}", name),
        }
    }
}

impl From<UserId> for EntityKey {
    fn from(id: UserId) -> Self {
        EntityKey::User(id)
    }
}

impl From<ItemId> for EntityKey {
    fn from(id: ItemId) -> Self {
        EntityKey::Item(id)
    }
}

impl From<TagName> for EntityKey {
    fn from(name: TagName) -> Self {
        EntityKey::Tag(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id() {
        let id = ItemId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "ItemId(42)");

        let id2: ItemId = 100.into();
        assert_eq!(id2.as_u64(), 100);
    }

    #[test]
    fn test_user_id() {
        let id = UserId::new("karthiga");
        assert_eq!(id.as_str(), "karthiga");
        assert_eq!(format!("{}", id), "karthiga");

        let id2: UserId = "skrn".into();
        assert!(id2 > id);
    }

    #[test]
    fn test_tag_name() {
        let tag = TagName::new("Slice of Life");
        assert_eq!(tag.as_str(), "Slice of Life");
        assert_eq!(format!("{}", tag), "Slice of Life");
    }

    #[test]
    fn test_entity_key_ordering() {
        let user = EntityKey::from(UserId::new("zed"));
        let item = EntityKey::from(ItemId::new(1));
        let tag = EntityKey::from(TagName::new("Action"));
        assert!(user < item);
        assert!(item < tag);
        assert_eq!(format!("{}", item), "item:1");
    }
}
