//! Tripartite rating graph
//!
//! This module implements the entity store:
//! - Users with explicit item ratings and derived tag affinities
//! - Items with catalog metadata, tag memberships and mirrored ratings
//! - Tags with item memberships and mirrored user affinities
//! - Id-keyed arenas with a title index for name lookups

pub mod item;
pub mod store;
pub mod tag;
pub mod types;
pub mod user;

// Re-export main types
pub use item::{Item, ItemAttrs};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use tag::Tag;
pub use types::{EntityKey, ItemId, TagName, UserId};
pub use user::{User, UserProfile};
