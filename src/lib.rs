//! anigraph
//!
//! An in-memory recommendation engine for an anime catalog, built on a
//! weighted tripartite graph of users, items and tags.
//!
//! # Architecture
//!
//! - [`graph`]: the entity store. User–Item edges carry ratings; Item–Tag
//!   edges are plain memberships; User–Tag edges are aggregates derived from
//!   the other two and kept consistent on every write.
//! - [`similarity`]: pairwise user measures (from `anigraph-similarity`)
//!   and neighbor ranking over the store.
//! - [`recommend`]: content filtering, collaborative filtering and score
//!   prediction, the orchestrating [`Recommender`], and an offline
//!   evaluation harness.
//! - [`service`]: a cloneable, lock-protected handle for concurrent readers.
//! - [`config`]: engine tuning, loadable from YAML.
//!
//! ## Example Usage
//!
//! ```rust
//! use anigraph::graph::{GraphStore, ItemAttrs, UserId, UserProfile};
//! use anigraph::Recommender;
//!
//! let mut store = GraphStore::new();
//! store.add_item(1u64, ItemAttrs::new("Cowboy Bebop").with_popularity(2)).unwrap();
//! store.add_item(2u64, ItemAttrs::new("Trigun").with_popularity(1)).unwrap();
//! store.link_item_tag(1u64, "Action").unwrap();
//! store.link_item_tag(2u64, "Action").unwrap();
//!
//! let spike = UserId::new("spike");
//! store.add_user(spike.clone(), UserProfile::default());
//! store.record_review(&spike, 1u64, 9.0).unwrap();
//!
//! let recommender = Recommender::with_defaults(&store);
//! let picks = recommender.recommend(&spike, 5);
//! assert_eq!(picks.len(), 1);
//! assert_eq!(picks[0].as_u64(), 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;
pub mod rank;
pub mod recommend;
pub mod service;
pub mod similarity;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, EngineConfig, RatingScale};

pub use graph::{
    EntityKey, GraphError, GraphResult, GraphStatistics, GraphStore, Item, ItemAttrs, ItemId,
    Tag, TagName, User, UserId, UserProfile,
};

pub use recommend::{
    EvaluatedStrategy, EvaluationReport, HeldOut, Recommender, Strategy, StrategyScore,
};

pub use service::SharedGraph;

pub use similarity::{most_similar_users, Measure};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
