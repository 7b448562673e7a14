//! Offline hit-count evaluation
//!
//! For every held-out user the evaluator asks each strategy for twice as many
//! recommendations as the user has liked items, then counts how many of the
//! liked items appear in the result. The graph passed in should not contain
//! the held-out ratings themselves.

use super::Recommender;
use crate::graph::{ItemId, UserId};
use crate::similarity::Measure;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Items a user is known to like, withheld from the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldOut {
    pub user: UserId,
    pub liked: Vec<ItemId>,
}

impl HeldOut {
    pub fn new(user: impl Into<UserId>, liked: Vec<ItemId>) -> Self {
        Self {
            user: user.into(),
            liked,
        }
    }
}

/// A strategy under evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluatedStrategy {
    Collaborative(Measure),
    Content,
    Prediction,
    Popular,
}

impl EvaluatedStrategy {
    /// Collaborative filtering under every measure, then the other strategies
    pub fn standard_suite() -> Vec<Self> {
        Measure::ALL
            .iter()
            .map(|&measure| EvaluatedStrategy::Collaborative(measure))
            .chain([
                EvaluatedStrategy::Content,
                EvaluatedStrategy::Prediction,
                EvaluatedStrategy::Popular,
            ])
            .collect()
    }

    fn run(self, recommender: &Recommender<'_>, user: &UserId, limit: usize) -> Vec<ItemId> {
        match self {
            EvaluatedStrategy::Collaborative(measure) => {
                recommender.recommend_by_users(user, limit, measure)
            }
            EvaluatedStrategy::Content => recommender.recommend_by_tags(user, limit),
            EvaluatedStrategy::Prediction => recommender.recommend_by_score_prediction(user, limit),
            EvaluatedStrategy::Popular => recommender.recommend_popular(user, limit),
        }
    }
}

impl fmt::Display for EvaluatedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatedStrategy::Collaborative(measure) => write!(f, "collaborative/{}", measure),
            EvaluatedStrategy::Content => write!(f, "content"),
            EvaluatedStrategy::Prediction => write!(f, "prediction"),
            EvaluatedStrategy::Popular => write!(f, "popular"),
        }
    }
}

/// Outcome of one strategy over all held-out users
#[derive(Debug, Clone)]
pub struct StrategyScore {
    pub strategy: EvaluatedStrategy,
    /// Liked items found among the recommendations
    pub hits: usize,
    /// Liked items across all evaluated users
    pub liked: usize,
    /// Recommendations requested across all evaluated users
    pub requested: usize,
    pub elapsed: Duration,
}

impl StrategyScore {
    /// Fraction of liked items recovered
    pub fn recall(&self) -> f64 {
        if self.liked == 0 {
            0.0
        } else {
            self.hits as f64 / self.liked as f64
        }
    }
}

/// Per-strategy results of an evaluation run
#[derive(Debug, Clone, Default)]
pub struct EvaluationReport {
    /// Held-out users evaluated
    pub users: usize,
    pub scores: Vec<StrategyScore>,
}

impl EvaluationReport {
    pub fn score_for(&self, strategy: EvaluatedStrategy) -> Option<&StrategyScore> {
        self.scores.iter().find(|s| s.strategy == strategy)
    }

    /// Strategy with the most hits; the earliest wins a tie
    pub fn best(&self) -> Option<&StrategyScore> {
        self.scores
            .iter()
            .reduce(|best, s| if s.hits > best.hits { s } else { best })
    }
}

/// Evaluate `strategies` against `held_out`
///
/// Users with an empty liked list are skipped.
pub fn evaluate(
    recommender: &Recommender<'_>,
    held_out: &[HeldOut],
    strategies: &[EvaluatedStrategy],
) -> EvaluationReport {
    let cases: Vec<&HeldOut> = held_out.iter().filter(|h| !h.liked.is_empty()).collect();
    let mut report = EvaluationReport {
        users: cases.len(),
        scores: Vec::with_capacity(strategies.len()),
    };

    for &strategy in strategies {
        let start = Instant::now();
        let mut hits = 0;
        let mut liked = 0;
        let mut requested = 0;

        for case in &cases {
            let limit = case.liked.len() * 2;
            let recommended: FxHashSet<ItemId> =
                strategy.run(recommender, &case.user, limit).into_iter().collect();
            hits += case.liked.iter().filter(|id| recommended.contains(*id)).count();
            liked += case.liked.len();
            requested += limit;
        }

        let elapsed = start.elapsed();
        info!(
            "Evaluated {}: {} hits of {} liked items in {:?}",
            strategy, hits, liked, elapsed
        );
        report.scores.push(StrategyScore {
            strategy,
            hits,
            liked,
            requested,
            elapsed,
        });
    }

    report
}
