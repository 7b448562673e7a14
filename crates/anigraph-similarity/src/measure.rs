//! Closed set of user measures
//!
//! Callers select a measure by value; dispatch happens here, once, onto the
//! per-measure kernels in [`crate::distance`].

use super::common::CommonView;
use super::distance::{
    Affinity, Cosine, Euclidean, GraphJaccard, Jaccard, Manhattan, Minkowski, Orientation,
    PairMeasure,
};
use std::fmt;
use std::str::FromStr;

/// The user-to-user measures supported by the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Measure {
    Euclidean,
    Manhattan,
    /// Minkowski with p = 3
    Minkowski,
    Cosine,
    Jaccard,
    /// Rating-agreement affinity; the engine's default
    #[default]
    Affinity,
    GraphJaccard,
}

impl Measure {
    /// Every measure, in a stable order
    pub const ALL: [Measure; 7] = [
        Measure::Euclidean,
        Measure::Manhattan,
        Measure::Minkowski,
        Measure::Cosine,
        Measure::Jaccard,
        Measure::Affinity,
        Measure::GraphJaccard,
    ];

    /// Evaluate the measure on a common view.
    ///
    /// `midpoint` is the neutral point of the rating scale; only
    /// [`Measure::Affinity`] reads it.
    pub fn eval(self, view: &CommonView, midpoint: f64) -> f64 {
        match self {
            Measure::Euclidean => Euclidean.eval(view),
            Measure::Manhattan => Manhattan.eval(view),
            Measure::Minkowski => Minkowski::default().eval(view),
            Measure::Cosine => Cosine.eval(view),
            Measure::Jaccard => Jaccard.eval(view),
            Measure::Affinity => Affinity { midpoint }.eval(view),
            Measure::GraphJaccard => GraphJaccard.eval(view),
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Measure::Affinity | Measure::GraphJaccard => Orientation::Similarity,
            _ => Orientation::Distance,
        }
    }

    pub fn is_distance(self) -> bool {
        self.orientation() == Orientation::Distance
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Measure::Euclidean => "euclidean",
            Measure::Manhattan => "manhattan",
            Measure::Minkowski => "minkowski",
            Measure::Cosine => "cosine",
            Measure::Jaccard => "jaccard",
            Measure::Affinity => "affinity",
            Measure::GraphJaccard => "graph_jaccard",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown measure name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMeasure(pub String);

impl fmt::Display for UnknownMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown similarity measure: {}", self.0)
    }
}

impl std::error::Error for UnknownMeasure {}

impl FromStr for Measure {
    type Err = UnknownMeasure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Measure::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| UnknownMeasure(s.to_string()))
    }
}
