//! Engine configuration
//!
//! All tunables of the recommendation policy live here instead of being
//! scattered as literals: the rating scale (and therefore the midpoint),
//! the favorite threshold, neighbor pool size, how many tags feed content
//! filtering and when collaborative filtering takes over.

use crate::similarity::Measure;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Closed numeric rating scale, e.g. 1–10
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f64,
    pub max: f64,
}

impl RatingScale {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Neutral point of the scale (5.5 on 1–10)
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, score: f64) -> bool {
        score.is_finite() && score >= self.min && score <= self.max
    }

    /// Signed affinity contribution of a rating
    pub fn deviation(&self, score: f64) -> f64 {
        score - self.midpoint()
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

/// Recommendation engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rating scale used to validate reviews and derive the midpoint
    pub scale: RatingScale,
    /// Minimum rating counted as a favorite by collaborative filtering
    pub favorite_threshold: f64,
    /// Users with at least this many ratings get collaborative filtering;
    /// fewer (but more than zero) fall back to content filtering
    pub collaborative_min_ratings: usize,
    /// Number of most similar users consulted by collaborative filtering
    pub neighbor_pool: usize,
    /// Number of best-liked tags consulted by content filtering
    pub content_tag_count: usize,
    /// Measure used by the orchestrator for collaborative filtering
    pub default_measure: Measure,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scale: RatingScale::default(),
            favorite_threshold: 8.0,
            collaborative_min_ratings: 3,
            neighbor_pool: 50,
            content_tag_count: 5,
            default_measure: Measure::Affinity,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        info!("Loaded engine configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let scale = self.scale;
        if !scale.min.is_finite() || !scale.max.is_finite() || scale.min >= scale.max {
            return Err(ConfigError::Invalid(format!(
                "rating scale must satisfy min < max, got [{}, {}]",
                scale.min, scale.max
            )));
        }
        if !scale.contains(self.favorite_threshold) {
            return Err(ConfigError::Invalid(format!(
                "favorite threshold {} lies outside the rating scale",
                self.favorite_threshold
            )));
        }
        if self.collaborative_min_ratings == 0 {
            return Err(ConfigError::Invalid(
                "collaborative_min_ratings must be at least 1".to_string(),
            ));
        }
        if self.neighbor_pool == 0 {
            return Err(ConfigError::Invalid("neighbor_pool must be at least 1".to_string()));
        }
        if self.content_tag_count == 0 {
            return Err(ConfigError::Invalid(
                "content_tag_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let scale = RatingScale::default();
        assert_eq!(scale.midpoint(), 5.5);
        assert_eq!(scale.deviation(9.0), 3.5);
        assert!(scale.contains(1.0));
        assert!(scale.contains(10.0));
        assert!(!scale.contains(0.5));
        assert!(!scale.contains(f64::NAN));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.neighbor_pool, 50);
        assert_eq!(config.default_measure, Measure::Affinity);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = EngineConfig::from_yaml_str(
            "neighbor_pool: 100\ndefault_measure: graph_jaccard\n",
        )
        .unwrap();
        assert_eq!(config.neighbor_pool, 100);
        assert_eq!(config.default_measure, Measure::GraphJaccard);
        assert_eq!(config.favorite_threshold, 8.0);
        assert_eq!(config.scale, RatingScale::default());
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let result = EngineConfig::from_yaml_str("scale:\n  min: 10\n  max: 1\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = EngineConfig::from_yaml_str("neighbor_pool: [oops");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
