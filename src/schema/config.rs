//! Configuration types for a sketch run.

use serde::{Deserialize, Serialize};

fn default_evaluations() -> usize {
    100
}
fn default_max_figures() -> usize {
    10
}
fn default_neighborhood_size() -> usize {
    10
}
fn default_min_diameter() -> i32 {
    10
}

/// Top-level sketch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Objective evaluations the search may spend (each is a full render).
    #[serde(default = "default_evaluations")]
    pub evaluations: usize,
    /// Maximum number of figures in a freshly drawn solution.
    #[serde(default = "default_max_figures")]
    pub max_figures: usize,
    /// Unproductive neighbor steps tolerated before a random restart.
    #[serde(default = "default_neighborhood_size")]
    pub neighborhood_size: usize,
    /// Lower bound of the diameter draw for random circles.
    #[serde(default = "default_min_diameter")]
    pub min_diameter: i32,
    /// Search strategy.
    #[serde(default)]
    pub algorithm: SearchAlgorithm,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            evaluations: default_evaluations(),
            max_figures: default_max_figures(),
            neighborhood_size: default_neighborhood_size(),
            min_diameter: default_min_diameter(),
            algorithm: SearchAlgorithm::default(),
            random_seed: None,
        }
    }
}

/// Search algorithm selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchAlgorithm {
    /// Independent random draws; the baseline.
    RandomSearch,
    /// Hill climbing from one random starting solution.
    HillClimbing,
    /// Hill climbing that restarts once a neighborhood is exhausted.
    #[default]
    HillClimbingWithRestarts,
}

impl SketchConfig {
    /// Validate configuration parameters.
    ///
    /// Evaluation and neighborhood counts are not checked; the search
    /// engine accepts any value for them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_figures == 0 {
            return Err(ConfigError::InvalidMaxFigures);
        }
        if self.min_diameter < 1 {
            return Err(ConfigError::InvalidMinDiameter(self.min_diameter));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Maximum figure count must be non-zero")]
    InvalidMaxFigures,
    #[error("Minimum diameter must be at least 1, got {0}")]
    InvalidMinDiameter(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SketchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.evaluations, 100);
        assert_eq!(config.max_figures, 10);
        assert_eq!(config.algorithm, SearchAlgorithm::HillClimbingWithRestarts);
    }

    #[test]
    fn test_zero_figures_rejected() {
        let config = SketchConfig {
            max_figures: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxFigures)
        ));
    }

    #[test]
    fn test_tiny_budgets_accepted() {
        let config = SketchConfig {
            evaluations: 0,
            neighborhood_size: 0,
            max_figures: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SketchConfig =
            serde_json::from_str(r#"{"evaluations": 500, "algorithm": {"type": "HillClimbing"}}"#)
                .unwrap();
        assert_eq!(config.evaluations, 500);
        assert_eq!(config.max_figures, 10);
        assert_eq!(config.neighborhood_size, 10);
        assert_eq!(config.algorithm, SearchAlgorithm::HillClimbing);
        assert!(config.random_seed.is_none());
    }
}
