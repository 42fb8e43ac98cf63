use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::operations::clustering::{ClusterParams, DEFAULT_ITERATIONS, DEFAULT_SEED};
use crate::regions::RegionLabels;

/// Startup configuration of a [`Session`](super::Session).
///
/// The number of regions `K` is the number of labels. Missing fields of a
/// configuration document take their defaults:
///
/// ```json
/// { "labels": ["Heel", "Arch", "Toes"], "iterations": 30, "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Region names in region order.
    pub labels: RegionLabels,
    /// Fixed clustering iteration budget.
    pub iterations: usize,
    /// Clustering seed.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            labels: RegionLabels::foot(),
            iterations: DEFAULT_ITERATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Parse`] for malformed JSON, or any
    /// error from [`SessionConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the region labels.
    #[must_use]
    pub fn with_labels(mut self, labels: RegionLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the clustering iteration budget.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the clustering seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the configuration independently of any model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::NoLabels`] for an empty label list and
    /// [`ConfigurationError::ZeroIterations`] for a zero iteration budget.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.labels.is_empty() {
            return Err(ConfigurationError::NoLabels);
        }
        if self.iterations == 0 {
            return Err(ConfigurationError::ZeroIterations);
        }
        Ok(())
    }

    /// Clustering parameters with one region per label.
    #[must_use]
    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            region_count: self.labels.len(),
            iterations: self.iterations,
            seed: self.seed,
        }
    }
}
