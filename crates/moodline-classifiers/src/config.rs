//! Configuration for classifier training and batch classification

use moodline_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable overriding `forest.subsample`
pub const FOREST_SUBSAMPLE_ENV: &str = "MOODLINE_FOREST_SUBSAMPLE";

/// Deepest decision tree that may be grown; trees are grown recursively
pub const MAX_TREE_DEPTH: usize = 512;

/// Configuration for all classifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Naive Bayes training parameters
    #[serde(default)]
    pub bayes: BayesConfig,

    /// Random forest training parameters
    #[serde(default)]
    pub forest: ForestConfig,

    /// Worker threads for batch classification (defaults to the CPU count)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Naive Bayes training parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BayesConfig {
    /// Additive smoothing constant (1.0 is Laplace smoothing)
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Features seen in fewer samples than this are dropped (0 or 1 disables pruning)
    #[serde(default = "default_min_feature_count")]
    pub min_feature_count: usize,
}

impl Default for BayesConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
            min_feature_count: default_min_feature_count(),
        }
    }
}

/// Random forest training parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    #[serde(default = "default_trees")]
    pub trees: usize,

    /// Bootstrap sample size per tree (defaults to half the corpus)
    #[serde(default)]
    pub subsample: Option<usize>,

    /// Maximum tree depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Random seed for bootstrap sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: default_trees(),
            subsample: None,
            max_depth: default_max_depth(),
            seed: default_seed(),
        }
    }
}

impl ForestConfig {
    /// Bootstrap sample size for a corpus of `total` samples
    pub fn subsample_for(&self, total: usize) -> usize {
        self.subsample.unwrap_or(total / 2).max(1)
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, falling back to defaults when it does not
    /// exist, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                info!("Loading classifier config from {}", path.display());
                Self::from_file(path)?
            }
            Some(path) => {
                debug!("Config {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup(FOREST_SUBSAMPLE_ENV) {
            let count = value.trim().parse::<usize>().map_err(|_| {
                Error::config(format!("Invalid {FOREST_SUBSAMPLE_ENV}: {value}"))
            })?;
            debug!("Forest subsample overridden to {}", count);
            self.forest.subsample = Some(count);
        }
        Ok(())
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.bayes.smoothing > 0.0 && self.bayes.smoothing.is_finite()) {
            return Err(Error::config(format!(
                "bayes.smoothing must be a positive number, got {}",
                self.bayes.smoothing
            )));
        }
        if self.forest.trees == 0 {
            return Err(Error::config("forest.trees must be at least 1"));
        }
        if self.forest.max_depth == 0 || self.forest.max_depth > MAX_TREE_DEPTH {
            return Err(Error::config(format!(
                "forest.max_depth must be between 1 and {MAX_TREE_DEPTH}, got {}",
                self.forest.max_depth
            )));
        }
        if self.forest.subsample == Some(0) {
            return Err(Error::config("forest.subsample must be at least 1"));
        }
        if self.workers == Some(0) {
            return Err(Error::config("workers must be at least 1"));
        }
        Ok(())
    }

    /// Number of batch classification workers
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}

fn default_smoothing() -> f64 {
    1.0
}

fn default_min_feature_count() -> usize {
    2
}

fn default_trees() -> usize {
    100
}

fn default_max_depth() -> usize {
    32
}

fn default_seed() -> u64 {
    42
}
