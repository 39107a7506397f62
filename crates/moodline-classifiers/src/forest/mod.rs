//! Random forest sentiment classifier
//!
//! Adapts labeled text to the boolean-attribute samples consumed by the
//! [`id3`] forest builder and maps forest votes back to a `Sentiment`.

pub mod id3;

use crate::config::ForestConfig;
use crate::features::extract_features;
use crate::model::{self, best_sentiment, Model, ModelKind};
use id3::{FeatureSample, Forest};
use moodline_core::{Error, Result, Sample, Sentiment};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Random forest model over unigram (and optionally bigram) features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    /// Whether bigrams are used in addition to unigrams
    bigrams: bool,

    /// Training parameters
    #[serde(default)]
    config: ForestConfig,

    /// Learned forest, `None` until trained
    forest: Option<Forest>,
}

impl ForestModel {
    /// Create an untrained model with default training parameters
    pub fn new(bigrams: bool) -> Self {
        Self::with_config(bigrams, &ForestConfig::default())
    }

    /// Create an untrained model with the given training parameters
    pub fn with_config(bigrams: bool, config: &ForestConfig) -> Self {
        Self {
            bigrams,
            config: config.clone(),
            forest: None,
        }
    }

    /// Decode a model file holding a forest model
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let model: Self = model::decode(ModelKind::Forest, bytes)?;
        if let Some(forest) = &model.forest {
            forest.validate()?;
        }
        Ok(model)
    }

    /// Number of trees in the learned forest
    pub fn tree_count(&self) -> usize {
        self.forest.as_ref().map_or(0, Forest::len)
    }

    fn feature_sample(&self, sample: &Sample) -> FeatureSample {
        FeatureSample {
            features: extract_features(&sample.contents, self.bigrams),
            class: sample.sentiment,
        }
    }
}

impl Model for ForestModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Forest
    }

    fn uses_bigrams(&self) -> bool {
        self.bigrams
    }

    fn is_trained(&self) -> bool {
        self.forest.is_some()
    }

    fn classify(&self, text: &str) -> Result<Sentiment> {
        let forest = self.forest.as_ref().ok_or(Error::NotTrained)?;
        let distribution = forest.class_distribution(&extract_features(text, self.bigrams));

        let votes = Sentiment::CANONICAL_ORDER
            .iter()
            .map(|s| (*s, distribution.get(s).copied().unwrap_or(0.0)));
        best_sentiment(votes).ok_or(Error::NotTrained)
    }

    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(Error::invalid_input("cannot train on zero samples"));
        }

        info!("Creating samples...");
        let feature_samples: Vec<FeatureSample> =
            samples.iter().map(|s| self.feature_sample(s)).collect();
        let features: std::collections::BTreeSet<&str> = feature_samples
            .iter()
            .flat_map(|s| s.features.iter().map(String::as_str))
            .collect();
        info!(
            "Created {} samples with {} features",
            feature_samples.len(),
            features.len()
        );

        self.forest = Some(Forest::build(&feature_samples, &self.config)?);
        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        model::encode(ModelKind::Forest, self)
    }
}
