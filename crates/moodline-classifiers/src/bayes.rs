//! Naive Bayes sentiment classifier
//!
//! Learns, for every sentiment, how likely each feature is to be present in a
//! text of that sentiment, and classifies by maximum a-posteriori estimation
//! in log space.
//!
//! Counts are smoothed with the Bernoulli form of additive smoothing:
//!
//! ```text
//! P(f | s) = (count(s, f) + α) / (count(s) + 2α)
//! P(f)     = (count(f) + α)    / (N + 2α)
//! ```
//!
//! so that both `P(f | s)` and `1 - P(f | s)` are strictly inside (0, 1) for
//! every known feature, including features a sentiment never co-occurred with.

use crate::config::BayesConfig;
use crate::features::{extract_features, FeatureSet};
use crate::model::{self, best_sentiment, Model, ModelKind};
use moodline_core::{Error, Result, Sample, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Tolerance used when checking that priors of a loaded model sum to 1
const PRIOR_SUM_TOLERANCE: f64 = 1e-6;

/// Naive Bayes model over feature presence/absence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bayes {
    /// Whether bigrams are used in addition to unigrams
    bigrams: bool,

    /// Additive smoothing constant
    smoothing: f64,

    /// Minimum number of samples a feature must appear in
    min_feature_count: usize,

    /// P(s) for every sentiment
    sentiment_prior: BTreeMap<Sentiment, f64>,

    /// P(f) for every known feature
    feature_marginal: BTreeMap<String, f64>,

    /// P(f | s) for every sentiment and every known feature
    feature_conditional: BTreeMap<Sentiment, BTreeMap<String, f64>>,
}

impl Bayes {
    /// Create an untrained model with default training parameters
    pub fn new(bigrams: bool) -> Self {
        Self::with_config(bigrams, &BayesConfig::default())
    }

    /// Create an untrained model with the given training parameters
    pub fn with_config(bigrams: bool, config: &BayesConfig) -> Self {
        Self {
            bigrams,
            smoothing: config.smoothing,
            min_feature_count: config.min_feature_count,
            sentiment_prior: BTreeMap::new(),
            feature_marginal: BTreeMap::new(),
            feature_conditional: BTreeMap::new(),
        }
    }

    /// Decode a model file holding a Bayes model
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let bayes: Self = model::decode(ModelKind::Bayes, bytes)?;
        bayes.validate()?;
        Ok(bayes)
    }

    /// Unconditional probability of each sentiment
    pub fn sentiment_prior(&self) -> &BTreeMap<Sentiment, f64> {
        &self.sentiment_prior
    }

    /// Unconditional probability of each known feature
    pub fn feature_marginal(&self) -> &BTreeMap<String, f64> {
        &self.feature_marginal
    }

    /// Probability of each known feature given a sentiment
    pub fn feature_conditional(&self) -> &BTreeMap<Sentiment, BTreeMap<String, f64>> {
        &self.feature_conditional
    }

    /// Number of features kept after pruning
    pub fn feature_count(&self) -> usize {
        self.feature_marginal.len()
    }

    /// Log-space score of every candidate sentiment, in canonical order.
    ///
    /// Sentiments with a zero prior are not candidates and are omitted.
    pub fn scores(&self, text: &str) -> Result<Vec<(Sentiment, f64)>> {
        if !self.is_trained() {
            return Err(Error::NotTrained);
        }

        let features = extract_features(text, self.bigrams);

        let scores = Sentiment::CANONICAL_ORDER
            .iter()
            .filter_map(|&sentiment| {
                let prior = self.sentiment_prior.get(&sentiment).copied().unwrap_or(0.0);
                if prior <= 0.0 {
                    return None;
                }
                Some((sentiment, self.log_score(sentiment, prior, &features)))
            })
            .collect();

        Ok(scores)
    }

    fn log_score(&self, sentiment: Sentiment, prior: f64, features: &FeatureSet) -> f64 {
        let Some(conditional) = self.feature_conditional.get(&sentiment) else {
            return prior.ln();
        };

        let mut log_prob = 0.0;
        let mut terms = 0;
        for (feature, &cond) in conditional {
            let Some(&marginal) = self.feature_marginal.get(feature) else {
                continue;
            };

            let estimate = if features.contains(feature) {
                cond / marginal
            } else {
                (1.0 - cond) / (1.0 - marginal)
            };
            let prob = estimate * prior;
            debug_assert!(prob > 0.0, "non-positive probability for feature {feature:?}");

            log_prob += prob.ln();
            terms += 1;
        }

        // Every feature was pruned away: only the prior is left to go on.
        if terms == 0 {
            return prior.ln();
        }
        log_prob
    }

    /// Check that loaded statistics are usable for classification
    fn validate(&self) -> Result<()> {
        if !(self.smoothing > 0.0 && self.smoothing.is_finite()) {
            return Err(Error::invalid_input(format!(
                "invalid smoothing constant {}",
                self.smoothing
            )));
        }

        if !self.sentiment_prior.is_empty() {
            if self
                .sentiment_prior
                .values()
                .any(|p| !(0.0..=1.0).contains(p))
            {
                return Err(Error::invalid_input("sentiment prior outside [0, 1]"));
            }
            let sum: f64 = self.sentiment_prior.values().sum();
            if (sum - 1.0).abs() > PRIOR_SUM_TOLERANCE {
                return Err(Error::invalid_input(format!(
                    "sentiment priors sum to {sum}, expected 1"
                )));
            }
        }

        let open_unit = |p: &f64| *p > 0.0 && *p < 1.0;
        if !self.feature_marginal.values().all(open_unit) {
            return Err(Error::invalid_input("feature marginal outside (0, 1)"));
        }
        if !self
            .feature_conditional
            .values()
            .flat_map(|table| table.values())
            .all(open_unit)
        {
            return Err(Error::invalid_input("feature conditional outside (0, 1)"));
        }

        Ok(())
    }
}

impl Model for Bayes {
    fn kind(&self) -> ModelKind {
        ModelKind::Bayes
    }

    fn uses_bigrams(&self) -> bool {
        self.bigrams
    }

    fn is_trained(&self) -> bool {
        !self.sentiment_prior.is_empty()
    }

    fn classify(&self, text: &str) -> Result<Sentiment> {
        let scores = self.scores(text)?;
        best_sentiment(scores).ok_or(Error::NotTrained)
    }

    fn train(&mut self, samples: &[Sample]) -> Result<()> {
        if samples.is_empty() {
            return Err(Error::invalid_input("cannot train on zero samples"));
        }
        if !(self.smoothing > 0.0 && self.smoothing.is_finite()) {
            return Err(Error::invalid_input(format!(
                "smoothing must be a positive number, got {}",
                self.smoothing
            )));
        }

        info!("Counting features in {} samples...", samples.len());
        let mut sentiment_counts: BTreeMap<Sentiment, usize> = BTreeMap::new();
        let mut feature_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut joint_counts: BTreeMap<Sentiment, BTreeMap<String, usize>> = BTreeMap::new();

        for sample in samples {
            *sentiment_counts.entry(sample.sentiment).or_insert(0) += 1;
            let joint = joint_counts.entry(sample.sentiment).or_default();
            for feature in extract_features(&sample.contents, self.bigrams) {
                *joint.entry(feature.clone()).or_insert(0) += 1;
                *feature_counts.entry(feature).or_insert(0) += 1;
            }
        }

        info!("Pruning features...");
        let seen = feature_counts.len();
        feature_counts.retain(|_, count| *count >= self.min_feature_count);
        debug!(
            "Dropped {} of {} features seen in fewer than {} samples",
            seen - feature_counts.len(),
            seen,
            self.min_feature_count
        );

        info!("Normalizing {} features...", feature_counts.len());
        let alpha = self.smoothing;
        let total = samples.len() as f64;

        let feature_marginal = feature_counts
            .iter()
            .map(|(feature, &count)| {
                (feature.clone(), (count as f64 + alpha) / (total + 2.0 * alpha))
            })
            .collect();

        let feature_conditional = Sentiment::CANONICAL_ORDER
            .iter()
            .map(|&sentiment| {
                let in_class = sentiment_counts.get(&sentiment).copied().unwrap_or(0) as f64;
                let joint = joint_counts.get(&sentiment);
                let table = feature_counts
                    .keys()
                    .map(|feature| {
                        let count = joint
                            .and_then(|j| j.get(feature))
                            .copied()
                            .unwrap_or(0) as f64;
                        (feature.clone(), (count + alpha) / (in_class + 2.0 * alpha))
                    })
                    .collect();
                (sentiment, table)
            })
            .collect();

        let sentiment_prior = Sentiment::CANONICAL_ORDER
            .iter()
            .map(|&sentiment| {
                let count = sentiment_counts.get(&sentiment).copied().unwrap_or(0) as f64;
                (sentiment, count / total)
            })
            .collect();

        self.sentiment_prior = sentiment_prior;
        self.feature_marginal = feature_marginal;
        self.feature_conditional = feature_conditional;

        Ok(())
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        model::encode(ModelKind::Bayes, self)
    }
}
