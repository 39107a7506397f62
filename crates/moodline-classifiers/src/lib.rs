//! Moodline Classifiers
//!
//! Sentiment classification of short informal text.
//!
//! Text goes through a fixed pipeline:
//! - `normalize`: lowercasing, placeholder substitution for mentions and
//!   URLs, collapsing of long character runs
//! - `features`: unigram (and optionally bigram) feature sets
//! - a [`Model`]: naive Bayes over feature presence or a random forest
//!   of ID3 trees
//!
//! Models are created by name from the [`registry`] and persisted as tagged
//! JSON model files.

pub mod batch;
pub mod bayes;
pub mod config;
pub mod features;
pub mod forest;
pub mod model;
pub mod normalize;
pub mod registry;

pub use batch::{classify_all, evaluate, Evaluation};
pub use bayes::Bayes;
pub use config::{BayesConfig, ClassifierConfig, ForestConfig};
pub use features::{extract_features, FeatureSet};
pub use forest::ForestModel;
pub use model::{Model, ModelKind};
pub use normalize::normalize;
pub use registry::{ModelSpec, MODELS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bayes::Bayes;
    pub use crate::config::ClassifierConfig;
    pub use crate::forest::ForestModel;
    pub use crate::model::{Model, ModelKind};
    pub use crate::registry;
    pub use moodline_core::{Error, Result, Sample, Sentiment};
}
