//! Named model registry and model file persistence
//!
//! Every available model configuration is listed in [`MODELS`]. Model files
//! are dispatched back to the right implementation by the kind recorded in
//! their header.

use crate::bayes::Bayes;
use crate::config::ClassifierConfig;
use crate::forest::ForestModel;
use crate::model::{decode_header, Model, ModelKind};
use moodline_core::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A named, constructible model configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Registry name
    pub name: &'static str,

    /// Implementation used
    pub kind: ModelKind,

    /// Whether bigram features are extracted
    pub bigrams: bool,

    /// One-line description for listings
    pub description: &'static str,
}

impl ModelSpec {
    /// Build a fresh, untrained model for this entry
    pub fn build(&self, config: &ClassifierConfig) -> Box<dyn Model> {
        match self.kind {
            ModelKind::Bayes => Box::new(Bayes::with_config(self.bigrams, &config.bayes)),
            ModelKind::Forest => Box::new(ForestModel::with_config(self.bigrams, &config.forest)),
        }
    }
}

/// All registered models
pub const MODELS: &[ModelSpec] = &[
    ModelSpec {
        name: "bayes",
        kind: ModelKind::Bayes,
        bigrams: false,
        description: "Naive Bayes over unigram features",
    },
    ModelSpec {
        name: "bayes-bigram",
        kind: ModelKind::Bayes,
        bigrams: true,
        description: "Naive Bayes over unigram and bigram features",
    },
    ModelSpec {
        name: "forest",
        kind: ModelKind::Forest,
        bigrams: false,
        description: "Random forest over unigram features",
    },
    ModelSpec {
        name: "forest-bigram",
        kind: ModelKind::Forest,
        bigrams: true,
        description: "Random forest over unigram and bigram features",
    },
];

/// Look up a registry entry by name
pub fn spec(name: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|spec| spec.name == name)
}

/// Registered model names, sorted
pub fn model_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = MODELS.iter().map(|spec| spec.name).collect();
    names.sort_unstable();
    names
}

/// Create a fresh, untrained model by registry name
pub fn create(name: &str, config: &ClassifierConfig) -> Result<Box<dyn Model>> {
    let spec = spec(name).ok_or_else(|| Error::unknown_model(name))?;
    debug!("Creating model '{}' ({})", spec.name, spec.kind);
    Ok(spec.build(config))
}

/// Restore a model from serialized bytes of any registered kind
pub fn deserialize(bytes: &[u8]) -> Result<Box<dyn Model>> {
    let header = decode_header(bytes)?;
    let model: Box<dyn Model> = match header.kind {
        ModelKind::Bayes => Box::new(Bayes::deserialize(bytes)?),
        ModelKind::Forest => Box::new(ForestModel::deserialize(bytes)?),
    };
    Ok(model)
}

/// Load a model file
pub fn load(path: impl AsRef<Path>) -> Result<Box<dyn Model>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let model = deserialize(&bytes)?;
    info!("Loaded {} model from {}", model.kind(), path.display());
    Ok(model)
}

/// Write a model file, replacing any existing one
pub fn save(model: &dyn Model, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, model.serialize()?)?;
    info!("Saved {} model to {}", model.kind(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodline_core::{Sample, Sentiment};
    use tempfile::TempDir;

    fn samples() -> Vec<Sample> {
        vec![
            Sample::new("good good day", Sentiment::Positive),
            Sample::new("good times", Sentiment::Positive),
            Sample::new("bad bad day", Sentiment::Negative),
            Sample::new("bad times", Sentiment::Negative),
        ]
    }

    fn small_config() -> ClassifierConfig {
        let mut config = ClassifierConfig::default();
        config.bayes.min_feature_count = 1;
        config.forest.trees = 5;
        config
    }

    #[test]
    fn test_model_names_sorted() {
        assert_eq!(
            model_names(),
            vec!["bayes", "bayes-bigram", "forest", "forest-bigram"]
        );
    }

    #[test]
    fn test_create_every_model() {
        let config = ClassifierConfig::default();
        for spec in MODELS {
            let model = create(spec.name, &config).unwrap();
            assert_eq!(model.kind(), spec.kind);
            assert_eq!(model.uses_bigrams(), spec.bigrams);
            assert!(!model.is_trained());
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = create("svm", &ClassifierConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnknownModelName(name) if name == "svm"));
    }

    #[test]
    fn test_deserialize_dispatches_on_kind() {
        let config = small_config();
        for name in model_names() {
            let mut model = create(name, &config).unwrap();
            model.train(&samples()).unwrap();

            let restored = deserialize(&model.serialize().unwrap()).unwrap();
            assert_eq!(restored.kind(), model.kind());
            assert_eq!(restored.uses_bigrams(), model.uses_bigrams());
            assert!(restored.is_trained());
        }
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(matches!(
            deserialize(b"not a model"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");

        let mut model = create("bayes-bigram", &small_config()).unwrap();
        model.train(&samples()).unwrap();
        save(model.as_ref(), &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(
            loaded.classify("good day").unwrap(),
            model.classify("good day").unwrap()
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }
}
