//! Model trait and the persisted model envelope

use moodline_core::{Error, Result, Sample, Sentiment};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format tag written into every model file
pub const MODEL_FORMAT: &str = "moodline-model";

/// Current model file version
pub const MODEL_VERSION: u32 = 1;

/// Trait for all sentiment models
///
/// `classify` only reads trained state, so a trained model can be shared
/// across threads; `train` needs exclusive access.
pub trait Model: Send + Sync + fmt::Debug {
    /// Concrete backend of this model
    fn kind(&self) -> ModelKind;

    /// Whether bigram features are used in addition to unigrams
    fn uses_bigrams(&self) -> bool;

    /// Whether the model holds learned state
    fn is_trained(&self) -> bool;

    /// Classify the given text
    ///
    /// Fails with [`Error::NotTrained`] before a successful train or load.
    fn classify(&self, text: &str) -> Result<Sentiment>;

    /// Rebuild the model from scratch using the given samples
    fn train(&mut self, samples: &[Sample]) -> Result<()>;

    /// Encode the model as a tagged model file
    fn serialize(&self) -> Result<Vec<u8>>;
}

/// Closed set of model backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Naive Bayes over feature presence
    Bayes,
    /// Random forest of ID3 decision trees
    Forest,
}

impl ModelKind {
    /// Lower-case name, as written in model files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bayes => "bayes",
            Self::Forest => "forest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifying fields of a model file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelHeader {
    pub format: String,
    pub version: u32,
    pub kind: ModelKind,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    format: &'a str,
    version: u32,
    kind: ModelKind,
    model: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    kind: ModelKind,
    model: T,
}

/// Wrap a model body in the tagged envelope
pub fn encode<T: Serialize>(kind: ModelKind, model: &T) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        format: MODEL_FORMAT,
        version: MODEL_VERSION,
        kind,
        model,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Read and validate the header of a model file
pub fn decode_header(bytes: &[u8]) -> Result<ModelHeader> {
    let header: ModelHeader = serde_json::from_slice(bytes)
        .map_err(|e| Error::invalid_input(format!("malformed model file: {e}")))?;

    if header.format != MODEL_FORMAT {
        return Err(Error::invalid_input(format!(
            "not a model file (format '{}')",
            header.format
        )));
    }
    if header.version != MODEL_VERSION {
        return Err(Error::invalid_input(format!(
            "unsupported model file version {} (expected {})",
            header.version, MODEL_VERSION
        )));
    }

    Ok(header)
}

/// Decode the body of a model file, checking that it holds `kind`
pub fn decode<T: DeserializeOwned>(kind: ModelKind, bytes: &[u8]) -> Result<T> {
    let header = decode_header(bytes)?;
    if header.kind != kind {
        return Err(Error::invalid_input(format!(
            "model file holds a {} model, expected {}",
            header.kind, kind
        )));
    }

    let envelope: Envelope<T> = serde_json::from_slice(bytes)
        .map_err(|e| Error::invalid_input(format!("malformed {kind} model: {e}")))?;
    debug_assert_eq!(envelope.kind, kind);

    Ok(envelope.model)
}

/// Argmax over per-sentiment scores in canonical order.
///
/// A later sentiment only replaces the current best when its score is
/// strictly greater, so ties resolve to the earliest canonical sentiment.
pub(crate) fn best_sentiment<I>(scores: I) -> Option<Sentiment>
where
    I: IntoIterator<Item = (Sentiment, f64)>,
{
    let mut best: Option<(Sentiment, f64)> = None;
    for (sentiment, score) in scores {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((sentiment, score)),
        }
    }
    best.map(|(sentiment, _)| sentiment)
}
