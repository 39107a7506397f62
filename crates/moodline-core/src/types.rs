//! Core types for moodline

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentiment label of a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Every sentiment, in the order classifiers evaluate them.
    ///
    /// Argmax ties resolve to the earliest entry.
    pub const CANONICAL_ORDER: [Sentiment; 3] =
        [Sentiment::Neutral, Sentiment::Negative, Sentiment::Positive];

    /// Lower-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Signed form used in sentiment-over-time output (1, 0, -1)
    pub fn signed(&self) -> i8 {
        match self {
            Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative => -1,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "1" => Ok(Self::Positive),
            "neutral" | "0" => Ok(Self::Neutral),
            "negative" | "-1" => Ok(Self::Negative),
            other => Err(Error::invalid_input(format!("invalid sentiment: {other}"))),
        }
    }
}

/// A single labeled training or testing example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Raw text
    pub contents: String,

    /// Expected label
    pub sentiment: Sentiment,
}

impl Sample {
    /// Create a new sample
    pub fn new(contents: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            contents: contents.into(),
            sentiment,
        }
    }
}
