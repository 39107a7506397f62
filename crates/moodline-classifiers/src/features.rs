//! Unigram and bigram feature extraction

use crate::normalize::{normalize, separate_punctuation};
use std::collections::BTreeSet;

/// Separator placed between the two tokens of a bigram
pub const BIGRAM_SEPARATOR: &str = " ";

/// Set of features extracted from one text
pub type FeatureSet = BTreeSet<String>;

/// Extract the feature set of `text`.
///
/// Every normalized token is a unigram feature; with `use_bigrams` every
/// adjacent token pair is added as well.
pub fn extract_features(text: &str, use_bigrams: bool) -> FeatureSet {
    let prepared = separate_punctuation(&normalize(text));
    let tokens: Vec<&str> = prepared.split_whitespace().collect();

    let mut features: FeatureSet = tokens.iter().map(|t| t.to_string()).collect();

    if use_bigrams {
        for pair in tokens.windows(2) {
            features.insert(format!("{}{}{}", pair[0], BIGRAM_SEPARATOR, pair[1]));
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> FeatureSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unigrams() {
        assert_eq!(
            extract_features("I love this", false),
            set(&["i", "love", "this"])
        );
    }

    #[test]
    fn test_bigrams() {
        assert_eq!(
            extract_features("not good", true),
            set(&["not", "good", "not good"])
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(
            extract_features("ha ha ha", true),
            set(&["ha", "ha ha"])
        );
    }

    #[test]
    fn test_punctuation_is_a_feature() {
        assert_eq!(
            extract_features("great!!", true),
            set(&["great", "!!", "great !!"])
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_features("", true).is_empty());
    }
}
