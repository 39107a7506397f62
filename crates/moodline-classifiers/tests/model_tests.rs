//! End-to-end tests for the moodline models
//!
//! Trains every registered model on small hand-built corpora and checks
//! classification, persistence and the text pipeline properties.

use moodline_classifiers::config::{BayesConfig, ClassifierConfig, ForestConfig};
use moodline_classifiers::features::extract_features;
use moodline_classifiers::normalize::{collapse_repeats, normalize};
use moodline_classifiers::prelude::*;
use proptest::prelude::*;
use tempfile::TempDir;

/// Texts classified before and after persistence
const PROBES: &[&str] = &[
    "I love this",
    "I hate this",
    "this is a thing",
    "not good at all",
    "very good",
    "@someone check https://example.com",
    "sooooo baaaad!!!",
    "",
    "zebra quantum marmalade",
];

fn unpruned() -> BayesConfig {
    BayesConfig {
        smoothing: 1.0,
        min_feature_count: 1,
    }
}

fn small_forest() -> ForestConfig {
    ForestConfig {
        trees: 9,
        subsample: None,
        max_depth: 12,
        seed: 3,
    }
}

fn test_config() -> ClassifierConfig {
    ClassifierConfig {
        bayes: unpruned(),
        forest: small_forest(),
        workers: Some(2),
    }
}

fn love_hate_corpus() -> Vec<Sample> {
    vec![
        Sample::new("I love this", Sentiment::Positive),
        Sample::new("I hate this", Sentiment::Negative),
        Sample::new("this is a thing", Sentiment::Neutral),
    ]
}

fn negation_corpus() -> Vec<Sample> {
    let positive = [
        "very good",
        "good",
        "so good",
        "really good",
        "not bad",
        "not bad at all",
        "good times",
        "not bad really",
    ];
    let negative = [
        "not good",
        "not good at all",
        "bad",
        "very bad",
        "so bad",
        "really bad",
        "bad times",
        "good grief",
    ];

    positive
        .iter()
        .map(|t| Sample::new(*t, Sentiment::Positive))
        .chain(negative.iter().map(|t| Sample::new(*t, Sentiment::Negative)))
        .collect()
}

#[test]
fn test_love_this_is_positive() {
    let mut model = Bayes::with_config(false, &unpruned());
    model.train(&love_hate_corpus()).unwrap();
    assert_eq!(model.classify("I love this").unwrap(), Sentiment::Positive);
}

#[test]
fn test_single_sample_training_is_defined() {
    for name in registry::model_names() {
        let mut model = registry::create(name, &test_config()).unwrap();
        model
            .train(&[Sample::new("only one sample", Sentiment::Positive)])
            .unwrap();

        for probe in PROBES {
            assert_eq!(model.classify(probe).unwrap(), Sentiment::Positive, "{name}");
        }
    }
}

#[test]
fn test_bigrams_capture_negation() {
    let corpus = negation_corpus();

    let mut unigram = Bayes::with_config(false, &unpruned());
    unigram.train(&corpus).unwrap();
    let mut bigram = Bayes::with_config(true, &unpruned());
    bigram.train(&corpus).unwrap();

    assert_eq!(unigram.classify("not good").unwrap(), Sentiment::Positive);
    assert_eq!(bigram.classify("not good").unwrap(), Sentiment::Negative);

    for model in [&unigram, &bigram] {
        assert_eq!(model.classify("very good").unwrap(), Sentiment::Positive);
        assert_eq!(model.classify("good").unwrap(), Sentiment::Positive);
    }
}

#[test]
fn test_unseen_text_classifies() {
    for name in registry::model_names() {
        let mut model = registry::create(name, &test_config()).unwrap();
        model.train(&love_hate_corpus()).unwrap();
        assert!(model.classify("zebra quantum marmalade").is_ok(), "{name}");
        assert!(model.classify("").is_ok(), "{name}");
    }
}

#[test]
fn test_scores_are_finite_for_unseen_features() {
    let mut model = Bayes::with_config(true, &unpruned());
    model.train(&negation_corpus()).unwrap();

    let scores = model.scores("completely unseen words here").unwrap();
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|(_, score)| score.is_finite()));
}

#[test]
fn test_roundtrip_on_probe_battery() {
    let dir = TempDir::new().unwrap();

    for name in registry::model_names() {
        let mut model = registry::create(name, &test_config()).unwrap();
        model.train(&negation_corpus()).unwrap();

        let path = dir.path().join(format!("{name}.json"));
        registry::save(model.as_ref(), &path).unwrap();
        let restored = registry::load(&path).unwrap();

        for probe in PROBES {
            assert_eq!(
                restored.classify(probe).unwrap(),
                model.classify(probe).unwrap(),
                "{name} on {probe:?}"
            );
        }
        assert_eq!(restored.serialize().unwrap(), model.serialize().unwrap());
    }
}

#[test]
fn test_wrong_kind_rejected() {
    let mut model = Bayes::with_config(false, &unpruned());
    model.train(&love_hate_corpus()).unwrap();
    let bytes = model.serialize().unwrap();

    assert!(matches!(
        ForestModel::deserialize(&bytes),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_foreign_format_rejected() {
    let bytes = br#"{"format":"other","version":1,"kind":"bayes","model":{}}"#;
    assert!(matches!(
        registry::deserialize(bytes),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_feature_extraction_deterministic() {
    let text = "Not good at ALL!! @friend http://t.co/x";
    assert_eq!(extract_features(text, true), extract_features(text, true));
    assert!(extract_features(text, true).contains("not good"));
    assert!(extract_features(text, false).contains("<user>"));
    assert!(extract_features(text, false).contains("<url>"));
}

proptest! {
    #[test]
    fn prop_normalize_idempotent(text in "[a-zA-Z@:/. !?,]{0,60}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_collapse_limits_runs(token in "[abc]{0,40}") {
        let collapsed = collapse_repeats(&token);
        let chars: Vec<char> = collapsed.chars().collect();
        prop_assert!(chars.windows(3).all(|w| !(w[0] == w[1] && w[1] == w[2])));
        prop_assert_eq!(collapse_repeats(&collapsed), collapsed.clone());
    }

    #[test]
    fn prop_priors_sum_to_one(labels in proptest::collection::vec(0u8..3, 1..20)) {
        let samples: Vec<Sample> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let sentiment = Sentiment::CANONICAL_ORDER[*label as usize];
                Sample::new(format!("word{} shared", i % 4), sentiment)
            })
            .collect();

        let mut model = Bayes::with_config(false, &unpruned());
        model.train(&samples).unwrap();

        let sum: f64 = model.sentiment_prior().values().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);
        for table in model.feature_conditional().values() {
            prop_assert!(table.values().all(|p| *p > 0.0 && *p < 1.0));
        }
    }
}
