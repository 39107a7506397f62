//! Subcommand tests against temporary corpora and model files

use moodline_classifiers::{registry, ClassifierConfig};
use moodline_cli::commands;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CORPUS: &str = "sentiment,text\n\
    positive,I love this\n\
    positive,love love love\n\
    positive,what a lovely day\n\
    negative,I hate this\n\
    negative,hate hate hate\n\
    negative,what a hateful day\n\
    neutral,this is a thing\n";

fn config() -> ClassifierConfig {
    let mut config = ClassifierConfig::default();
    config.bayes.min_feature_count = 1;
    config.forest.trees = 7;
    config.workers = Some(2);
    config
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_train_then_test() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.csv", CORPUS);
    let model_path = dir.path().join("model.json");

    commands::train(&config(), "bayes", &model_path, &corpus).unwrap();
    assert!(model_path.exists());

    let mut out = Vec::new();
    let evaluation = commands::test(&config(), &model_path, &corpus, &mut out).unwrap();
    assert_eq!(evaluation.total, 7);
    assert_eq!(evaluation.failed, 0);

    let report = String::from_utf8(out).unwrap();
    assert!(report.starts_with(&format!("Got {}/7", evaluation.correct)));
    assert!(report.contains("negative"));
}

#[test]
fn test_train_keeps_existing_model_kind() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.csv", CORPUS);
    let model_path = dir.path().join("model.json");

    commands::train(&config(), "forest-bigram", &model_path, &corpus).unwrap();
    // The name is ignored once the file exists.
    commands::train(&config(), "bayes", &model_path, &corpus).unwrap();

    let model = registry::load(&model_path).unwrap();
    assert_eq!(model.kind().as_str(), "forest");
    assert!(model.uses_bigrams());
}

#[test]
fn test_train_unknown_model() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.csv", CORPUS);
    let model_path = dir.path().join("model.json");

    assert!(commands::train(&config(), "svm", &model_path, &corpus).is_err());
    assert!(!model_path.exists());
}

#[test]
fn test_plot_csv() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.csv", CORPUS);
    let model_path = dir.path().join("model.json");
    commands::train(&config(), "bayes-bigram", &model_path, &corpus).unwrap();

    let text = write(
        dir.path(),
        "story.txt",
        "I love this. Mr. Smith said I hate this! Is this a thing? trailing words",
    );
    let output = dir.path().join("plot.csv");

    let points = commands::plot_csv(&config(), &model_path, &text, &output).unwrap();
    assert_eq!(points, 3);

    let csv = fs::read_to_string(&output).unwrap();
    let positions: Vec<f64> = csv
        .lines()
        .map(|line| line.split(',').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(positions.len(), 3);
    assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    assert!(csv.lines().all(|line| {
        let sentiment = line.split(',').nth(1).unwrap();
        ["1", "0", "-1"].contains(&sentiment)
    }));
}

#[test]
fn test_models_listing() {
    let mut out = Vec::new();
    commands::models(&mut out).unwrap();
    let listing = String::from_utf8(out).unwrap();

    for name in registry::model_names() {
        assert!(listing.contains(name));
    }
}
