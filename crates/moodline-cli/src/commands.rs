//! Subcommand implementations

use crate::corpus::load_samples;
use crate::plot::{classify_sentences, split_sentences, write_csv};
use anyhow::{Context, Result};
use moodline_classifiers::{evaluate, registry, ClassifierConfig, Evaluation, Model};
use moodline_core::Sentiment;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Train `model_path` on `corpus`, creating a `model_name` model if the file is missing
pub fn train(
    config: &ClassifierConfig,
    model_name: &str,
    model_path: &Path,
    corpus: &Path,
) -> Result<()> {
    let mut model: Box<dyn Model> = if model_path.exists() {
        let model = registry::load(model_path).with_context(|| {
            format!("failed to load existing model {}", model_path.display())
        })?;
        info!("Loaded existing model from file");
        model
    } else {
        registry::create(model_name, config)?
    };

    let samples = load_samples(corpus)
        .with_context(|| format!("failed to parse data {}", corpus.display()))?;
    info!("Training on {} samples", samples.len());

    model.train(&samples).context("training failed")?;
    registry::save(model.as_ref(), model_path)
        .with_context(|| format!("failed to write model file {}", model_path.display()))?;

    Ok(())
}

/// Evaluate `model_path` on `corpus` and print a report to `out`
pub fn test(
    config: &ClassifierConfig,
    model_path: &Path,
    corpus: &Path,
    out: &mut impl Write,
) -> Result<Evaluation> {
    let model = registry::load(model_path)
        .with_context(|| format!("failed to read model {}", model_path.display()))?;
    let samples = load_samples(corpus)
        .with_context(|| format!("failed to parse corpus {}", corpus.display()))?;

    let evaluation = evaluate(model.as_ref(), &samples, config.worker_count())?;
    write_report(out, &evaluation)?;
    Ok(evaluation)
}

/// Print accuracy, failures and the confusion table
pub fn write_report(out: &mut impl Write, evaluation: &Evaluation) -> Result<()> {
    writeln!(
        out,
        "Got {}/{} ({:.2}%)",
        evaluation.correct,
        evaluation.total,
        evaluation.accuracy() * 100.0
    )?;
    if evaluation.failed > 0 {
        writeln!(out, "Failed: {}", evaluation.failed)?;
    }

    writeln!(out)?;
    write!(out, "{:>10}", "expected")?;
    for predicted in Sentiment::CANONICAL_ORDER {
        write!(out, " {:>9}", predicted.as_str())?;
    }
    writeln!(out)?;
    for expected in Sentiment::CANONICAL_ORDER {
        write!(out, "{:>10}", expected.as_str())?;
        for predicted in Sentiment::CANONICAL_ORDER {
            write!(out, " {:>9}", evaluation.count(expected, predicted))?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Classify each sentence of `text_path` and write the positions to `output`
pub fn plot_csv(
    config: &ClassifierConfig,
    model_path: &Path,
    text_path: &Path,
    output: &Path,
) -> Result<usize> {
    let model = registry::load(model_path)
        .with_context(|| format!("failed to read model {}", model_path.display()))?;
    let text = fs::read_to_string(text_path)
        .with_context(|| format!("failed to read text file {}", text_path.display()))?;

    let sentences = split_sentences(&text);
    info!("Classifying {} sentences", sentences.len());
    let points = classify_sentences(model.as_ref(), &sentences, config.worker_count())?;

    let file = File::create(output)
        .with_context(|| format!("failed to create output {}", output.display()))?;
    write_csv(BufWriter::new(file), &points)?;

    Ok(points.len())
}

/// List registry names and descriptions
pub fn models(out: &mut impl Write) -> Result<()> {
    for name in registry::model_names() {
        let description = registry::spec(name).map_or("", |spec| spec.description);
        writeln!(out, " - {name:<14} {description}")?;
    }
    Ok(())
}
