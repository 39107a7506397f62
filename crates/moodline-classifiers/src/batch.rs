//! Parallel batch classification and corpus evaluation

use crate::model::Model;
use moodline_core::{Error, Result, Sample, Sentiment};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Counter of attempted classifications
pub const CLASSIFICATIONS_METRIC: &str = "moodline_classifications_total";

/// Counter of classifications that returned an error
pub const CLASSIFICATION_ERRORS_METRIC: &str = "moodline_classification_errors_total";

/// Register descriptions for the batch counters with the installed recorder
pub fn describe_metrics() {
    metrics::describe_counter!(
        CLASSIFICATIONS_METRIC,
        "Total number of texts classified in batches"
    );
    metrics::describe_counter!(
        CLASSIFICATION_ERRORS_METRIC,
        "Total number of batch classifications that failed"
    );
}

fn thread_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| Error::config(format!("failed to build worker pool: {e}")))
}

fn classify_one(model: &dyn Model, text: &str) -> Result<Sentiment> {
    metrics::counter!(CLASSIFICATIONS_METRIC).increment(1);
    model.classify(text).map_err(|e| {
        metrics::counter!(CLASSIFICATION_ERRORS_METRIC).increment(1);
        warn!("Classification failed: {}", e);
        e
    })
}

/// Classify every text on `workers` threads
///
/// Results are returned in input order.
pub fn classify_all<S>(
    model: &dyn Model,
    texts: &[S],
    workers: usize,
) -> Result<Vec<Result<Sentiment>>>
where
    S: AsRef<str> + Sync,
{
    let pool = thread_pool(workers)?;
    debug!(
        "Classifying {} texts on {} workers",
        texts.len(),
        pool.current_num_threads()
    );

    Ok(pool.install(|| {
        texts
            .par_iter()
            .map(|text| classify_one(model, text.as_ref()))
            .collect()
    }))
}

/// Outcome of classifying a labeled corpus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Number of samples evaluated
    pub total: usize,

    /// Samples whose prediction matched the label
    pub correct: usize,

    /// Samples whose classification returned an error
    pub failed: usize,

    /// Counts keyed by (expected, predicted)
    pub confusion: BTreeMap<(Sentiment, Sentiment), usize>,
}

impl Evaluation {
    /// Fraction of samples classified correctly, 0 for an empty corpus
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// Count for one (expected, predicted) cell
    pub fn count(&self, expected: Sentiment, predicted: Sentiment) -> usize {
        self.confusion
            .get(&(expected, predicted))
            .copied()
            .unwrap_or(0)
    }

    fn record(&mut self, expected: Sentiment, predicted: &Result<Sentiment>) {
        self.total += 1;
        match predicted {
            Ok(predicted) => {
                if *predicted == expected {
                    self.correct += 1;
                }
                *self.confusion.entry((expected, *predicted)).or_insert(0) += 1;
            }
            Err(_) => self.failed += 1,
        }
    }
}

/// Classify every sample and compare against its label
pub fn evaluate(model: &dyn Model, samples: &[Sample], workers: usize) -> Result<Evaluation> {
    let texts: Vec<&str> = samples.iter().map(|s| s.contents.as_str()).collect();
    let predictions = classify_all(model, &texts, workers)?;

    let mut evaluation = Evaluation::default();
    for (sample, predicted) in samples.iter().zip(&predictions) {
        evaluation.record(sample.sentiment, predicted);
    }
    Ok(evaluation)
}
