//! Sentiment over the course of a body of text

use moodline_classifiers::{classify_all, Model};
use moodline_core::{Error, Result, Sentiment};
use std::io::Write;
use tracing::warn;

/// Words ending in a period that do not end a sentence
const HONORIFICS: [&str; 4] = ["Dr.", "Mr.", "Mrs.", "Ms."];

/// A sentence and where it ends in the text
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub text: String,

    /// Index of the sentence's last word divided by the total word count
    pub position: f64,
}

/// A classified sentence position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: f64,
    pub sentiment: Sentiment,
}

/// Whether `word` terminates a sentence
pub fn sentence_ended(word: &str) -> bool {
    if HONORIFICS.contains(&word) {
        return false;
    }
    word.ends_with('.') || word.ends_with('?') || word.ends_with('!')
}

/// Split text into sentences. Trailing words without a terminator are dropped.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut sentences = Vec::new();
    let mut start = 0;

    for (index, word) in words.iter().enumerate() {
        if sentence_ended(word) {
            sentences.push(Sentence {
                text: words[start..=index].join(" "),
                position: index as f64 / words.len() as f64,
            });
            start = index + 1;
        }
    }

    sentences
}

/// Classify every sentence on `workers` threads
///
/// Sentences that fail to classify are logged and left out.
pub fn classify_sentences(
    model: &dyn Model,
    sentences: &[Sentence],
    workers: usize,
) -> Result<Vec<Point>> {
    let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();

    let points = classify_all(model, &texts, workers)?
        .into_iter()
        .zip(sentences)
        .filter_map(|(sentiment, sentence)| match sentiment {
            Ok(sentiment) => Some(Point {
                position: sentence.position,
                sentiment,
            }),
            Err(e) => {
                warn!("Skipping sentence at {:.6}: {}", sentence.position, e);
                None
            }
        })
        .collect();

    Ok(points)
}

/// Write `position,sentiment` rows sorted by position
pub fn write_csv<W: Write>(writer: W, points: &[Point]) -> Result<()> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut writer = csv::Writer::from_writer(writer);
    for point in &sorted {
        writer
            .write_record([
                format!("{:.6}", point.position),
                point.sentiment.signed().to_string(),
            ])
            .map_err(|e| Error::corpus(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
