//! Labeled corpus reader
//!
//! The CSV layout is inferred from the first record:
//! - Sentiment140: `0|2|4,id,date,query,user,text`
//! - labeled pairs: `label,text` with an optional `sentiment,text` header

use moodline_core::{Error, Result, Sample, Sentiment};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of columns in a Sentiment140 record
const SENTIMENT140_COLUMNS: usize = 6;

/// Supported corpus layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Sentiment140 training data
    Sentiment140,
    /// `label,text` pairs
    LabeledPairs,
}

impl Layout {
    fn detect(first: &csv::StringRecord) -> Result<Self> {
        if first.len() == SENTIMENT140_COLUMNS && matches!(&first[0], "0" | "2" | "4") {
            Ok(Self::Sentiment140)
        } else if first.len() == 2 && (is_header(first) || first[0].parse::<Sentiment>().is_ok()) {
            Ok(Self::LabeledPairs)
        } else {
            Err(Error::corpus("unknown data format"))
        }
    }

    fn sample(&self, index: usize, record: &csv::StringRecord) -> Result<Sample> {
        match self {
            Self::Sentiment140 => {
                let sentiment = match &record[0] {
                    "0" => Sentiment::Negative,
                    "2" => Sentiment::Neutral,
                    "4" => Sentiment::Positive,
                    other => {
                        return Err(Error::corpus(format!(
                            "record {index}: invalid sentiment {other}"
                        )))
                    }
                };
                // Text is the last column even if a record carries extras.
                let text = record.iter().last().unwrap_or_default();
                Ok(Sample::new(text, sentiment))
            }
            Self::LabeledPairs => {
                if record.len() != 2 {
                    return Err(Error::corpus(format!(
                        "record {index}: expected 2 columns, found {}",
                        record.len()
                    )));
                }
                let sentiment = record[0].parse::<Sentiment>().map_err(|_| {
                    Error::corpus(format!("record {index}: invalid sentiment {}", &record[0]))
                })?;
                Ok(Sample::new(&record[1], sentiment))
            }
        }
    }
}

fn is_header(record: &csv::StringRecord) -> bool {
    record.len() == 2
        && record[0].trim().eq_ignore_ascii_case("sentiment")
        && record[1].trim().eq_ignore_ascii_case("text")
}

fn csv_error(err: csv::Error) -> Error {
    Error::corpus(err.to_string())
}

/// Read labeled samples from CSV data
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let first = match records.next() {
        None => return Ok(Vec::new()),
        Some(record) => record.map_err(csv_error)?,
    };
    let layout = Layout::detect(&first)?;
    debug!("Detected {:?} corpus layout", layout);

    let mut samples = Vec::new();
    if !is_header(&first) {
        samples.push(layout.sample(0, &first)?);
    }
    for (offset, record) in records.enumerate() {
        let record = record.map_err(csv_error)?;
        samples.push(layout.sample(offset + 1, &record)?);
    }

    Ok(samples)
}

/// Read labeled samples from a CSV file
pub fn load_samples(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
    read_samples(File::open(path)?)
}
