use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moodline")]
#[command(
    author,
    version,
    about = "Train, test and plot sentiment models for short informal text"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Classifier configuration file (YAML)
    #[arg(short, long, global = true, env = "MOODLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write Prometheus metrics for this run to the given file
    #[arg(long, global = true)]
    pub metrics: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a model on a CSV corpus, continuing from an existing model file
    Train {
        /// Registry name used when no model file exists yet
        model_name: String,

        /// Model file to read and write
        model_path: PathBuf,

        /// Labeled corpus
        corpus: PathBuf,
    },

    /// Report the accuracy of a model on a CSV corpus
    Test {
        /// Trained model file
        model_path: PathBuf,

        /// Labeled corpus
        corpus: PathBuf,
    },

    /// Write the sentiment of each sentence of a text as CSV
    PlotCsv {
        /// Trained model file
        model_path: PathBuf,

        /// Plain text input
        text: PathBuf,

        /// CSV output
        output: PathBuf,
    },

    /// List available models
    Models,
}
