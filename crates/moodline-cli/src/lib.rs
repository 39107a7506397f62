//! Moodline command line tools
//!
//! Train models on labeled CSV corpora, measure their accuracy and plot
//! sentiment across a body of text.

pub mod cli;
pub mod commands;
pub mod corpus;
pub mod plot;
pub mod telemetry;
