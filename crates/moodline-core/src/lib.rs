//! Moodline Core
//!
//! Types shared by every moodline component:
//! - The closed `Sentiment` label set and labeled `Sample`s
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Sample, Sentiment};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Sample, Sentiment};
}
