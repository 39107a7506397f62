//! Error types for moodline

/// Result type alias using moodline's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for moodline operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Degenerate training data, bad parameters, or malformed model bytes
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Classification requested before any successful train or load
    #[error("model has not been trained")]
    NotTrained,

    /// Registry lookup miss
    #[error("unknown model name: {0}")]
    UnknownModelName(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Corpus parsing errors
    #[error("corpus error: {0}")]
    Corpus(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new unknown model name error
    pub fn unknown_model(name: impl Into<String>) -> Self {
        Self::UnknownModelName(name.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new corpus error
    pub fn corpus(msg: impl Into<String>) -> Self {
        Self::Corpus(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::invalid_input("no samples").to_string(),
            "invalid input: no samples"
        );
        assert_eq!(Error::NotTrained.to_string(), "model has not been trained");
        assert_eq!(
            Error::unknown_model("svm").to_string(),
            "unknown model name: svm"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
