//! Error types for query merging.
//!
//! Encoding itself is total over the supported value model; errors only come
//! from the collaborators around it: URI validation and record serialization.

use thiserror::Error;

/// Main error type for query merging operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The URI text was rejected, either on input or after splicing
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// A record field holds a value outside the flat parameter model
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Serializing a record into its fields failed
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Specialized result type for query merging operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUri(_) => "INVALID_URI",
            Self::UnsupportedValue(_) => "UNSUPPORTED_VALUE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    pub(crate) fn invalid_uri(input: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidUri(format!("{input:?}: {reason}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUri(err.to_string())
    }
}
