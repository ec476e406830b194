//! Error types for rankext.
//!
//! All fallible operations return [`RankError`] through the crate-wide
//! [`Result`] alias. Note that a poor or missing match is never an error:
//! scorers report it through the returned score (0, or the filter-out
//! sentinel) and expanders by emitting nothing.
//!
//! # Examples
//!
//! ```
//! use rankext::error::{RankError, Result};
//!
//! fn check_mask(mask: u64) -> Result<()> {
//!     if mask == 0 {
//!         return Err(RankError::validation("empty field mask"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_mask(0).is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for rankext operations.
#[derive(Error, Debug)]
pub enum RankError {
    /// I/O errors (config, fixture and dictionary files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Query validation failures raised during expansion
    #[error("Validation error: {0}")]
    Validation(String),

    /// A result tree that breaks the node invariants
    #[error("Invalid result tree: {0}")]
    InvalidResult(String),

    /// Bad caller-supplied argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Lookup of an unregistered scorer or expander
    #[error("Not found: {0}")]
    NotFound(String),

    /// Registration under a name that is already taken
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with RankError.
pub type Result<T> = std::result::Result<T, RankError>;

impl RankError {
    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        RankError::Validation(msg.into())
    }

    /// Create a new invalid result tree error.
    pub fn invalid_result<S: Into<String>>(msg: S) -> Self {
        RankError::InvalidResult(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        RankError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RankError::InvalidConfig(msg.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        RankError::NotFound(msg.into())
    }

    /// Create a new duplicate registration error.
    pub fn already_registered<S: Into<String>>(msg: S) -> Self {
        RankError::AlreadyRegistered(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        RankError::Schema(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RankError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = RankError::validation("field does not support phonetics");
        assert_eq!(
            error.to_string(),
            "Validation error: field does not support phonetics"
        );

        let error = RankError::not_found("scorer 'FOO'");
        assert_eq!(error.to_string(), "Not found: scorer 'FOO'");

        let error = RankError::already_registered("BM25");
        assert_eq!(error.to_string(), "Already registered: BM25");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let rank_error = RankError::from(io_error);

        match rank_error {
            RankError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
