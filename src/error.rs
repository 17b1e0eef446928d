//! Error types for the minidic library.
//!
//! All fallible operations return [`MinidicError`] through the crate-wide
//! [`Result`] alias. Only a few variants are ever surfaced to a client:
//! [`MinidicError::ResourceUnavailable`] is raised when a dictionary file
//! cannot be read, and the query layer absorbs malformed input and unknown
//! dictionaries into soft, empty answers.
//!
//! # Examples
//!
//! ```
//! use minidic::error::{MinidicError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(MinidicError::invalid_argument("page size must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for minidic operations.
#[derive(Error, Debug)]
pub enum MinidicError {
    /// I/O errors outside of dictionary loading.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage backend errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The backing file of a dictionary could not be read.
    #[error("Dictionary '{name}' is unavailable: {reason}")]
    ResourceUnavailable { name: String, reason: String },

    /// Non-numeric or missing parameters in a query.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// A query referenced a dictionary that has not been loaded.
    #[error("Unknown dictionary: {0}")]
    UnknownDictionary(String),

    /// Invalid argument passed to a library call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with MinidicError.
pub type Result<T> = std::result::Result<T, MinidicError>;

impl MinidicError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        MinidicError::Storage(msg.into())
    }

    /// Create a new resource-unavailable error for the named dictionary.
    pub fn resource_unavailable<N: Into<String>, R: ToString>(name: N, reason: R) -> Self {
        MinidicError::ResourceUnavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new malformed query error.
    pub fn malformed_query<S: Into<String>>(msg: S) -> Self {
        MinidicError::MalformedQuery(msg.into())
    }

    /// Create a new unknown dictionary error.
    pub fn unknown_dictionary<S: Into<String>>(name: S) -> Self {
        MinidicError::UnknownDictionary(name.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        MinidicError::InvalidArgument(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        MinidicError::Other(msg.into())
    }

    /// Whether a transport should answer this error with a server failure
    /// instead of the soft empty response.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            MinidicError::ResourceUnavailable { .. }
                | MinidicError::Io(_)
                | MinidicError::Storage(_)
        )
    }
}
