//! Error types for the docrank library.

use std::io;
use thiserror::Error;

/// Result type alias for docrank operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction and ranking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout document could not be decoded.
    #[error("Malformed layout document: {0}")]
    MalformedLayout(String),

    /// A run configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required persona field is missing or empty.
    #[error("Persona field '{0}' must be non-empty")]
    EmptyPersonaField(&'static str),

    /// The embedding collaborator failed for a given text.
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// The embedding collaborator returned a vector of unexpected length.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality the embedder advertises.
        expected: usize,
        /// Length of the vector actually returned.
        actual: usize,
    },

    /// Error serializing output (outline or ranking JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A referenced document was not found in the batch input.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else {
            Error::MalformedLayout(err.to_string())
        }
    }
}
