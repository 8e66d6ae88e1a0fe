//! Error types raised before a table reaches the destination store.

use thiserror::Error;

use crate::{DataCategory, RawShape};

/// Errors that can occur while retrieving data from the provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider does not know the requested identifier.
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned status {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body does not have the expected structure.
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// The session crumb required by the provider could not be obtained.
    #[error("Failed to obtain provider crumb: {0}")]
    Crumb(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Errors raised when data does not have the shape a stage expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The raw record shape does not match the requested category.
    #[error("Category '{category}' expects {expected} data, got {found}")]
    UnexpectedShape {
        /// The requested category.
        category: DataCategory,
        /// The shape the category requires.
        expected: RawShape,
        /// The shape that was received.
        found: RawShape,
    },

    /// A row has a different number of cells than the table has columns.
    #[error("Row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based row position.
        row: usize,
        /// Number of columns.
        expected: usize,
        /// Number of cells in the row.
        found: usize,
    },

    /// The row index has a different length than the row sequence.
    #[error("Index '{name}' has {found} labels for {expected} rows")]
    IndexLength {
        /// Index column name.
        name: String,
        /// Number of rows.
        expected: usize,
        /// Number of index labels.
        found: usize,
    },
}
