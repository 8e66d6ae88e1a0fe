//! Security identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a ticker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    /// Empty or whitespace-only input.
    #[error("Ticker symbol must not be empty")]
    Empty,

    /// Input contains whitespace between characters.
    #[error("Ticker symbol '{0}' contains whitespace")]
    Whitespace(String),
}

/// A provider ticker symbol, always trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Creates a ticker from free-form operator input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or contains inner whitespace.
    pub fn new(symbol: impl AsRef<str>) -> Result<Self, TickerError> {
        let trimmed = symbol.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TickerError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TickerError::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the symbol.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}
