//! Normalized tabular data and destination naming.

use serde::{Deserialize, Serialize};

use crate::{DataCategory, ShapeError, Ticker, Value};

/// A labeled row index (e.g. the `Date` column of a price series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexColumn {
    /// Column name used when the index is persisted.
    pub name: String,
    /// One label per row.
    pub labels: Vec<Value>,
}

/// A rectangular table with named columns and an ordered row sequence.
///
/// Every row holds exactly one cell per column, and a labeled index, when
/// present, holds exactly one label per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    index: Option<IndexColumn>,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl NormalizedTable {
    /// Creates a table without a labeled index.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::Ragged`] if a row width differs from the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, ShapeError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(ShapeError::Ragged {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self {
            index: None,
            columns,
            rows,
        })
    }

    /// Creates a two-column `key`/`value` table from ordered pairs.
    #[must_use]
    pub fn key_value(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        let rows = pairs
            .into_iter()
            .map(|(key, value)| vec![Value::Text(key), value])
            .collect();
        Self {
            index: None,
            columns: vec!["key".to_string(), "value".to_string()],
            rows,
        }
    }

    /// Attaches a labeled row index.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::IndexLength`] if the label count differs from the row count.
    pub fn with_index(mut self, name: impl Into<String>, labels: Vec<Value>) -> Result<Self, ShapeError> {
        let name = name.into();
        if labels.len() != self.rows.len() {
            return Err(ShapeError::IndexLength {
                name,
                expected: self.rows.len(),
                found: labels.len(),
            });
        }
        self.index = Some(IndexColumn { name, labels });
        Ok(self)
    }

    /// Returns the labeled index, if any.
    #[must_use]
    pub const fn index(&self) -> Option<&IndexColumn> {
        self.index.as_ref()
    }

    /// Returns the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of a column by name.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates the cells of one column, top to bottom.
    pub fn column_values(&self, position: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(position))
    }
}

/// Name of the relation a table is materialized under.
///
/// Built as `"{TICKER} {CategoryLabel}"`, e.g. `AAPL Historic Price`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DestinationName(String);

impl DestinationName {
    /// Builds the destination name for a ticker and category.
    #[must_use]
    pub fn for_run(ticker: &Ticker, category: DataCategory) -> Self {
        Self(format!("{} {}", ticker, category.table_label()))
    }

    /// Wraps an explicit relation name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DestinationName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
