//! Raw provider records, before normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RawShape, Value};

/// Insertion-ordered mapping of field names to values.
///
/// Inserting a key that is already present replaces its value but keeps the
/// key at its original position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    fields: Vec<(String, Value)>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.insert(key, value);
        }
        snapshot
    }
}

/// One observation of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// Observation time (UTC).
    pub timestamp: DateTime<Utc>,
    /// One value per series column.
    pub values: Vec<Value>,
}

impl SeriesRow {
    /// Creates a new row.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, values: Vec<Value>) -> Self {
        Self { timestamp, values }
    }
}

/// Time-ordered sequence of observations with named metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Metric names, one per value in each row.
    pub columns: Vec<String>,
    /// Observations in provider order.
    pub rows: Vec<SeriesRow>,
}

impl TimeSeries {
    /// Creates a series from column names and rows.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<SeriesRow>) -> Self {
        Self { columns, rows }
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One labeled line item of a financial statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Line item name (e.g. `totalAssets`).
    pub label: String,
    /// One cell per period of the owning table.
    pub cells: Vec<Value>,
}

/// A period-indexed financial statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatementTable {
    /// Reporting period labels (e.g. `2024-09-28`).
    pub periods: Vec<String>,
    /// Line items in provider order.
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    /// Creates a statement table.
    #[must_use]
    pub fn new(periods: Vec<String>, rows: Vec<StatementRow>) -> Self {
        Self { periods, rows }
    }

    /// Returns the number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three statements retrieved for the financials category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statements {
    /// Balance sheet.
    pub balance_sheet: StatementTable,
    /// Cash flow statement.
    pub cash_flow: StatementTable,
    /// Income statement.
    pub income: StatementTable,
}

/// A provider response before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawRecord {
    /// Field mapping (info and general-info categories).
    Snapshot(Snapshot),
    /// Time-indexed series (historic price and dividend categories).
    Series(TimeSeries),
    /// Financial statements (financials category).
    Statements(Statements),
}

impl RawRecord {
    /// Returns the shape of this record.
    #[must_use]
    pub const fn shape(&self) -> RawShape {
        match self {
            Self::Snapshot(_) => RawShape::Snapshot,
            Self::Series(_) => RawShape::Series,
            Self::Statements(_) => RawShape::Statements,
        }
    }
}
