//! Shape normalization for the tickvault pipeline.
//!
//! This crate turns raw provider records into tables:
//!
//! - [`normalize_snapshot`] - Key/value table with unsafe fields removed
//! - [`normalize_general`] - Key/value table restricted to an allow-list
//! - [`normalize_series`] - Date-indexed table
//! - [`normalize_financials`] - Row-wise concatenation of the three statements
//! - [`normalize`] - Dispatch by data category

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod series;
mod snapshot;
mod statements;

pub use series::{SERIES_INDEX, normalize_series};
pub use snapshot::{GENERAL_INFO_FIELDS, UNSAFE_SNAPSHOT_FIELDS, normalize_general, normalize_snapshot};
pub use statements::{STATEMENT_INDEX, normalize_financials};

use tickvault_types::{DataCategory, NormalizedTable, RawRecord, ShapeError};

/// Normalizes a raw record according to the category it was fetched for.
///
/// # Errors
///
/// Returns [`ShapeError::UnexpectedShape`] if the record's shape does not match
/// the category, or any error of the shape-specific normalizer.
pub fn normalize(category: DataCategory, record: &RawRecord) -> Result<NormalizedTable, ShapeError> {
    match (category, record) {
        (DataCategory::Info, RawRecord::Snapshot(snapshot)) => Ok(normalize_snapshot(snapshot)),
        (DataCategory::GeneralInfo, RawRecord::Snapshot(snapshot)) => {
            Ok(normalize_general(snapshot, GENERAL_INFO_FIELDS))
        }
        (DataCategory::Financials, RawRecord::Statements(statements)) => {
            normalize_financials(statements)
        }
        (DataCategory::HistoricPrice | DataCategory::Dividends, RawRecord::Series(series)) => {
            normalize_series(series)
        }
        _ => Err(ShapeError::UnexpectedShape {
            category,
            expected: category.raw_shape(),
            found: record.shape(),
        }),
    }
}
