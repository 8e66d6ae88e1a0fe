//! Core types for the tickvault market-data pipeline.
//!
//! This crate provides the data structures shared by every stage of the
//! fetch, normalize and persist pipeline:
//!
//! - [`Ticker`] - Upper-cased security identifier
//! - [`DataCategory`] - Which provider data set to retrieve
//! - [`Value`] - A single loosely-typed cell
//! - [`RawRecord`] - Provider response before normalization
//! - [`NormalizedTable`] - Rectangular table ready to be persisted
//! - [`DestinationName`] - Name of the relation a table is written to

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod category;
mod error;
mod record;
mod table;
mod ticker;
mod value;

pub use category::{CategoryParseError, DataCategory, RawShape};
pub use error::{ProviderError, ShapeError};
pub use record::{RawRecord, SeriesRow, Snapshot, StatementRow, StatementTable, Statements, TimeSeries};
pub use table::{DestinationName, IndexColumn, NormalizedTable};
pub use ticker::{Ticker, TickerError};
pub use value::Value;
