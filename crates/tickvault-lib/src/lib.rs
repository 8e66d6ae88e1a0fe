//! Yahoo Finance to SQLite pipeline.
//!
//! This is a facade crate that re-exports functionality from the tickvault
//! workspace crates and provides the [`Pipeline`] that drives one run.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod pipeline;

pub use pipeline::{Pipeline, PipelineError, RunReport};

// Re-export core types
pub use tickvault_types::*;

// Re-export fetch functionality
pub use tickvault_fetch::{ClientConfig, Provider, YahooClient};

// Re-export normalization
pub use tickvault_normalize::{
    GENERAL_INFO_FIELDS, SERIES_INDEX, STATEMENT_INDEX, UNSAFE_SNAPSHOT_FIELDS, normalize,
    normalize_financials, normalize_general, normalize_series, normalize_snapshot,
};

// Re-export persistence
pub use tickvault_store::{
    ConnectionProvider, DiagnosticLog, SqliteConnection, SqliteStore, StoreConnection,
    WriteError, WriteOutcome, WriteState, write,
};

/// Prelude module for convenient imports.
///
/// ```
/// use tickvault_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tickvault_types::{
        DataCategory, DestinationName, NormalizedTable, ProviderError, RawRecord, ShapeError,
        Ticker, Value,
    };

    pub use tickvault_fetch::{ClientConfig, Provider, YahooClient};

    pub use tickvault_store::{DiagnosticLog, SqliteStore, WriteError, WriteOutcome};

    pub use crate::{Pipeline, PipelineError, RunReport};
}
