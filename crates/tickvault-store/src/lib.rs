//! Table persistence for the tickvault pipeline.
//!
//! This crate writes normalized tables to a relational store:
//!
//! - [`write`] - Acquire, materialize and release, recording failures
//! - [`ConnectionProvider`] / [`StoreConnection`] - Backend contract
//! - [`SqliteStore`] - SQLite backend
//! - [`DiagnosticLog`] - Append-only log of caught write failures
//! - [`WriteError`] - Closed set of write failure kinds

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod connection;
mod diagnostic;
mod error;
pub mod schema;
mod sqlite;
mod writer;

pub use connection::{ConnectionProvider, StoreConnection};
pub use diagnostic::DiagnosticLog;
pub use error::WriteError;
pub use sqlite::{DEFAULT_BUSY_TIMEOUT, SqliteConnection, SqliteStore};
pub use writer::{WriteOutcome, WriteState, write};
