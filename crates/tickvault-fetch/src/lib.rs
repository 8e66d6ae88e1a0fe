//! Yahoo Finance client and response parsing for the tickvault pipeline.
//!
//! This crate provides the raw fetcher:
//!
//! - [`url`] - Constructs quoteSummary, chart and crumb URLs
//! - [`YahooClient`] - HTTP client with cookie store and cached crumb
//! - [`parse`] - Converts JSON responses into raw records
//! - [`Provider`] - The fetch contract the pipeline depends on

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod parse;
mod provider;
pub mod url;

pub use client::{BROWSER_USER_AGENT, ClientConfig, YahooClient};
pub use provider::Provider;
