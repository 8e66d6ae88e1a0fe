//! Run command implementation.
//!
//! This module handles one fetch, normalize and store run for a ticker and category.

use crate::settings::Settings;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tickvault_lib::prelude::*;

/// Parse the arguments and execute a run.
pub(crate) async fn run(ticker: &str, category: &str, settings: &Settings, quiet: bool) -> Result<()> {
    let ticker = Ticker::new(ticker).with_context(|| format!("Invalid ticker: {ticker}"))?;
    let category: DataCategory = category.parse()?;
    execute(&ticker, category, settings, quiet).await
}

/// Execute a run and print the outcome.
///
/// A failed write is not an error: it is already in the diagnostic log.
pub(crate) async fn execute(
    ticker: &Ticker,
    category: DataCategory,
    settings: &Settings,
    quiet: bool,
) -> Result<()> {
    let pipeline = Pipeline::new(
        settings.client()?,
        settings.store.clone(),
        settings.diagnostic_log.clone(),
    );

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {} for {ticker}", category.description()));
        pb
    };

    let result = pipeline.run(ticker, category).await;
    spinner.finish_and_clear();

    let report = result.with_context(|| format!("Failed to store {category} for {ticker}"))?;
    match success_message(&report) {
        Some(message) => println!("{message}"),
        None => tracing::warn!(
            run_id = %report.run_id,
            destination = %report.destination,
            "table was not created, see the diagnostic log"
        ),
    }
    Ok(())
}

/// Returns the stdout line for a run, or `None` when the write failed.
fn success_message(report: &RunReport) -> Option<String> {
    report
        .outcome
        .is_materialized()
        .then(|| format!("Table {} created successfully.", report.destination))
}
