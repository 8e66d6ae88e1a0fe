//! Resolution of destination, diagnostic log and timeout for a CLI run.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tickvault_lib::prelude::*;

/// Default database file name inside the data directory.
pub(crate) const DATABASE_FILE: &str = "stocks.db";

/// Default diagnostic log file name inside the data directory.
pub(crate) const DIAGNOSTIC_LOG_FILE: &str = "logfile.log";

/// Resolved run settings.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) store: SqliteStore,
    pub(crate) diagnostic_log: DiagnosticLog,
    pub(crate) timeout: Duration,
}

impl Settings {
    /// Resolves settings, filling unset values from the data directory.
    ///
    /// The data directory is created only when a default location is used.
    pub(crate) fn resolve(
        database: Option<&str>,
        diagnostic_log: Option<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self> {
        Self::resolve_in(&default_data_dir(), database, diagnostic_log, timeout_secs)
    }

    fn resolve_in(
        data_dir: &Path,
        database: Option<&str>,
        diagnostic_log: Option<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self> {
        if database.is_none() || diagnostic_log.is_none() {
            std::fs::create_dir_all(data_dir).with_context(|| {
                format!("Failed to create data directory {}", data_dir.display())
            })?;
        }

        let store = match database {
            Some(url) => SqliteStore::parse(url).with_context(|| format!("Invalid database: {url}"))?,
            None => SqliteStore::file(data_dir.join(DATABASE_FILE)),
        };
        let log_path = diagnostic_log.unwrap_or_else(|| data_dir.join(DIAGNOSTIC_LOG_FILE));

        Ok(Self {
            store,
            diagnostic_log: DiagnosticLog::file(log_path),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Builds the provider client for these settings.
    pub(crate) fn client(&self) -> Result<YahooClient> {
        let config = ClientConfig::default().with_timeout(self.timeout);
        YahooClient::new(config).context("Failed to build HTTP client")
    }
}

/// Returns the platform data directory, falling back to the working directory.
pub(crate) fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "tickvault")
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.data_dir().to_path_buf())
}
