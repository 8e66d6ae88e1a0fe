//! Append-only diagnostic log for caught write failures.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tickvault_types::DestinationName;
use uuid::Uuid;

use crate::WriteError;

/// Sink for write failures that are recorded instead of raised.
///
/// Each entry is one line:
/// `<rfc3339 utc> run=<uuid> destination="<name>" kind=<kind> <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLog {
    path: Option<PathBuf>,
}

impl DiagnosticLog {
    /// Appends entries to the file at `path`, creating it on first use.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Drops every entry.
    #[must_use]
    pub const fn discard() -> Self {
        Self { path: None }
    }

    /// Returns the log file path, or `None` for a discarding log.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends one entry for a failed write.
    ///
    /// A failure to append is traced and otherwise ignored.
    pub fn record(&self, run_id: Uuid, name: &DestinationName, error: &WriteError) {
        let Some(path) = &self.path else {
            return;
        };
        let line = format_entry(Utc::now(), run_id, name, error);
        let appended = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(err) = appended {
            tracing::error!(path = %path.display(), error = %err, "failed to append diagnostic entry");
        }
    }
}

fn format_entry(at: DateTime<Utc>, run_id: Uuid, name: &DestinationName, error: &WriteError) -> String {
    format!(
        "{} run={run_id} destination=\"{name}\" kind={} {error}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true),
        error.kind(),
    )
}
