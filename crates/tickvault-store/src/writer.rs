//! The table writer: acquire, materialize, record, release.

use tickvault_types::{DestinationName, NormalizedTable};
use uuid::Uuid;

use crate::{ConnectionProvider, DiagnosticLog, StoreConnection, WriteError};

/// Lifecycle of one write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    /// Nothing acquired yet.
    Idle,
    /// A connection is held.
    ConnectionAcquired,
    /// The table was committed.
    Materialized,
    /// The attempt failed and was recorded.
    Failed,
    /// The connection was handed back.
    ConnectionReleased,
}

impl std::fmt::Display for WriteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::ConnectionAcquired => "connection_acquired",
            Self::Materialized => "materialized",
            Self::Failed => "failed",
            Self::ConnectionReleased => "connection_released",
        };
        f.write_str(s)
    }
}

/// Result of a write attempt. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum WriteOutcome {
    /// The relation was created with every row.
    Materialized {
        /// Relation name.
        name: DestinationName,
        /// Number of rows inserted.
        rows: usize,
    },
    /// The write was abandoned; nothing was persisted.
    Failed(WriteError),
}

impl WriteOutcome {
    /// Returns true if the table was persisted.
    #[must_use]
    pub const fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized { .. })
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&WriteError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Materialized { .. } => None,
        }
    }
}

fn transition(name: &DestinationName, from: WriteState, to: WriteState) -> WriteState {
    tracing::debug!(destination = %name, %from, %to, "write state");
    to
}

/// Persists `table` as a new relation called `name`.
///
/// Any [`WriteError`] is appended to `log` tagged with `run_id`, traced as a
/// warning and returned inside [`WriteOutcome::Failed`]. When a connection was
/// acquired it is released exactly once, whatever the outcome.
pub fn write<P: ConnectionProvider>(
    provider: &P,
    name: &DestinationName,
    table: &NormalizedTable,
    log: &DiagnosticLog,
    run_id: Uuid,
) -> WriteOutcome {
    let state = WriteState::Idle;

    let mut conn = match provider.acquire() {
        Ok(conn) => conn,
        Err(err) => {
            transition(name, state, WriteState::Failed);
            return fail(log, run_id, name, err);
        }
    };
    let state = transition(name, state, WriteState::ConnectionAcquired);

    let result = conn.materialize(name, table);
    let state = transition(
        name,
        state,
        if result.is_ok() {
            WriteState::Materialized
        } else {
            WriteState::Failed
        },
    );

    if let Err(err) = conn.release() {
        tracing::warn!(destination = %name, error = %err, "failed to release connection");
    }
    transition(name, state, WriteState::ConnectionReleased);

    match result {
        Ok(()) => WriteOutcome::Materialized {
            name: name.clone(),
            rows: table.len(),
        },
        Err(err) => fail(log, run_id, name, err),
    }
}

fn fail(log: &DiagnosticLog, run_id: Uuid, name: &DestinationName, err: WriteError) -> WriteOutcome {
    tracing::warn!(%run_id, destination = %name, kind = err.kind(), error = %err, "write failed");
    log.record(run_id, name, &err);
    WriteOutcome::Failed(err)
}
