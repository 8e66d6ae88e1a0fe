//! SQLite destination backed by `rusqlite`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction, params_from_iter};
use tickvault_types::{DestinationName, NormalizedTable};

use crate::schema::{column_defs, create_table_sql, insert_sql, to_sql_value};
use crate::{ConnectionProvider, StoreConnection, WriteError};

const SCHEME: &str = "sqlite://";
const MEMORY: &str = "sqlite::memory:";

/// Default time to wait on a locked database.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Memory,
    File(PathBuf),
}

/// Connection provider for a SQLite database.
///
/// Every [`acquire`](ConnectionProvider::acquire) opens a fresh connection. An
/// in-memory store therefore starts empty on each acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStore {
    target: Target,
    read_only: bool,
    busy_timeout: Duration,
}

impl SqliteStore {
    /// Creates a store for a database file.
    ///
    /// The parent directory is never created; a missing one makes
    /// acquisition fail with [`WriteError::Connectivity`].
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::with_target(Target::File(path.into()))
    }

    /// Creates a store backed by a private in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_target(Target::Memory)
    }

    const fn with_target(target: Target) -> Self {
        Self {
            target,
            read_only: false,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Parses a connection string: `sqlite://<path>`, `sqlite::memory:` or a bare path.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Connectivity`] for an empty path.
    pub fn parse(connection_string: &str) -> Result<Self, WriteError> {
        let trimmed = connection_string.trim();
        if trimmed == MEMORY {
            return Ok(Self::in_memory());
        }
        let path = trimmed.strip_prefix(SCHEME).unwrap_or(trimmed);
        if path.is_empty() {
            return Err(WriteError::Connectivity(format!(
                "no database path in '{connection_string}'"
            )));
        }
        Ok(Self::file(path))
    }

    /// Opens connections read-only.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets how long to wait on a locked database.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Returns the database path, or `None` for an in-memory store.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            Target::File(path) => Some(path),
            Target::Memory => None,
        }
    }

    /// Returns true if connections are opened read-only.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn open_flags(&self) -> OpenFlags {
        let access = if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        };
        access | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX
    }
}

impl std::fmt::Display for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            Target::Memory => f.write_str(MEMORY),
            Target::File(path) => write!(f, "{SCHEME}{}", path.display()),
        }
    }
}

impl std::str::FromStr for SqliteStore {
    type Err = WriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl ConnectionProvider for SqliteStore {
    type Connection = SqliteConnection;

    fn acquire(&self) -> Result<Self::Connection, WriteError> {
        let conn = match &self.target {
            Target::Memory => Connection::open_in_memory_with_flags(self.open_flags())?,
            Target::File(path) => Connection::open_with_flags(path, self.open_flags())?,
        };
        conn.busy_timeout(self.busy_timeout)?;
        tracing::debug!(store = %self, read_only = self.read_only, "opened sqlite connection");
        Ok(SqliteConnection { conn })
    }
}

/// An open SQLite connection.
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Returns the underlying connection.
    #[must_use]
    pub const fn inner(&self) -> &Connection {
        &self.conn
    }
}

impl StoreConnection for SqliteConnection {
    fn materialize(&mut self, name: &DestinationName, table: &NormalizedTable) -> Result<(), WriteError> {
        let tx = self.conn.transaction()?;

        if relation_exists(&tx, name.as_str())? {
            return Err(WriteError::NameConflict(name.to_string()));
        }

        let columns = column_defs(table);
        tx.execute_batch(&create_table_sql(name.as_str(), &columns))?;

        {
            let mut stmt = tx.prepare(&insert_sql(name.as_str(), &columns))?;
            let index = table.index();
            for (position, row) in table.rows().iter().enumerate() {
                let mut params = Vec::with_capacity(columns.len());
                if let Some(index) = index {
                    params.push(match index.labels.get(position) {
                        Some(label) => to_sql_value(label, &index.name)?,
                        None => SqlValue::Null,
                    });
                }
                for (value, column) in row.iter().zip(table.columns()) {
                    params.push(to_sql_value(value, column)?);
                }
                stmt.execute(params_from_iter(params.iter()))?;
            }
        }

        tx.commit()?;
        tracing::debug!(destination = %name, rows = table.len(), "committed table");
        Ok(())
    }

    fn release(self) -> Result<(), WriteError> {
        self.conn.close().map_err(|(_, err)| WriteError::from(err))
    }
}

fn relation_exists(tx: &Transaction<'_>, name: &str) -> Result<bool, WriteError> {
    let found = tx
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            [name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
