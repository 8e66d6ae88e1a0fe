//! Connection acquisition contract for destination stores.

use tickvault_types::{DestinationName, NormalizedTable};

use crate::WriteError;

/// Hands out exclusive connections to a destination store.
pub trait ConnectionProvider {
    /// Connection type produced by [`acquire`](Self::acquire).
    type Connection: StoreConnection;

    /// Opens a connection.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] if the destination cannot be reached or opened.
    fn acquire(&self) -> Result<Self::Connection, WriteError>;
}

/// An open connection able to persist one table as a new relation.
pub trait StoreConnection {
    /// Creates the relation `name` and inserts every row of `table`.
    ///
    /// Either the whole table is persisted or nothing is.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] if the relation exists, a value cannot be
    /// converted, or the engine rejects the write.
    fn materialize(&mut self, name: &DestinationName, table: &NormalizedTable) -> Result<(), WriteError>;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] if the engine fails to close cleanly.
    fn release(self) -> Result<(), WriteError>;
}
