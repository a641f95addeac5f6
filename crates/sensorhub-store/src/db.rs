//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections for
//! the identity and metadata backends. The two stores open independent
//! connections (typically to independent database files); nothing here
//! assumes they share a schema.

use crate::errors::{sqlite_unavailable, Result};
use rusqlite::Connection;
use sensorhub_core::errors::StoreKind;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(store: StoreKind, path: P) -> Result<Connection> {
    Connection::open(path).map_err(|err| sqlite_unavailable(store, "open", err))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory(store: StoreKind) -> Result<Connection> {
    Connection::open_in_memory().map_err(|err| sqlite_unavailable(store, "open", err))
}

/// Configure a connection with the settings every backend expects
pub fn configure(store: StoreKind, conn: &Connection) -> Result<()> {
    // Enable foreign keys
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(|err| sqlite_unavailable(store, "configure", err))?;

    // WAL mode for better concurrency; the pragma reports the resulting
    // mode as a row, so it must be read rather than executed
    conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
        .map_err(|err| sqlite_unavailable(store, "configure", err))?;

    // Bounded waits on a locked database instead of immediate SQLITE_BUSY
    conn.query_row("PRAGMA busy_timeout = 5000", [], |_row| Ok(()))
        .map_err(|err| sqlite_unavailable(store, "configure", err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_and_configure() {
        let conn = open_in_memory(StoreKind::Identity).unwrap();
        configure(StoreKind::Identity, &conn).unwrap();
    }
}
