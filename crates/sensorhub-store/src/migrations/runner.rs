//! Migration runner
//!
//! Applies migrations with checksums and idempotency: a migration that is
//! already recorded is skipped, a recorded migration whose SQL changed is
//! refused.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use sensorhub_core::errors::StoreKind;

use crate::errors::{checksum_mismatch, sqlite_unavailable, Result};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::Migration;

/// Apply all pending migrations to the given store's database
pub fn apply_migrations(
    conn: &mut Connection,
    store: StoreKind,
    migrations: &[Migration],
) -> Result<()> {
    create_schema_version_table(conn, store)?;

    for migration in migrations {
        apply_migration(conn, store, migration.id, migration.sql)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection, store: StoreKind) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            checksum TEXT NOT NULL,
            applied_at INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|err| sqlite_unavailable(store, "migrate", err))?;

    Ok(())
}

/// Apply one migration inside a transaction, recording its checksum
fn apply_migration(
    conn: &mut Connection,
    store: StoreKind,
    migration_id: &str,
    sql: &str,
) -> Result<()> {
    let checksum = compute_checksum(sql);

    let recorded: Option<String> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| sqlite_unavailable(store, "migrate", err))?;

    if let Some(recorded) = recorded {
        if recorded != checksum {
            return Err(checksum_mismatch(store, migration_id, &recorded, &checksum));
        }
        // Already applied with identical SQL
        return Ok(());
    }

    let tx = conn
        .transaction()
        .map_err(|err| sqlite_unavailable(store, "migrate", err))?;
    tx.execute_batch(sql)
        .map_err(|err| sqlite_unavailable(store, "migrate", err))?;
    tx.execute(
        "INSERT INTO schema_version (migration_id, checksum, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration_id, checksum, Utc::now().timestamp()],
    )
    .map_err(|err| sqlite_unavailable(store, "migrate", err))?;
    tx.commit()
        .map_err(|err| sqlite_unavailable(store, "migrate", err))?;

    tracing::debug!(store = store.as_str(), migration_id, "applied migration");
    Ok(())
}
