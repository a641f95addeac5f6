//! SQLite Identity Store
//!
//! The relational system of record for sensor existence: an
//! autoincrement id, a UNIQUE name, and the join timestamp stored as
//! epoch seconds.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use sensorhub_core::errors::{Result, SensorHubError, StoreKind};
use sensorhub_core::model::{SensorId, SensorIdentity};
use sensorhub_core::stores::IdentityStore;

use crate::db;
use crate::errors::{is_constraint_violation, sqlite_unavailable};
use crate::migrations::{apply_migrations, identity_migrations};

const STORE: StoreKind = StoreKind::Identity;

/// Identity Store backed by a SQLite database
///
/// The connection is shared across coordinator invocations behind a
/// mutex; per-call locking keeps the store usable from concurrent
/// request handlers.
pub struct SqliteIdentityStore {
    conn: Mutex<Connection>,
}

impl SqliteIdentityStore {
    /// Open (and migrate) the identity database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(STORE, path)?;
        db::configure(STORE, &conn)?;
        apply_migrations(&mut conn, STORE, &identity_migrations())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory identity database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory(STORE)?;
        db::configure(STORE, &conn)?;
        apply_migrations(&mut conn, STORE, &identity_migrations())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Epoch seconds back to a UTC timestamp
fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

impl IdentityStore for SqliteIdentityStore {
    fn insert(&self, name: &str) -> Result<SensorIdentity> {
        let conn = self.lock();
        let joined_ts = Utc::now().timestamp();

        let inserted = conn.execute(
            "INSERT INTO sensors (name, joined_at) VALUES (?1, ?2)",
            rusqlite::params![name, joined_ts],
        );
        match inserted {
            Ok(_) => Ok(SensorIdentity {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                joined_at: timestamp_to_datetime(joined_ts),
            }),
            Err(err) if is_constraint_violation(&err) => Err(SensorHubError::DuplicateName {
                name: name.to_string(),
            }),
            Err(err) => Err(sqlite_unavailable(STORE, "insert", err)),
        }
    }

    fn get_by_id(&self, id: SensorId) -> Result<Option<SensorIdentity>> {
        let conn = self.lock();
        let row: Option<(i64, String, i64)> = conn
            .query_row(
                "SELECT id, name, joined_at FROM sensors WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|err| sqlite_unavailable(STORE, "get_by_id", err))?;

        Ok(row.map(|(id, name, ts)| SensorIdentity {
            id,
            name,
            joined_at: timestamp_to_datetime(ts),
        }))
    }

    fn get_by_name(&self, name: &str) -> Result<Option<SensorIdentity>> {
        let conn = self.lock();
        let row: Option<(i64, String, i64)> = conn
            .query_row(
                "SELECT id, name, joined_at FROM sensors WHERE name = ?1",
                [name],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|err| sqlite_unavailable(STORE, "get_by_name", err))?;

        Ok(row.map(|(id, name, ts)| SensorIdentity {
            id,
            name,
            joined_at: timestamp_to_datetime(ts),
        }))
    }

    fn delete(&self, id: SensorId) -> Result<bool> {
        let conn = self.lock();
        let removed = conn
            .execute("DELETE FROM sensors WHERE id = ?1", [id])
            .map_err(|err| sqlite_unavailable(STORE, "delete", err))?;
        Ok(removed > 0)
    }

    fn list(&self, offset: u64, limit: u64) -> Result<Vec<SensorIdentity>> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare("SELECT id, name, joined_at FROM sensors ORDER BY id LIMIT ?1 OFFSET ?2")
            .map_err(|err| sqlite_unavailable(STORE, "list", err))?;

        let rows = stmt
            .query_map(
                rusqlite::params![limit as i64, offset as i64],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .map_err(|err| sqlite_unavailable(STORE, "list", err))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| sqlite_unavailable(STORE, "list", err))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, ts)| SensorIdentity {
                id,
                name,
                joined_at: timestamp_to_datetime(ts),
            })
            .collect())
    }
}
