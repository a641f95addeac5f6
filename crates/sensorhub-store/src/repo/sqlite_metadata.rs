//! SQLite Metadata Store
//!
//! A document collection over SQLite: the full metadata document is one
//! JSON column, with latitude/longitude extracted into indexed columns
//! so proximity queries can prefilter in SQL before the exact
//! great-circle refine.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OptionalExtension};
use sensorhub_core::errors::{Result, StoreKind};
use sensorhub_core::geo::{degree_bounds, haversine_distance, NearMode};
use sensorhub_core::model::{GeoPoint, SensorId, SensorMetadata};
use sensorhub_core::stores::MetadataStore;

use crate::db;
use crate::errors::{metadata_codec, sqlite_unavailable};
use crate::migrations::{apply_migrations, metadata_migrations};

const STORE: StoreKind = StoreKind::Metadata;

/// Metadata Store backed by a SQLite document collection
pub struct SqliteMetadataStore {
    conn: Mutex<Connection>,
}

impl SqliteMetadataStore {
    /// Open (and migrate) the metadata database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(STORE, path)?;
        db::configure(STORE, &conn)?;
        apply_migrations(&mut conn, STORE, &metadata_migrations())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory metadata database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory(STORE)?;
        db::configure(STORE, &conn)?;
        apply_migrations(&mut conn, STORE, &metadata_migrations())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decode the candidate documents matched by a window query
    fn query_window(
        conn: &Connection,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Result<Vec<SensorMetadata>> {
        let mut stmt = conn
            .prepare(
                "SELECT doc FROM metadata_docs
                 WHERE latitude BETWEEN ?1 AND ?2 AND longitude BETWEEN ?3 AND ?4
                 ORDER BY sensor_id",
            )
            .map_err(|err| sqlite_unavailable(STORE, "find_near", err))?;

        let payloads = stmt
            .query_map(
                rusqlite::params![lat_min, lat_max, lon_min, lon_max],
                |row| row.get::<_, String>(0),
            )
            .map_err(|err| sqlite_unavailable(STORE, "find_near", err))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| sqlite_unavailable(STORE, "find_near", err))?;

        payloads
            .iter()
            .map(|payload| {
                serde_json::from_str(payload).map_err(|err| metadata_codec("find_near", err))
            })
            .collect()
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn insert(&self, doc: &SensorMetadata) -> Result<()> {
        let payload = serde_json::to_string(doc).map_err(|err| metadata_codec("insert", err))?;

        let conn = self.lock();
        conn.execute(
            "INSERT INTO metadata_docs (sensor_id, latitude, longitude, doc)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(sensor_id) DO UPDATE SET
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                doc = excluded.doc",
            rusqlite::params![
                doc.sensor_id,
                doc.location.latitude,
                doc.location.longitude,
                payload
            ],
        )
        .map_err(|err| sqlite_unavailable(STORE, "insert", err))?;

        Ok(())
    }

    fn find_by_id(&self, sensor_id: SensorId) -> Result<Option<SensorMetadata>> {
        let conn = self.lock();
        let payload: Option<String> = conn
            .query_row(
                "SELECT doc FROM metadata_docs WHERE sensor_id = ?1",
                [sensor_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| sqlite_unavailable(STORE, "find_by_id", err))?;

        payload
            .map(|payload| {
                serde_json::from_str(&payload).map_err(|err| metadata_codec("find_by_id", err))
            })
            .transpose()
    }

    fn find_near(
        &self,
        center: GeoPoint,
        radius: f64,
        mode: NearMode,
    ) -> Result<Vec<SensorMetadata>> {
        let conn = self.lock();
        match mode {
            NearMode::Spherical => {
                // SQL window prefilter, then exact great-circle refine
                let bounds = degree_bounds(&center, radius);
                let candidates = Self::query_window(
                    &conn,
                    bounds.lat_min,
                    bounds.lat_max,
                    bounds.lon_min,
                    bounds.lon_max,
                )?;

                let mut matches: Vec<(f64, SensorMetadata)> = candidates
                    .into_iter()
                    .filter_map(|doc| {
                        let distance = haversine_distance(&center, &doc.location);
                        (distance <= radius).then_some((distance, doc))
                    })
                    .collect();
                // Nearest-first, the ordering the spherical contract guarantees
                matches.sort_by(|a, b| a.0.total_cmp(&b.0));
                Ok(matches.into_iter().map(|(_, doc)| doc).collect())
            }
            NearMode::BoundingBox => Self::query_window(
                &conn,
                center.latitude - radius,
                center.latitude + radius,
                center.longitude - radius,
                center.longitude + radius,
            ),
        }
    }

    fn delete(&self, sensor_id: SensorId) -> Result<bool> {
        let conn = self.lock();
        let removed = conn
            .execute("DELETE FROM metadata_docs WHERE sensor_id = ?1", [sensor_id])
            .map_err(|err| sqlite_unavailable(STORE, "delete", err))?;
        Ok(removed > 0)
    }
}
