//! Redis Telemetry Cache
//!
//! Whole-value SET/GET/DEL for the latest serialized reading per sensor.
//! The coordinator owns the key scheme and the value codec; this backend
//! only moves opaque strings.

use std::sync::{Mutex, MutexGuard, PoisonError};

use redis::Commands;
use sensorhub_core::errors::Result;
use sensorhub_core::stores::TelemetryCache;

use crate::errors::redis_unavailable;

/// Telemetry Cache backed by a Redis connection
pub struct RedisTelemetryCache {
    conn: Mutex<redis::Connection>,
}

impl RedisTelemetryCache {
    /// Connect to a Redis server, e.g. `redis://127.0.0.1/`
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|err| redis_unavailable("connect", err))?;
        let conn = client
            .get_connection()
            .map_err(|err| redis_unavailable("connect", err))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, redis::Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TelemetryCache for RedisTelemetryCache {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.lock();
        conn.set::<_, _, ()>(key, value)
            .map_err(|err| redis_unavailable("set", err))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.lock();
        conn.get::<_, Option<String>>(key)
            .map_err(|err| redis_unavailable("get", err))
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.lock();
        let removed: i64 = conn
            .del(key)
            .map_err(|err| redis_unavailable("delete", err))?;
        Ok(removed > 0)
    }
}
