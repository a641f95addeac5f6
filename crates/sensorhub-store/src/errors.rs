//! Error handling for sensorhub-store
//!
//! Wraps client errors into the sensorhub-core taxonomy; raw rusqlite or
//! redis errors never cross the store boundary.

use sensorhub_core::errors::{SensorHubError, StoreKind};

/// Result type alias using SensorHubError
pub type Result<T> = sensorhub_core::errors::Result<T>;

/// Wrap a rusqlite error as store unavailability
pub fn sqlite_unavailable(store: StoreKind, op: &str, err: rusqlite::Error) -> SensorHubError {
    SensorHubError::StoreUnavailable {
        store,
        op: op.to_string(),
        reason: err.to_string(),
    }
}

/// Wrap a redis error as telemetry-store unavailability
pub fn redis_unavailable(op: &str, err: redis::RedisError) -> SensorHubError {
    SensorHubError::StoreUnavailable {
        store: StoreKind::Telemetry,
        op: op.to_string(),
        reason: err.to_string(),
    }
}

/// A metadata document column that fails to encode or decode
pub fn metadata_codec(op: &str, err: serde_json::Error) -> SensorHubError {
    SensorHubError::StoreUnavailable {
        store: StoreKind::Metadata,
        op: op.to_string(),
        reason: format!("document codec failure: {}", err),
    }
}

/// A migration that failed to apply
pub fn migration_error(store: StoreKind, migration_id: &str, reason: &str) -> SensorHubError {
    SensorHubError::StoreUnavailable {
        store,
        op: "migrate".to_string(),
        reason: format!("migration {} failed: {}", migration_id, reason),
    }
}

/// An applied migration whose recorded checksum no longer matches
pub fn checksum_mismatch(
    store: StoreKind,
    migration_id: &str,
    expected: &str,
    actual: &str,
) -> SensorHubError {
    SensorHubError::StoreUnavailable {
        store,
        op: "migrate".to_string(),
        reason: format!(
            "checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    }
}

/// Whether a rusqlite error is a constraint violation (UNIQUE, NOT NULL, ...)
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
