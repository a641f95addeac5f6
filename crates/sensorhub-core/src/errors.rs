use thiserror::Error;

use crate::model::SensorId;

/// Result type alias using SensorHubError
pub type Result<T> = std::result::Result<T, SensorHubError>;

/// The three backing stores, named in errors and structured logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Relational system of record for sensor existence
    Identity,
    /// Document system holding descriptive/geospatial attributes
    Metadata,
    /// Key-value system holding the latest reading only
    Telemetry,
}

impl StoreKind {
    /// Get the stable store name used in errors and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Identity => "identity",
            StoreKind::Metadata => "metadata",
            StoreKind::Telemetry => "telemetry",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the SensorHub repository layer. Each kind maps to a stable error code
/// that can be used for programmatic error handling, testing, and external
/// API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced sensor or facet absent where required
    NotFound,
    /// Duplicate name on create
    Conflict,
    /// A backing store failed or timed out
    StoreUnavailable,
    /// Referential-invariant violation detected at read time
    Inconsistent,
    /// Validation failure on caller-supplied input
    InvalidInput,
    /// Encoding or decoding of a stored value failed
    Serialization,
    /// Unclassified internal failure
    Internal,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "ERR_NOT_FOUND",
            ErrorKind::Conflict => "ERR_CONFLICT",
            ErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ErrorKind::Inconsistent => "ERR_INCONSISTENT",
            ErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ErrorKind::Serialization => "ERR_SERIALIZATION",
            ErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Comprehensive error taxonomy for SensorHub operations
///
/// Store-level client errors are always wrapped into one of these variants
/// by the backend crates, never passed through raw.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorHubError {
    // ===== Lookup Errors =====
    /// Referenced sensor does not exist in the Identity Store
    #[error("Sensor not found: {sensor_ref}")]
    SensorNotFound { sensor_ref: String },

    // ===== Conflict Errors =====
    /// Sensor name already registered
    #[error("Sensor name already registered: {name}")]
    DuplicateName { name: String },

    // ===== Store Errors =====
    /// A backing store failed during an operation
    #[error("{store} store unavailable during {op}: {reason}")]
    StoreUnavailable {
        store: StoreKind,
        op: String,
        reason: String,
    },

    /// The caller-supplied deadline elapsed before a per-store call
    #[error("deadline elapsed before {op} call to {store} store")]
    DeadlineExceeded { store: StoreKind, op: String },

    // ===== Invariant Errors =====
    /// Cross-store reference invariant violated (orphan facet detected at read time)
    #[error("referential inconsistency for sensor {sensor_ref}: {detail}")]
    Inconsistent { sensor_ref: String, detail: String },

    // ===== Validation Errors =====
    /// Invalid sensor name (empty or whitespace-only)
    #[error("invalid sensor name: {reason}")]
    InvalidName { reason: String },

    /// Coordinates outside the WGS84 domain
    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Radius must be finite and non-negative
    #[error("invalid radius: {radius}")]
    InvalidRadius { radius: f64 },

    // ===== Codec Errors =====
    /// Telemetry reading could not be serialized for the cache
    #[error("telemetry serialization failed for sensor {sensor_id}: {reason}")]
    TelemetrySerialization { sensor_id: SensorId, reason: String },
}

impl SensorHubError {
    /// Classify this error into the canonical kind taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            SensorHubError::SensorNotFound { .. } => ErrorKind::NotFound,
            SensorHubError::DuplicateName { .. } => ErrorKind::Conflict,
            // Timeouts and hard store failures are the same kind to callers
            SensorHubError::StoreUnavailable { .. } | SensorHubError::DeadlineExceeded { .. } => {
                ErrorKind::StoreUnavailable
            }
            SensorHubError::Inconsistent { .. } => ErrorKind::Inconsistent,
            SensorHubError::InvalidName { .. }
            | SensorHubError::InvalidCoordinates { .. }
            | SensorHubError::InvalidRadius { .. } => ErrorKind::InvalidInput,
            SensorHubError::TelemetrySerialization { .. } => ErrorKind::Serialization,
        }
    }

    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kind_and_code() {
        let err = SensorHubError::SensorNotFound {
            sensor_ref: "name:s1".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "ERR_NOT_FOUND");
    }

    #[test]
    fn test_duplicate_name_is_conflict() {
        let err = SensorHubError::DuplicateName {
            name: "s1".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.code(), "ERR_CONFLICT");
    }

    #[test]
    fn test_deadline_maps_to_store_unavailable() {
        let err = SensorHubError::DeadlineExceeded {
            store: StoreKind::Metadata,
            op: "insert".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert_eq!(err.code(), "ERR_STORE_UNAVAILABLE");
    }

    #[test]
    fn test_store_unavailable_display_names_store_and_op() {
        let err = SensorHubError::StoreUnavailable {
            store: StoreKind::Telemetry,
            op: "set".to_string(),
            reason: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("telemetry"));
        assert!(msg.contains("set"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_validation_errors_share_kind() {
        let name_err = SensorHubError::InvalidName {
            reason: "empty".to_string(),
        };
        let coord_err = SensorHubError::InvalidCoordinates {
            latitude: 91.0,
            longitude: 0.0,
        };
        let radius_err = SensorHubError::InvalidRadius { radius: -1.0 };
        assert_eq!(name_err.kind(), ErrorKind::InvalidInput);
        assert_eq!(coord_err.kind(), ErrorKind::InvalidInput);
        assert_eq!(radius_err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_store_kind_names_are_distinct() {
        assert_ne!(StoreKind::Identity.as_str(), StoreKind::Metadata.as_str());
        assert_ne!(StoreKind::Metadata.as_str(), StoreKind::Telemetry.as_str());
    }
}
