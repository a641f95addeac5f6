use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-generated sensor identifier
///
/// The Identity Store generates this value on registration; it is the
/// canonical cross-store reference linking the metadata document and the
/// telemetry cache key back to the identity row.
pub type SensorId = i64;

/// Sensor Identity - the canonical record of a sensor's existence
///
/// Lives in the relational Identity Store. Immutable except deletion;
/// the coordinator never mutates it outside create/delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorIdentity {
    /// Store-generated identifier
    pub id: SensorId,

    /// Unique human-assigned name
    pub name: String,

    /// Timestamp of registration
    pub joined_at: DateTime<Utc>,
}

impl SensorIdentity {
    /// Create an identity record with the current timestamp
    ///
    /// Backends call this once the store has generated the id.
    pub fn new(id: SensorId, name: String) -> Self {
        Self {
            id,
            name,
            joined_at: Utc::now(),
        }
    }
}

/// Reference to a sensor by generated id or by unique name
///
/// Every coordinator operation accepts either form. Name references are
/// resolved against the Identity Store only; once resolved, all
/// cross-store traffic uses the generated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SensorRef {
    /// Canonical reference by generated id
    Id(SensorId),
    /// Secondary lookup by unique name
    Name(String),
}

impl From<SensorId> for SensorRef {
    fn from(id: SensorId) -> Self {
        SensorRef::Id(id)
    }
}

impl From<&str> for SensorRef {
    fn from(name: &str) -> Self {
        SensorRef::Name(name.to_string())
    }
}

impl From<String> for SensorRef {
    fn from(name: String) -> Self {
        SensorRef::Name(name)
    }
}

impl std::fmt::Display for SensorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorRef::Id(id) => write!(f, "id:{}", id),
            SensorRef::Name(name) => write!(f, "name:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_identity() {
        let identity = SensorIdentity::new(7, "thermo-lab-1".to_string());

        assert_eq!(identity.id, 7);
        assert_eq!(identity.name, "thermo-lab-1");
        assert!(identity.joined_at <= Utc::now());
    }

    #[test]
    fn test_sensor_ref_from_id_and_name() {
        assert_eq!(SensorRef::from(42), SensorRef::Id(42));
        assert_eq!(SensorRef::from("s1"), SensorRef::Name("s1".to_string()));
    }

    #[test]
    fn test_sensor_ref_display() {
        assert_eq!(SensorRef::Id(42).to_string(), "id:42");
        assert_eq!(SensorRef::Name("s1".to_string()).to_string(), "name:s1");
    }
}
