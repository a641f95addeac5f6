use chrono::{DateTime, Utc};
use serde::Serialize;

use super::identity::{SensorId, SensorIdentity};
use super::metadata::SensorMetadata;
use super::telemetry::TelemetryReading;

/// Composite Sensor View - identity + metadata + telemetry merged
///
/// A derived, transient value assembled on demand for read operations;
/// never persisted, rebuilt on every read. `telemetry: None` is the
/// explicit "no data yet" sentinel, not an error condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorView {
    /// Store-generated identifier
    pub id: SensorId,

    /// Unique human-assigned name
    pub name: String,

    /// Timestamp of registration
    pub joined_at: DateTime<Utc>,

    /// Descriptive attributes and geolocation
    pub metadata: SensorMetadata,

    /// Latest cached reading, or None if the sensor never reported
    pub telemetry: Option<TelemetryReading>,
}

impl SensorView {
    /// Merge the three facets into one view
    pub fn assemble(
        identity: SensorIdentity,
        metadata: SensorMetadata,
        telemetry: Option<TelemetryReading>,
    ) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            joined_at: identity.joined_at,
            metadata,
            telemetry,
        }
    }

    /// Whether the cache held a reading when this view was assembled
    pub fn has_telemetry(&self) -> bool {
        self.telemetry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GeoPoint;
    use chrono::TimeZone;

    fn metadata(sensor_id: SensorId) -> SensorMetadata {
        SensorMetadata {
            sensor_id,
            kind: "temperature".to_string(),
            mac_address: "00:00:00:00:00:01".to_string(),
            manufacturer: "Acme".to_string(),
            model: "T-1000".to_string(),
            serie_number: "SN-1".to_string(),
            firmware_version: "1.0".to_string(),
            location: GeoPoint::new(41.38, 2.17),
        }
    }

    #[test]
    fn test_assemble_without_telemetry() {
        let identity = SensorIdentity::new(3, "s1".to_string());
        let view = SensorView::assemble(identity, metadata(3), None);

        assert_eq!(view.id, 3);
        assert_eq!(view.name, "s1");
        assert_eq!(view.metadata.sensor_id, 3);
        assert!(!view.has_telemetry());
    }

    #[test]
    fn test_assemble_with_telemetry() {
        let identity = SensorIdentity::new(4, "s2".to_string());
        let reading = TelemetryReading {
            last_seen: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            temperature: 21.5,
            humidity: 40.0,
            battery_level: 87.0,
            velocity: Some(1.5),
        };

        let view = SensorView::assemble(identity, metadata(4), Some(reading.clone()));
        assert!(view.has_telemetry());
        assert_eq!(view.telemetry, Some(reading));
    }
}
