//! Key-naming conventions for the Telemetry Cache
//!
//! The cache holds one value per sensor under a key derived from the
//! generated sensor id. Backends never invent their own key scheme;
//! everything goes through [`telemetry_key`].

use crate::model::SensorId;

/// Build the cache key for a sensor's latest reading
///
/// Format: `sensor:{id}:data`
pub fn telemetry_key(sensor_id: SensorId) -> String {
    format!("sensor:{}:data", sensor_id)
}
