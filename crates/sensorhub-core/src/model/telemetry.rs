use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sensor Telemetry - the latest reading for one sensor
///
/// Lives in the Telemetry Cache as a single serialized value; no history
/// is kept and last write wins. A sensor may legitimately have no reading
/// at all (registered but never reported).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    /// When the sensor last reported
    pub last_seen: DateTime<Utc>,

    /// Temperature in degrees Celsius
    pub temperature: f64,

    /// Relative humidity in percent
    pub humidity: f64,

    /// Battery level in percent
    pub battery_level: f64,

    /// Velocity in m/s, for mobile sensors only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
}

impl TelemetryReading {
    /// Serialize the whole reading for a single atomic cache write
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize a cached value back into a reading
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
