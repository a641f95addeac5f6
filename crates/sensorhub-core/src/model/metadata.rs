use serde::{Deserialize, Serialize};

use super::identity::SensorId;

/// WGS84 point: latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude/longitude in decimal degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are finite and inside the WGS84 domain
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Sensor Metadata - extended descriptive attributes plus geolocation
///
/// Lives in the document Metadata Store, keyed by the generated sensor id.
/// Invariant: for every live SensorIdentity there is exactly one metadata
/// document with a matching `sensor_id`, and vice versa, once a create
/// completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMetadata {
    /// Canonical cross-store reference to the identity row
    pub sensor_id: SensorId,

    /// Device category, e.g. "temperature" or "multi"
    #[serde(rename = "type")]
    pub kind: String,

    /// Hardware MAC address
    pub mac_address: String,

    /// Device manufacturer
    pub manufacturer: String,

    /// Device model
    pub model: String,

    /// Manufacturer serial number
    pub serie_number: String,

    /// Installed firmware revision
    pub firmware_version: String,

    /// Installation location
    pub location: GeoPoint,
}

/// Everything a caller supplies to register a sensor
///
/// The generated id is not known until the Identity Store has inserted the
/// row; `into_document` stamps it onto the metadata document afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSpec {
    pub name: String,
    pub kind: String,
    pub mac_address: String,
    pub manufacturer: String,
    pub model: String,
    pub serie_number: String,
    pub firmware_version: String,
    pub location: GeoPoint,
}

impl SensorSpec {
    /// Build the metadata document for the freshly generated id
    pub fn into_document(self, sensor_id: SensorId) -> SensorMetadata {
        SensorMetadata {
            sensor_id,
            kind: self.kind,
            mac_address: self.mac_address,
            manufacturer: self.manufacturer,
            model: self.model,
            serie_number: self.serie_number,
            firmware_version: self.firmware_version,
            location: self.location,
        }
    }
}
