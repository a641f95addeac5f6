use chrono::{TimeZone, Utc};
use sensorhub_core::stores::{MemoryIdentityStore, MemoryMetadataStore, MemoryTelemetryCache};
use sensorhub_core::{GeoPoint, SensorCoordinator, SensorSpec, TelemetryReading};

/// Coordinator over the in-memory reference stores
pub type MemoryCoordinator =
    SensorCoordinator<MemoryIdentityStore, MemoryMetadataStore, MemoryTelemetryCache>;

/// Coordinator plus handles to the underlying stores
///
/// The handles share state with the coordinator's clones, so tests can
/// inspect raw store contents or seed inconsistencies directly.
pub struct Fixture {
    pub coordinator: MemoryCoordinator,
    pub identity: MemoryIdentityStore,
    pub metadata: MemoryMetadataStore,
    pub telemetry: MemoryTelemetryCache,
}

#[allow(dead_code)]
pub fn fixture() -> Fixture {
    let identity = MemoryIdentityStore::new();
    let metadata = MemoryMetadataStore::new();
    let telemetry = MemoryTelemetryCache::new();
    Fixture {
        coordinator: SensorCoordinator::new(
            identity.clone(),
            metadata.clone(),
            telemetry.clone(),
        ),
        identity,
        metadata,
        telemetry,
    }
}

/// Registration input for a sensor at the given location
#[allow(dead_code)]
pub fn spec_at(name: &str, latitude: f64, longitude: f64) -> SensorSpec {
    SensorSpec {
        name: name.to_string(),
        kind: "temperature".to_string(),
        mac_address: "00:1B:44:11:3A:B7".to_string(),
        manufacturer: "Acme".to_string(),
        model: "T-1000".to_string(),
        serie_number: format!("SN-{}", name),
        firmware_version: "1.2.3".to_string(),
        location: GeoPoint::new(latitude, longitude),
    }
}

/// A fixed reading with a deterministic timestamp
#[allow(dead_code)]
pub fn reading(temperature: f64) -> TelemetryReading {
    TelemetryReading {
        last_seen: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        temperature,
        humidity: 40.0,
        battery_level: 87.0,
        velocity: None,
    }
}
