//! Collaborator contracts for the three backing stores
//!
//! The coordinator never reaches for ambient/global clients: it receives
//! implementations of these traits by constructor injection. Backends wrap
//! their client errors into the core taxonomy; raw client errors never
//! cross this boundary.
//!
//! Implementations are expected to be shareable across concurrent
//! coordinator invocations (interior mutability around the underlying
//! connection); the traits therefore take `&self`.

mod memory;

pub use memory::{MemoryIdentityStore, MemoryMetadataStore, MemoryTelemetryCache};

use crate::errors::Result;
use crate::geo::NearMode;
use crate::model::{GeoPoint, SensorId, SensorIdentity, SensorMetadata};

/// Relational system of record for sensor existence
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStore {
    /// Insert a new identity row, generating the id and join timestamp
    ///
    /// # Errors
    /// `DuplicateName` if the name is already registered (backends with a
    /// UNIQUE constraint), `StoreUnavailable` on client failure.
    fn insert(&self, name: &str) -> Result<SensorIdentity>;

    /// Fetch an identity row by generated id
    fn get_by_id(&self, id: SensorId) -> Result<Option<SensorIdentity>>;

    /// Fetch an identity row by unique name
    fn get_by_name(&self, name: &str) -> Result<Option<SensorIdentity>>;

    /// Delete an identity row; returns false if the row was absent
    fn delete(&self, id: SensorId) -> Result<bool>;

    /// List identity rows in id order
    fn list(&self, offset: u64, limit: u64) -> Result<Vec<SensorIdentity>>;
}

/// Document system holding descriptive/geospatial sensor attributes
#[cfg_attr(test, mockall::automock)]
pub trait MetadataStore {
    /// Insert a metadata document keyed by its `sensor_id`
    fn insert(&self, doc: &SensorMetadata) -> Result<()>;

    /// Fetch the document for one sensor id
    fn find_by_id(&self, sensor_id: SensorId) -> Result<Option<SensorMetadata>>;

    /// Proximity query around a center point
    ///
    /// `Spherical`: radius in meters, results nearest-first.
    /// `BoundingBox`: radius in degrees, no ordering guarantee.
    fn find_near(
        &self,
        center: GeoPoint,
        radius: f64,
        mode: NearMode,
    ) -> Result<Vec<SensorMetadata>>;

    /// Delete the document for one sensor id; returns false if absent
    fn delete(&self, sensor_id: SensorId) -> Result<bool>;
}

/// Key-value system holding the latest serialized reading per sensor
#[cfg_attr(test, mockall::automock)]
pub trait TelemetryCache {
    /// Overwrite the whole value under `key` (last write wins)
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Delete the value under `key`; returns false if the key was absent
    fn delete(&self, key: &str) -> Result<bool>;
}
