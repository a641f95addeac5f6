//! SensorHub Core - cross-store coordination layer for an IoT sensor platform
//!
//! Each sensor has three facets split across three heterogeneous stores:
//! - a relational Identity Store (canonical existence record)
//! - a document Metadata Store (descriptive attributes + geolocation)
//! - a key-value Telemetry Cache (latest reading only)
//!
//! This crate provides:
//! - Domain models and the transient Composite Sensor View
//! - The store collaborator contracts plus in-memory implementations
//! - The [`SensorCoordinator`]: create/read/record/near/delete/list as
//!   saga-style multi-store operations with explicit compensation
//! - Geospatial helpers for the "sensors near a point" query
//! - The canonical error taxonomy and logging facility

pub mod coordinator;
pub mod errors;
pub mod geo;
pub mod keys;
pub mod logging_facility;
pub mod model;
pub mod stores;

// Re-export commonly used types
pub use coordinator::SensorCoordinator;
pub use errors::{ErrorKind, Result, SensorHubError, StoreKind};
pub use geo::NearMode;
pub use model::{
    GeoPoint, SensorId, SensorIdentity, SensorMetadata, SensorRef, SensorSpec, SensorView,
    TelemetryReading,
};
pub use stores::{IdentityStore, MetadataStore, TelemetryCache};
