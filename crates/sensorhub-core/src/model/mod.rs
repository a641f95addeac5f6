//! Domain models for SensorHub
//!
//! The three persisted facets of a sensor (identity, metadata, telemetry)
//! plus the transient composite view assembled on every read.

mod identity;
mod metadata;
mod telemetry;
mod view;

pub use identity::{SensorId, SensorIdentity, SensorRef};
pub use metadata::{GeoPoint, SensorMetadata, SensorSpec};
pub use telemetry::TelemetryReading;
pub use view::SensorView;
