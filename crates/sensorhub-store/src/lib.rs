//! Concrete store backends for SensorHub
//!
//! Implements the `sensorhub-core` store contracts:
//! - [`SqliteIdentityStore`]: relational identity table with a UNIQUE
//!   name constraint (the store-level guard against racing creates)
//! - [`SqliteMetadataStore`]: JSON document collection with extracted
//!   coordinate columns for proximity queries
//! - [`RedisTelemetryCache`]: whole-value SET/GET/DEL for the latest
//!   reading per sensor
//!
//! Schema setup goes through embedded, checksummed migrations applied
//! when a store is opened.

pub mod db;
pub mod errors;
pub mod migrations;
pub mod redis_cache;
pub mod repo;

pub use redis_cache::RedisTelemetryCache;
pub use repo::{SqliteIdentityStore, SqliteMetadataStore};
