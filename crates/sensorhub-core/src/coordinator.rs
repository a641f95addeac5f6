//! Sensor Coordinator - cross-store orchestration
//!
//! Creates, reads, updates, and deletes a sensor's three facets (identity,
//! metadata, telemetry) as one logical entity without a distributed
//! transaction. Multi-step writes are sagas: ordered store calls with
//! explicit compensation on partial failure.
//!
//! Store calls within one invocation run sequentially; the read-path
//! fetches in [`get_sensor`](SensorCoordinator::get_sensor) and
//! [`get_sensors_near`](SensorCoordinator::get_sensors_near) are
//! independent and safe to parallelize, but are issued in resolution
//! order here since every other key derives from the identity row.

use std::time::Instant;

use sensorhub_core_types::RequestContext;
use tracing::{error, warn};

use crate::errors::{Result, SensorHubError, StoreKind};
use crate::geo::NearMode;
use crate::keys::telemetry_key;
use crate::model::{
    GeoPoint, SensorId, SensorIdentity, SensorRef, SensorSpec, SensorView, TelemetryReading,
};
use crate::stores::{IdentityStore, MetadataStore, TelemetryCache};
use crate::{log_op_end, log_op_error, log_op_start};

/// Orchestrates the three backing stores behind one sensor-level API
///
/// Holds no mutable state of its own; the injected store handles are
/// shared across concurrent invocations. There is no cross-store
/// isolation between concurrent writes to the same sensor name; the
/// Identity Store's unique-name constraint is what rejects the second
/// of two racing creates.
pub struct SensorCoordinator<I, M, T> {
    identity: I,
    metadata: M,
    telemetry: T,
}

impl<I, M, T> SensorCoordinator<I, M, T>
where
    I: IdentityStore,
    M: MetadataStore,
    T: TelemetryCache,
{
    /// Create a coordinator over the three injected store handles
    pub fn new(identity: I, metadata: M, telemetry: T) -> Self {
        Self {
            identity,
            metadata,
            telemetry,
        }
    }

    /// Register a new sensor: identity row plus metadata document
    ///
    /// On metadata-insert failure after the identity row was created, the
    /// identity row is rolled back so no orphan survives the failed
    /// create, and the metadata failure is surfaced.
    ///
    /// # Errors
    /// * `InvalidName` / `InvalidCoordinates` - input validation
    /// * `DuplicateName` - the name is already registered
    /// * `StoreUnavailable` - a store call failed or the deadline elapsed
    pub fn create_sensor(&self, ctx: &RequestContext, spec: SensorSpec) -> Result<SensorView> {
        let started = Instant::now();
        log_op_start!(
            "create_sensor",
            request_id = %ctx.request_id,
            sensor_name = %spec.name
        );
        let result = self.create_sensor_inner(ctx, spec);
        match &result {
            Ok(view) => {
                log_op_end!(
                    "create_sensor",
                    duration_ms = started.elapsed().as_millis() as u64,
                    sensor_id = view.id
                );
            }
            Err(err) => {
                log_op_error!(
                    "create_sensor",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn create_sensor_inner(&self, ctx: &RequestContext, spec: SensorSpec) -> Result<SensorView> {
        if spec.name.trim().is_empty() {
            return Err(SensorHubError::InvalidName {
                reason: "name cannot be empty or whitespace-only".to_string(),
            });
        }
        if !spec.location.is_valid() {
            return Err(SensorHubError::InvalidCoordinates {
                latitude: spec.location.latitude,
                longitude: spec.location.longitude,
            });
        }

        self.check_deadline(ctx, StoreKind::Identity, "get_by_name")?;
        if self.identity.get_by_name(&spec.name)?.is_some() {
            return Err(SensorHubError::DuplicateName { name: spec.name });
        }

        self.check_deadline(ctx, StoreKind::Identity, "insert")?;
        let identity = self.identity.insert(&spec.name)?;

        let doc = spec.into_document(identity.id);
        let insert_result = self
            .check_deadline(ctx, StoreKind::Metadata, "insert")
            .and_then(|()| self.metadata.insert(&doc));
        if let Err(insert_err) = insert_result {
            // Saga compensation: the identity row must not outlive the
            // failed create. Rollback runs even if the deadline elapsed.
            match self.identity.delete(identity.id) {
                Ok(_) => warn!(
                    sensor_id = identity.id,
                    "rolled back identity row after metadata insert failure"
                ),
                Err(rollback_err) => error!(
                    sensor_id = identity.id,
                    %rollback_err,
                    "identity rollback failed, orphan identity row left behind"
                ),
            }
            return Err(insert_err);
        }

        Ok(SensorView::assemble(identity, doc, None))
    }

    /// Overwrite the cached reading for a sensor (last write wins)
    ///
    /// # Errors
    /// * `SensorNotFound` - the referenced sensor is not registered
    /// * `Serialization` - the reading could not be encoded
    /// * `StoreUnavailable` - a store call failed or the deadline elapsed
    pub fn record_telemetry(
        &self,
        ctx: &RequestContext,
        sensor_ref: &SensorRef,
        reading: &TelemetryReading,
    ) -> Result<()> {
        let started = Instant::now();
        log_op_start!(
            "record_telemetry",
            request_id = %ctx.request_id,
            sensor_ref = %sensor_ref
        );
        let result = self.record_telemetry_inner(ctx, sensor_ref, reading);
        match &result {
            Ok(()) => {
                log_op_end!(
                    "record_telemetry",
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
            Err(err) => {
                log_op_error!(
                    "record_telemetry",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn record_telemetry_inner(
        &self,
        ctx: &RequestContext,
        sensor_ref: &SensorRef,
        reading: &TelemetryReading,
    ) -> Result<()> {
        let identity = self.resolve_identity(ctx, sensor_ref)?;

        let payload =
            reading
                .encode()
                .map_err(|err| SensorHubError::TelemetrySerialization {
                    sensor_id: identity.id,
                    reason: err.to_string(),
                })?;

        self.check_deadline(ctx, StoreKind::Telemetry, "set")?;
        // One atomic set of the whole serialized reading; never
        // field-by-field, so readers cannot observe a mixed reading.
        self.telemetry.set(&telemetry_key(identity.id), &payload)
    }

    /// Assemble the Composite Sensor View for one sensor
    ///
    /// Telemetry absence or cache failure degrades to the "no data"
    /// sentinel; a missing metadata document is a referential-invariant
    /// violation and fails the read.
    ///
    /// # Errors
    /// * `SensorNotFound` - the referenced sensor is not registered
    /// * `Inconsistent` - the identity row has no metadata document
    /// * `StoreUnavailable` - identity/metadata call failed or deadline elapsed
    pub fn get_sensor(&self, ctx: &RequestContext, sensor_ref: &SensorRef) -> Result<SensorView> {
        let started = Instant::now();
        log_op_start!(
            "get_sensor",
            request_id = %ctx.request_id,
            sensor_ref = %sensor_ref
        );
        let result = self.get_sensor_inner(ctx, sensor_ref);
        match &result {
            Ok(view) => {
                log_op_end!(
                    "get_sensor",
                    duration_ms = started.elapsed().as_millis() as u64,
                    sensor_id = view.id
                );
            }
            Err(err) => {
                log_op_error!(
                    "get_sensor",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn get_sensor_inner(&self, ctx: &RequestContext, sensor_ref: &SensorRef) -> Result<SensorView> {
        let identity = self.resolve_identity(ctx, sensor_ref)?;

        self.check_deadline(ctx, StoreKind::Metadata, "find_by_id")?;
        let metadata = self.metadata.find_by_id(identity.id)?.ok_or_else(|| {
            SensorHubError::Inconsistent {
                sensor_ref: sensor_ref.to_string(),
                detail: format!("identity row {} has no metadata document", identity.id),
            }
        })?;

        let telemetry = self.fetch_telemetry(ctx, identity.id);
        Ok(SensorView::assemble(identity, metadata, telemetry))
    }

    /// Return a view for every sensor whose location falls within the radius
    ///
    /// `Spherical` mode: radius in meters, results nearest-first.
    /// `BoundingBox` mode: radius in degrees, unordered.
    ///
    /// A candidate document whose identity row is missing is a
    /// referential inconsistency: it is logged and skipped, never fatal
    /// to the whole query.
    ///
    /// # Errors
    /// * `InvalidCoordinates` / `InvalidRadius` - input validation
    /// * `StoreUnavailable` - a store call failed or the deadline elapsed
    pub fn get_sensors_near(
        &self,
        ctx: &RequestContext,
        center: GeoPoint,
        radius: f64,
        mode: NearMode,
    ) -> Result<Vec<SensorView>> {
        let started = Instant::now();
        log_op_start!(
            "get_sensors_near",
            request_id = %ctx.request_id,
            latitude = center.latitude,
            longitude = center.longitude,
            radius = radius
        );
        let result = self.get_sensors_near_inner(ctx, center, radius, mode);
        match &result {
            Ok(views) => {
                log_op_end!(
                    "get_sensors_near",
                    duration_ms = started.elapsed().as_millis() as u64,
                    matches = views.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "get_sensors_near",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn get_sensors_near_inner(
        &self,
        ctx: &RequestContext,
        center: GeoPoint,
        radius: f64,
        mode: NearMode,
    ) -> Result<Vec<SensorView>> {
        if !center.is_valid() {
            return Err(SensorHubError::InvalidCoordinates {
                latitude: center.latitude,
                longitude: center.longitude,
            });
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(SensorHubError::InvalidRadius { radius });
        }

        self.check_deadline(ctx, StoreKind::Metadata, "find_near")?;
        let candidates = self.metadata.find_near(center, radius, mode)?;

        let mut views = Vec::with_capacity(candidates.len());
        for doc in candidates {
            self.check_deadline(ctx, StoreKind::Identity, "get_by_id")?;
            match self.identity.get_by_id(doc.sensor_id)? {
                Some(identity) => {
                    let telemetry = self.fetch_telemetry(ctx, identity.id);
                    views.push(SensorView::assemble(identity, doc, telemetry));
                }
                None => {
                    // Orphan document: skip, the rest of the result set is fine
                    warn!(
                        sensor_id = doc.sensor_id,
                        "skipping metadata document with no identity row"
                    );
                }
            }
        }
        Ok(views)
    }

    /// Remove all three facets of a sensor
    ///
    /// Deletion order: telemetry, then metadata, then identity. The
    /// identity row is the commit point that makes the sensor logically
    /// gone, so it is deleted only after the other two deletions have
    /// been attempted; their failures are logged and never stop the saga
    /// (a dangling metadata/telemetry record for a dead sensor is
    /// recoverable garbage, a dangling identity row is not).
    ///
    /// # Errors
    /// * `SensorNotFound` - the referenced sensor is not registered
    /// * `StoreUnavailable` - identity resolution or deletion failed
    pub fn delete_sensor(
        &self,
        ctx: &RequestContext,
        sensor_ref: &SensorRef,
    ) -> Result<SensorIdentity> {
        let started = Instant::now();
        log_op_start!(
            "delete_sensor",
            request_id = %ctx.request_id,
            sensor_ref = %sensor_ref
        );
        let result = self.delete_sensor_inner(ctx, sensor_ref);
        match &result {
            Ok(identity) => {
                log_op_end!(
                    "delete_sensor",
                    duration_ms = started.elapsed().as_millis() as u64,
                    sensor_id = identity.id
                );
            }
            Err(err) => {
                log_op_error!(
                    "delete_sensor",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn delete_sensor_inner(
        &self,
        ctx: &RequestContext,
        sensor_ref: &SensorRef,
    ) -> Result<SensorIdentity> {
        // NotFound before any deletion is attempted
        let identity = self.resolve_identity(ctx, sensor_ref)?;

        // Once deletion starts the saga runs to completion; an elapsed
        // deadline must not strand a dangling identity row.
        if let Err(err) = self.telemetry.delete(&telemetry_key(identity.id)) {
            warn!(
                sensor_id = identity.id,
                %err,
                "telemetry delete failed, continuing delete saga"
            );
        }
        if let Err(err) = self.metadata.delete(identity.id) {
            warn!(
                sensor_id = identity.id,
                %err,
                "metadata delete failed, continuing delete saga"
            );
        }

        if !self.identity.delete(identity.id)? {
            // Row vanished between resolution and deletion
            return Err(SensorHubError::SensorNotFound {
                sensor_ref: sensor_ref.to_string(),
            });
        }
        Ok(identity)
    }

    /// List registered sensors in id order (identity facet only)
    ///
    /// # Errors
    /// * `StoreUnavailable` - the identity call failed or the deadline elapsed
    pub fn list_sensors(
        &self,
        ctx: &RequestContext,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SensorIdentity>> {
        let started = Instant::now();
        log_op_start!("list_sensors", request_id = %ctx.request_id);
        let result = self.list_sensors_inner(ctx, offset, limit);
        match &result {
            Ok(rows) => {
                log_op_end!(
                    "list_sensors",
                    duration_ms = started.elapsed().as_millis() as u64,
                    matches = rows.len()
                );
            }
            Err(err) => {
                log_op_error!(
                    "list_sensors",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
        result
    }

    fn list_sensors_inner(
        &self,
        ctx: &RequestContext,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<SensorIdentity>> {
        self.check_deadline(ctx, StoreKind::Identity, "list")?;
        self.identity.list(offset, limit)
    }

    /// Resolve a sensor reference to its identity row
    fn resolve_identity(
        &self,
        ctx: &RequestContext,
        sensor_ref: &SensorRef,
    ) -> Result<SensorIdentity> {
        self.check_deadline(ctx, StoreKind::Identity, "get")?;
        let found = match sensor_ref {
            SensorRef::Id(id) => self.identity.get_by_id(*id)?,
            SensorRef::Name(name) => self.identity.get_by_name(name)?,
        };
        found.ok_or_else(|| SensorHubError::SensorNotFound {
            sensor_ref: sensor_ref.to_string(),
        })
    }

    /// Fetch the non-essential telemetry facet
    ///
    /// Absence, cache unavailability, an elapsed deadline, and a corrupt
    /// cached value all degrade to the "no data" sentinel.
    fn fetch_telemetry(&self, ctx: &RequestContext, id: SensorId) -> Option<TelemetryReading> {
        if ctx.deadline_elapsed() {
            warn!(
                sensor_id = id,
                "deadline elapsed before telemetry fetch, returning no-data sentinel"
            );
            return None;
        }
        match self.telemetry.get(&telemetry_key(id)) {
            Ok(Some(raw)) => match TelemetryReading::decode(&raw) {
                Ok(reading) => Some(reading),
                Err(err) => {
                    warn!(
                        sensor_id = id,
                        %err,
                        "corrupt cached telemetry value, returning no-data sentinel"
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(
                    sensor_id = id,
                    %err,
                    "telemetry cache unavailable, returning no-data sentinel"
                );
                None
            }
        }
    }

    /// Fail fast with the StoreUnavailable kind once the deadline passes
    fn check_deadline(&self, ctx: &RequestContext, store: StoreKind, op: &str) -> Result<()> {
        if ctx.deadline_elapsed() {
            return Err(SensorHubError::DeadlineExceeded {
                store,
                op: op.to_string(),
            });
        }
        Ok(())
    }
}
