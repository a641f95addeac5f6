//! In-memory store implementations
//!
//! Map-backed implementations of the three store contracts. Handles are
//! cheap clones sharing one underlying map, mirroring how pooled client
//! connections are shared across coordinator invocations. Used as the
//! reference implementation in tests and small deployments.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use super::{IdentityStore, MetadataStore, TelemetryCache};
use crate::errors::{Result, SensorHubError};
use crate::geo::{haversine_distance, within_bounding_box, NearMode};
use crate::model::{GeoPoint, SensorId, SensorIdentity, SensorMetadata};

#[derive(Debug, Default)]
struct IdentityInner {
    next_id: SensorId,
    rows: BTreeMap<SensorId, SensorIdentity>,
}

/// Map-backed Identity Store
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    inner: Arc<Mutex<IdentityInner>>,
}

impl MemoryIdentityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn insert(&self, name: &str) -> Result<SensorIdentity> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        // Same unique-name guarantee the SQLite backend gets from its constraint
        if inner.rows.values().any(|row| row.name == name) {
            return Err(SensorHubError::DuplicateName {
                name: name.to_string(),
            });
        }
        inner.next_id += 1;
        let identity = SensorIdentity::new(inner.next_id, name.to_string());
        inner.rows.insert(identity.id, identity.clone());
        Ok(identity)
    }

    fn get_by_id(&self, id: SensorId) -> Result<Option<SensorIdentity>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.rows.get(&id).cloned())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<SensorIdentity>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.rows.values().find(|row| row.name == name).cloned())
    }

    fn delete(&self, id: SensorId) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner.rows.remove(&id).is_some())
    }

    fn list(&self, offset: u64, limit: u64) -> Result<Vec<SensorIdentity>> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .rows
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Map-backed Metadata Store
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    docs: Arc<Mutex<BTreeMap<SensorId, SensorMetadata>>>,
}

impl MemoryMetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn insert(&self, doc: &SensorMetadata) -> Result<()> {
        let mut docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        docs.insert(doc.sensor_id, doc.clone());
        Ok(())
    }

    fn find_by_id(&self, sensor_id: SensorId) -> Result<Option<SensorMetadata>> {
        let docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.get(&sensor_id).cloned())
    }

    fn find_near(
        &self,
        center: GeoPoint,
        radius: f64,
        mode: NearMode,
    ) -> Result<Vec<SensorMetadata>> {
        let docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        match mode {
            NearMode::Spherical => {
                let mut matches: Vec<(f64, SensorMetadata)> = docs
                    .values()
                    .filter_map(|doc| {
                        let distance = haversine_distance(&center, &doc.location);
                        (distance <= radius).then(|| (distance, doc.clone()))
                    })
                    .collect();
                // Nearest-first, the ordering the spherical contract guarantees
                matches.sort_by(|a, b| a.0.total_cmp(&b.0));
                Ok(matches.into_iter().map(|(_, doc)| doc).collect())
            }
            NearMode::BoundingBox => Ok(docs
                .values()
                .filter(|doc| within_bounding_box(&center, radius, &doc.location))
                .cloned()
                .collect()),
        }
    }

    fn delete(&self, sensor_id: SensorId) -> Result<bool> {
        let mut docs = self.docs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.remove(&sensor_id).is_some())
    }
}

/// Map-backed Telemetry Cache
#[derive(Debug, Clone, Default)]
pub struct MemoryTelemetryCache {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryTelemetryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetryCache for MemoryTelemetryCache {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(sensor_id: SensorId, latitude: f64, longitude: f64) -> SensorMetadata {
        SensorMetadata {
            sensor_id,
            kind: "temperature".to_string(),
            mac_address: format!("00:00:00:00:00:{:02X}", sensor_id),
            manufacturer: "Acme".to_string(),
            model: "T-1000".to_string(),
            serie_number: format!("SN-{}", sensor_id),
            firmware_version: "1.0".to_string(),
            location: GeoPoint::new(latitude, longitude),
        }
    }

    #[test]
    fn test_identity_insert_generates_sequential_ids() {
        let store = MemoryIdentityStore::new();
        let a = store.insert("a").unwrap();
        let b = store.insert("b").unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_identity_insert_rejects_duplicate_name() {
        let store = MemoryIdentityStore::new();
        store.insert("a").unwrap();

        let result = store.insert("a");
        assert!(matches!(
            result,
            Err(SensorHubError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_identity_get_by_name() {
        let store = MemoryIdentityStore::new();
        let inserted = store.insert("thermo-1").unwrap();

        let found = store.get_by_name("thermo-1").unwrap().unwrap();
        assert_eq!(found, inserted);
        assert!(store.get_by_name("absent").unwrap().is_none());
    }

    #[test]
    fn test_identity_delete_reports_absence() {
        let store = MemoryIdentityStore::new();
        let inserted = store.insert("a").unwrap();

        assert!(store.delete(inserted.id).unwrap());
        assert!(!store.delete(inserted.id).unwrap());
    }

    #[test]
    fn test_identity_list_offset_limit() {
        let store = MemoryIdentityStore::new();
        for name in ["a", "b", "c", "d"] {
            store.insert(name).unwrap();
        }

        let page = store.list(1, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "b");
        assert_eq!(page[1].name, "c");
    }

    #[test]
    fn test_clone_shares_state() {
        let store = MemoryIdentityStore::new();
        let handle = store.clone();
        let inserted = handle.insert("shared").unwrap();

        assert!(store.get_by_id(inserted.id).unwrap().is_some());
    }

    #[test]
    fn test_metadata_find_near_spherical_orders_nearest_first() {
        let store = MemoryMetadataStore::new();
        let center = GeoPoint::new(41.38, 2.17);
        store.insert(&doc(1, 41.39, 2.17)).unwrap(); // ~1.1 km away
        store.insert(&doc(2, 41.38, 2.17)).unwrap(); // at the center
        store.insert(&doc(3, 45.0, 2.17)).unwrap(); // far away

        let near = store
            .find_near(center, 5_000.0, NearMode::Spherical)
            .unwrap();
        let ids: Vec<SensorId> = near.iter().map(|d| d.sensor_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_metadata_find_near_bounding_box_is_unordered_window() {
        let store = MemoryMetadataStore::new();
        let center = GeoPoint::new(0.0, 0.0);
        store.insert(&doc(1, 0.5, 0.5)).unwrap();
        store.insert(&doc(2, 1.5, 0.0)).unwrap();

        let near = store.find_near(center, 1.0, NearMode::BoundingBox).unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].sensor_id, 1);
    }

    #[test]
    fn test_metadata_find_near_radius_zero_exact_match() {
        let store = MemoryMetadataStore::new();
        let center = GeoPoint::new(41.38, 2.17);
        store.insert(&doc(1, 41.38, 2.17)).unwrap();
        store.insert(&doc(2, 41.381, 2.17)).unwrap();

        for mode in [NearMode::Spherical, NearMode::BoundingBox] {
            let near = store.find_near(center, 0.0, mode).unwrap();
            assert_eq!(near.len(), 1, "mode {:?}", mode);
            assert_eq!(near[0].sensor_id, 1, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_telemetry_cache_last_write_wins() {
        let cache = MemoryTelemetryCache::new();
        cache.set("sensor:1:data", "first").unwrap();
        cache.set("sensor:1:data", "second").unwrap();

        assert_eq!(
            cache.get("sensor:1:data").unwrap(),
            Some("second".to_string())
        );
    }

    #[test]
    fn test_telemetry_cache_delete_missing_key_is_false() {
        let cache = MemoryTelemetryCache::new();
        assert!(!cache.delete("sensor:9:data").unwrap());
    }
}
