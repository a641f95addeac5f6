//! Geospatial helpers for the "sensors near a point" query
//!
//! Two query modes exist and are never silently mixed:
//!
//! - [`NearMode::Spherical`] (canonical): great-circle distance via the
//!   Haversine formula; radius in **meters**; results nearest-first.
//! - [`NearMode::BoundingBox`]: a degree-window approximation; radius in
//!   **degrees**; no ordering guarantee. It is a square, not a circle,
//!   and does not correct for longitude compression at high latitude.

use std::f64::consts::PI;

use crate::model::GeoPoint;

/// Mean Earth radius in meters (WGS84 spherical approximation)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Proximity-query algorithm selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NearMode {
    /// Great-circle (haversine) proximity; radius in meters; nearest-first
    #[default]
    Spherical,
    /// Degree-window approximation; radius in degrees; unordered
    BoundingBox,
}

/// Convert degrees to radians.
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Great-circle distance between two WGS84 points in meters (Haversine)
pub fn haversine_distance(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let lat1_rad = deg_to_rad(p1.latitude);
    let lat2_rad = deg_to_rad(p2.latitude);
    let delta_lat = deg_to_rad(p2.latitude - p1.latitude);
    let delta_lon = deg_to_rad(p2.longitude - p1.longitude);

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Bounding-box containment for [`NearMode::BoundingBox`]
///
/// Radius is in decimal degrees and applies independently to each axis.
pub fn within_bounding_box(center: &GeoPoint, radius_deg: f64, point: &GeoPoint) -> bool {
    (point.latitude - center.latitude).abs() <= radius_deg
        && (point.longitude - center.longitude).abs() <= radius_deg
}

/// Degree window guaranteed to contain every point within `radius_m` of the center
///
/// Used as a cheap SQL prefilter before the exact haversine refine; the
/// window over-selects (never under-selects) for radii small relative to
/// the Earth. Near the poles the longitude window widens to the full range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

/// Compute the prefilter window for a spherical query
pub fn degree_bounds(center: &GeoPoint, radius_m: f64) -> DegreeBounds {
    let lat_delta = (radius_m / EARTH_RADIUS_M).to_degrees();
    let cos_lat = deg_to_rad(center.latitude).cos().abs();
    let lon_delta = if cos_lat < 1e-6 {
        180.0
    } else {
        (lat_delta / cos_lat).min(180.0)
    };

    DegreeBounds {
        lat_min: (center.latitude - lat_delta).max(-90.0),
        lat_max: (center.latitude + lat_delta).min(90.0),
        lon_min: (center.longitude - lon_delta).max(-180.0),
        lon_max: (center.longitude + lon_delta).min(180.0),
    }
}
