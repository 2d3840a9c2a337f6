//! Great-circle distance semantics for the "nearby issues" query.
//!
//! The store executes the proximity query itself (SQL haversine); this
//! module is the reference implementation of the distance contract the
//! store must honor: spherical Earth, mean radius 6371 km, radius
//! inclusive of the boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius in kilometers (spherical approximation).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point: latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Validate that a coordinate pair is on the globe.
pub fn validate_point(lat: f64, lng: f64) -> Result<(), CoreError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoreError::Validation(format!(
            "Latitude {lat} out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoreError::Validation(format!(
            "Longitude {lng} out of range [-180, 180]"
        )));
    }
    Ok(())
}

/// Haversine distance between two points in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    // Clamp before asin: floating-point noise can push h a hair above 1
    // for near-antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Whether `point` lies within `radius_km` of `origin`, boundary inclusive.
///
/// A radius of 0 matches only exact-coincident points.
pub fn within_radius_km(origin: GeoPoint, point: GeoPoint, radius_km: f64) -> bool {
    haversine_km(origin, point) <= radius_km
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
