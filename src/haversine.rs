//! Haversine great-circle distance.
//!
//! Latitude/longitude are angles, not Cartesian coordinates: planar
//! distance on raw degrees misorders high-latitude and antimeridian points.

use serde::{Deserialize, Serialize};

use crate::destination::Coordinate;
use crate::traits::DistanceMetric;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance on a sphere of fixed radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Haversine {
    pub earth_radius_km: f64,
}

impl Default for Haversine {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl Haversine {
    /// Metric on a sphere of the given radius.
    pub fn new(earth_radius_km: f64) -> Self {
        Self { earth_radius_km }
    }
}

/// Central angle between two points, in radians.
fn central_angle(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    2.0 * a.sqrt().min(1.0).asin()
}

impl DistanceMetric for Haversine {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        self.earth_radius_km * central_angle(from, to)
    }
}
