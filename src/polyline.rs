//! Polyline representation for route geometries.
//!
//! Holds the ordered coordinates a trip passes through, home at both ends.
//! Encoding to a compact wire format is left to the map renderer.

use serde::{Deserialize, Serialize};

use crate::destination::Coordinate;
use crate::traits::DistanceMetric;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Sum of leg lengths under the given metric.
    pub fn length_km<M: DistanceMetric + ?Sized>(&self, metric: &M) -> f64 {
        self.points
            .windows(2)
            .map(|leg| metric.distance_km(leg[0], leg[1]))
            .sum()
    }
}
