//! Core seams of the planner.
//!
//! These are intentionally minimal. The dataset, the distance model and
//! per-stop enrichment are supplied by the host application.

use std::collections::BTreeSet;

use crate::destination::{Coordinate, Destination};
use crate::itinerary::Stop;

/// Read-only access to the candidate destination pool.
///
/// Order is significant: selection tie-breaks follow it.
pub trait DestinationSource {
    fn destinations(&self) -> &[Destination];

    fn find(&self, id: &str) -> Option<&Destination> {
        self.destinations().iter().find(|dest| dest.id == id)
    }
}

impl DestinationSource for [Destination] {
    fn destinations(&self) -> &[Destination] {
        self
    }
}

impl DestinationSource for Vec<Destination> {
    fn destinations(&self) -> &[Destination] {
        self
    }
}

/// Distance between two coordinates, in kilometers.
pub trait DistanceMetric {
    fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64;

    /// Full matrix for a set of locations, indexed by the provided order.
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<f64>> {
        locations
            .iter()
            .map(|from| {
                locations
                    .iter()
                    .map(|to| self.distance_km(*from, *to))
                    .collect()
            })
            .collect()
    }
}

/// Request-level facts an enricher may need beyond the stop itself.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentContext<'a> {
    pub home: &'a Destination,
    pub interests: &'a BTreeSet<String>,
}

/// Attaches external data (season, currency, visa, ...) to a planned stop.
pub trait StopEnricher {
    type Output;

    fn enrich(&self, stop: &Stop, context: &EnrichmentContext<'_>) -> Self::Output;
}
