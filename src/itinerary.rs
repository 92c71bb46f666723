//! Planned stops and the itinerary that aggregates them.

use jiff::Span;
use jiff::civil::Date;
use serde::Serialize;

use crate::destination::Destination;
use crate::error::PlanError;
use crate::traits::{EnrichmentContext, StopEnricher};

/// A destination bound to its allotted days and costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub destination: Destination,
    /// Interest overlap with the traveler.
    pub score: u32,
    pub days: u32,
    pub start_date: Date,
    /// Last day spent at this stop (inclusive).
    pub end_date: Date,
    pub travel_cost: f64,
    pub accommodation_cost: f64,
    pub total_cost: f64,
}

impl Stop {
    /// Bind `destination` to a stay of `days` days starting on `start_date`.
    ///
    /// Fails with [`PlanError::Calendar`] if the end date overflows.
    pub fn new(destination: Destination, score: u32, days: u32, start_date: Date) -> Result<Self, PlanError> {
        let last_offset = i64::from(days.saturating_sub(1));
        let end_date = start_date.checked_add(Span::new().try_days(last_offset)?)?;
        let travel_cost = destination.travel_cost;
        let accommodation_cost = destination.accommodation_per_day * f64::from(days);

        Ok(Self {
            destination,
            score,
            days,
            start_date,
            end_date,
            travel_cost,
            accommodation_cost,
            total_cost: travel_cost + accommodation_cost,
        })
    }

    pub fn id(&self) -> &str {
        &self.destination.id
    }

    /// Total cost per matched interest; higher means worse value.
    ///
    /// Scores below one count as one.
    pub fn cost_per_interest(&self) -> f64 {
        self.total_cost / f64::from(self.score.max(1))
    }
}

/// The ordered stops of a trip plus derived totals.
///
/// Totals are computed once on construction; an itinerary is rebuilt rather
/// than edited whenever its stops change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    stops: Vec<Stop>,
    return_travel_cost: f64,
    total_cost: f64,
    total_days: u32,
    total_distance_km: f64,
}

impl Itinerary {
    /// Aggregate `stops` in visiting order. `total_distance_km` is the
    /// closed route length.
    pub fn new(stops: Vec<Stop>, total_distance_km: f64) -> Self {
        // Getting home again costs the same as reaching the last stop.
        let return_travel_cost = stops.last().map_or(0.0, |stop| stop.travel_cost);
        let total_cost = stops.iter().map(|stop| stop.total_cost).sum::<f64>() + return_travel_cost;
        let total_days = stops.iter().map(|stop| stop.days).sum();

        Self {
            stops,
            return_travel_cost,
            total_cost,
            total_days,
            total_distance_km,
        }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }

    pub fn return_travel_cost(&self) -> f64 {
        self.return_travel_cost
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Run an external enricher over every stop, in visiting order.
    pub fn enrich<'s, E: StopEnricher>(
        &'s self,
        enricher: &E,
        context: &EnrichmentContext<'_>,
    ) -> Vec<EnrichedStop<'s, E::Output>> {
        self.stops
            .iter()
            .map(|stop| EnrichedStop {
                stop,
                data: enricher.enrich(stop, context),
            })
            .collect()
    }
}

/// A planned stop paired with data attached by a [`StopEnricher`].
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedStop<'s, T> {
    #[serde(flatten)]
    pub stop: &'s Stop,
    pub data: T,
}
