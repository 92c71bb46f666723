//! Country-level destinations for realistic planner fixtures.
//!
//! Coordinates are country centroids. Costs are round figures in a single
//! normalized unit, priced from India.

use trip_planner::destination::Destination;

/// A named country with coordinates, costs and interest tags.
#[derive(Debug, Clone)]
pub struct Country {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub travel_cost: f64,
    pub per_day: f64,
    pub interests: &'static [&'static str],
}

impl Country {
    pub const fn new(
        name: &'static str,
        lat: f64,
        lng: f64,
        travel_cost: f64,
        per_day: f64,
        interests: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            lat,
            lng,
            travel_cost,
            per_day,
            interests,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn destination(&self) -> Destination {
        Destination::new(
            self.name,
            self.coords(),
            self.interests.iter().copied(),
            self.travel_cost,
            self.per_day,
        )
    }
}

// ============================================================================
// Home
// ============================================================================

pub const INDIA: Country = Country::new(
    "India",
    20.59,
    78.96,
    0.0,
    30.0,
    &["history", "food", "culture", "spirituality"],
);

// ============================================================================
// Reference scenario: India home, three candidates
// ============================================================================

pub const THAILAND: Country = Country::new("Thailand", 15.87, 100.99, 600.0, 40.0, &["beaches", "food", "culture"]);
pub const JAPAN: Country = Country::new("Japan", 36.20, 138.25, 1350.0, 120.0, &["culture", "food", "technology"]);
pub const KENYA: Country = Country::new("Kenya", -1.29, 36.82, 900.0, 50.0, &["adventure", "wildlife"]);

pub const SCENARIO: &[Country] = &[INDIA, THAILAND, JAPAN, KENYA];

// ============================================================================
// Wider pool
// ============================================================================

pub const ASIA: &[Country] = &[
    Country::new("Vietnam", 14.06, 108.28, 650.0, 30.0, &["food", "beaches", "history"]),
    Country::new("Nepal", 28.39, 84.12, 250.0, 25.0, &["mountains", "adventure", "spirituality"]),
    Country::new("Indonesia", -0.79, 113.92, 700.0, 45.0, &["beaches", "culture", "diving"]),
    Country::new("Sri Lanka", 7.87, 80.77, 200.0, 35.0, &["beaches", "wildlife", "culture"]),
    Country::new("Maldives", 3.20, 73.22, 400.0, 250.0, &["beaches", "diving"]),
];

pub const FAR_AWAY: &[Country] = &[
    Country::new("Italy", 41.87, 12.57, 1100.0, 110.0, &["history", "food", "art"]),
    Country::new("France", 46.23, 2.21, 1150.0, 130.0, &["art", "food", "history"]),
    Country::new("Peru", -9.19, -75.02, 1600.0, 60.0, &["history", "mountains", "adventure"]),
    Country::new("Egypt", 26.82, 30.80, 800.0, 55.0, &["history", "culture"]),
    Country::new("Australia", -25.27, 133.78, 1500.0, 140.0, &["beaches", "wildlife", "adventure"]),
];

/// Destinations for the given tables, in table order.
pub fn destinations(tables: &[&[Country]]) -> Vec<Destination> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .map(Country::destination)
        .collect()
}

/// Home, the scenario candidates and every other country.
pub fn world() -> Vec<Destination> {
    destinations(&[SCENARIO, ASIA, FAR_AWAY])
}
