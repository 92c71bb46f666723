//! Property-based tests for the planning pipeline.
//!
//! # Invariants tested
//!
//! - **Distance:** haversine is symmetric, zero on identical points and obeys
//!   the triangle inequality.
//! - **Routing:** 2-opt never lengthens the nearest-neighbor seed.
//! - **Selection:** chosen travel costs never exceed the ceiling.
//! - **Allocation:** days sum to the trip length and respect the minimum.
//! - **Planning:** successful plans fit the ceiling, make fewer removals than
//!   selections and visit each stop once between two home nodes.

use std::collections::HashSet;

use jiff::Span;
use jiff::civil::date;
use proptest::prelude::*;
use trip_planner::allocator::Allocator;
use trip_planner::destination::{Coordinate, Destination, interest_set};
use trip_planner::error::PlanError;
use trip_planner::haversine::Haversine;
use trip_planner::planner::{Planner, TripRequest};
use trip_planner::route::{nearest_neighbor, two_opt};
use trip_planner::selector::Selector;
use trip_planner::traits::DistanceMetric;

const TAGS: [&str; 4] = ["beaches", "food", "culture", "wildlife"];

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-80.0f64..80.0, -180.0f64..180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
}

/// Destinations named `D0`, `D1`, ... with random tags drawn from [`TAGS`].
fn destinations(max: usize) -> impl Strategy<Value = Vec<Destination>> {
    prop::collection::vec(
        (coordinate(), 0.0f64..2000.0, 0.0f64..200.0, 0u8..16),
        1..max,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (coord, travel, per_day, mask))| {
                let tags = TAGS
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, tag)| *tag);
                Destination::new(format!("D{i}"), coord, tags, travel, per_day)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn haversine_is_a_metric(a in coordinate(), b in coordinate(), c in coordinate()) {
        let metric = Haversine::default();
        let haversine_km = |from: Coordinate, to: Coordinate| metric.distance_km(from, to);
        prop_assert_eq!(haversine_km(a, a), 0.0);
        prop_assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-6);
        prop_assert!(haversine_km(a, c) <= haversine_km(a, b) + haversine_km(b, c) + 1e-3);
    }

    #[test]
    fn two_opt_never_lengthens_seed(points in prop::collection::vec(coordinate(), 4..10)) {
        let matrix = Haversine::default().matrix_for(&points);
        let seed = nearest_neighbor(&matrix);
        let refined = two_opt(&matrix, &seed, 100);

        prop_assert!(refined.length_km <= seed.length_km + 1e-9);
        prop_assert_eq!(refined.order.first(), Some(&0));
        prop_assert_eq!(refined.order.last(), Some(&0));
        let inner: HashSet<usize> = refined.order[1..refined.order.len() - 1].iter().copied().collect();
        prop_assert_eq!(inner.len(), points.len() - 1);
    }

    #[test]
    fn selection_stays_under_ceiling(
        pool in destinations(12),
        ceiling in 100.0f64..5000.0,
        max_stops in 1usize..6,
    ) {
        let refs: Vec<&Destination> = pool.iter().collect();
        let interests = interest_set(["beaches", "food"]);
        match Selector::default().select(&refs, &interests, ceiling, max_stops) {
            Ok(chosen) => {
                let spent: f64 = chosen.iter().map(|c| c.destination.travel_cost).sum();
                prop_assert!(spent <= ceiling, "spent {} over {}", spent, ceiling);
                prop_assert!(!chosen.is_empty());
                prop_assert!(chosen.len() <= max_stops);
                prop_assert!(chosen.iter().all(|c| c.score > 0));
            }
            Err(err) => prop_assert!(matches!(
                err,
                PlanError::NoMatchingInterests
                    | PlanError::BudgetInfeasible { .. }
                    | PlanError::EmptySelection { .. }
            ), "unexpected error: {:?}", err),
        }
    }

    #[test]
    fn allocation_sums_to_trip_length(
        scores in prop::collection::vec(0u32..6, 1..8),
        extra in 0u32..40,
        min_days in 1u32..4,
    ) {
        let total = min_days * scores.len() as u32 + extra;
        let days = Allocator::new(min_days).allocate(&scores, total).unwrap();

        prop_assert_eq!(days.len(), scores.len());
        prop_assert_eq!(days.iter().sum::<u32>(), total);
        prop_assert!(days.iter().all(|&d| d >= min_days));
    }

    #[test]
    fn plans_fit_the_ceiling(
        pool in destinations(10),
        home in coordinate(),
        budget in 500.0f64..20_000.0,
        stop_count in 1usize..6,
        days in 10i64..40,
    ) {
        let mut all = vec![Destination::new("Home", home, ["food"], 0.0, 0.0)];
        all.extend(pool);

        let start = date(2026, 6, 1);
        let end = start.checked_add(Span::new().days(days)).unwrap();
        let request = TripRequest::new("Home", stop_count, ["beaches", "food"], budget, start, end);

        match Planner::new(&all).plan(&request) {
            Ok(plan) => {
                let ceiling = budget * 0.9;
                prop_assert!(plan.itinerary.total_cost() <= ceiling);
                prop_assert!(plan.trimmed.len() < stop_count);
                prop_assert_eq!(i64::from(plan.itinerary.total_days()), days);

                let names = &plan.route.stops;
                prop_assert_eq!(names.first().map(String::as_str), Some("Home"));
                prop_assert_eq!(names.last().map(String::as_str), Some("Home"));
                let inner: HashSet<&String> = names[1..names.len() - 1].iter().collect();
                prop_assert_eq!(inner.len(), names.len() - 2);
                prop_assert_eq!(inner.len(), plan.itinerary.len());
                prop_assert!(!inner.iter().any(|name| name.as_str() == "Home"));
            }
            Err(err) => prop_assert!(matches!(
                err,
                PlanError::NoMatchingInterests
                    | PlanError::BudgetInfeasible { .. }
                    | PlanError::EmptySelection { .. }
            ), "unexpected error: {:?}", err),
        }
    }
}
