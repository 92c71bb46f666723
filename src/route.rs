//! Visit sequencing: nearest-neighbor construction plus 2-opt refinement.
//!
//! Node 0 is always home; selected destinations are nodes `1..=n` in input
//! order. Tours start and end at node 0.

use serde::Serialize;
use tracing::debug;

use crate::destination::{Coordinate, Destination};
use crate::polyline::Polyline;
use crate::traits::DistanceMetric;

/// Improvements smaller than this are treated as float noise.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-9;

/// A closed tour over matrix indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub order: Vec<usize>,
    pub length_km: f64,
}

impl Tour {
    fn new(order: Vec<usize>, matrix: &[Vec<f64>]) -> Self {
        let length_km = tour_length(matrix, &order);
        Self { order, length_km }
    }
}

/// Sum of consecutive leg lengths along `order`.
pub fn tour_length(matrix: &[Vec<f64>], order: &[usize]) -> f64 {
    order.windows(2).map(|leg| matrix[leg[0]][leg[1]]).sum()
}

/// Greedy construction: always hop to the closest unvisited node.
///
/// Node 0 is the start and end of the tour. Ties go to the lower index.
/// An empty matrix yields an empty tour. O(n²).
pub fn nearest_neighbor(matrix: &[Vec<f64>]) -> Tour {
    let n = matrix.len();
    if n == 0 {
        return Tour {
            order: Vec::new(),
            length_km: 0.0,
        };
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n + 1);
    let mut current = 0;
    order.push(0);
    visited[0] = true;

    for _ in 1..n {
        let mut nearest: Option<(usize, f64)> = None;
        for (candidate, &dist) in matrix[current].iter().enumerate() {
            if visited[candidate] {
                continue;
            }
            if nearest.is_none_or(|(_, best)| dist < best) {
                nearest = Some((candidate, dist));
            }
        }
        let Some((next, _)) = nearest else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order.push(0);
    Tour::new(order, matrix)
}

/// Find and apply the first segment reversal that shortens the tour.
/// Returns true if an improvement was made.
fn two_opt_improve(tour: &mut Tour, matrix: &[Vec<f64>]) -> bool {
    let len = tour.order.len();
    if len < 5 {
        return false;
    }

    // Keep home fixed at both ends: reversal spans stay inside 1..len-1.
    for i in 0..len - 3 {
        for j in i + 2..len - 1 {
            let mut candidate = tour.order.clone();
            candidate[i + 1..=j].reverse();
            let length = tour_length(matrix, &candidate);

            if length < tour.length_km - IMPROVEMENT_EPSILON_KM {
                tour.order = candidate;
                tour.length_km = length;
                return true;
            }
        }
    }

    false
}

/// 2-opt local search over an owned copy of `seed`.
///
/// Runs until a full scan finds no improving move or `max_iterations`
/// improvements have been applied. Never returns a longer tour.
pub fn two_opt(matrix: &[Vec<f64>], seed: &Tour, max_iterations: usize) -> Tour {
    let mut tour = seed.clone();
    for _ in 0..max_iterations {
        if !two_opt_improve(&mut tour, matrix) {
            break;
        }
    }
    tour
}

/// A home-anchored visiting order.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<'a> {
    pub home: &'a Destination,
    /// Destinations between the two home nodes, in visiting order.
    pub visits: Vec<&'a Destination>,
    pub total_distance_km: f64,
}

impl<'a> Route<'a> {
    /// Every node including home at both ends.
    pub fn nodes(&self) -> impl Iterator<Item = &'a Destination> + '_ {
        std::iter::once(self.home)
            .chain(self.visits.iter().copied())
            .chain(std::iter::once(self.home))
    }

    /// Node count, home counted twice.
    pub fn len(&self) -> usize {
        self.visits.len() + 2
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.nodes().map(|dest| dest.id.as_str()).collect()
    }

    pub fn polyline(&self) -> Polyline {
        Polyline::new(self.nodes().map(|dest| dest.coordinate).collect())
    }

    /// Owned copy of the names, display string, distance and geometry.
    pub fn summary(&self) -> RouteSummary {
        let stops: Vec<String> = self.names().into_iter().map(str::to_string).collect();
        RouteSummary {
            display: stops.join(" → "),
            stops,
            total_distance_km: self.total_distance_km,
            geometry: self.polyline(),
        }
    }
}

/// Owned, serializable view of a route for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Node names, home at both ends.
    pub stops: Vec<String>,
    pub display: String,
    pub total_distance_km: f64,
    pub geometry: Polyline,
}

/// Sequences selected destinations into a closed tour from home.
#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'m, M: ?Sized> {
    metric: &'m M,
    max_iterations: usize,
}

impl<'m, M: DistanceMetric + ?Sized> RouteBuilder<'m, M> {
    pub fn new(metric: &'m M, max_iterations: usize) -> Self {
        Self {
            metric,
            max_iterations,
        }
    }

    /// Distance matrix with home at index 0.
    pub fn matrix(&self, home: Coordinate, selected: &[&Destination]) -> Vec<Vec<f64>> {
        let locations: Vec<Coordinate> = std::iter::once(home)
            .chain(selected.iter().map(|dest| dest.coordinate))
            .collect();
        self.metric.matrix_for(&locations)
    }

    /// Build the visiting order. `selected` is left untouched.
    pub fn build<'a>(&self, home: &'a Destination, selected: &[&'a Destination]) -> Route<'a> {
        let matrix = self.matrix(home.coordinate, selected);
        let seed = nearest_neighbor(&matrix);
        let tour = if selected.len() >= 3 {
            two_opt(&matrix, &seed, self.max_iterations)
        } else {
            seed.clone()
        };

        debug!(
            stops = selected.len(),
            seed_km = seed.length_km,
            refined_km = tour.length_km,
            "route built"
        );

        let visits = tour.order[1..tour.order.len() - 1]
            .iter()
            .map(|&node| selected[node - 1])
            .collect();

        Route {
            home,
            visits,
            total_distance_km: tour.length_km,
        }
    }
}
