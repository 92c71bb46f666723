//! Destination selection as a 0/1 knapsack.
//!
//! Each candidate is an item whose weight is its travel cost (discretized to
//! `granularity`-sized units) and whose value is its interest score. The
//! solver maximizes total score under the budget ceiling, then caps the
//! result to the requested stop count.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::destination::Destination;
use crate::error::PlanError;

/// Upper bound on DP columns. Larger budgets coarsen the granularity.
const MAX_DP_UNITS: u64 = 200_000;

/// What to do when no candidate shares a tag with the traveler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Fail with [`PlanError::NoMatchingInterests`].
    #[default]
    Reject,
    /// Fill the budget with the cheapest destinations instead.
    CheapestFirst,
}

/// A destination annotated with its knapsack value and weight.
#[derive(Debug, Clone, Copy)]
pub struct SelectionCandidate<'a> {
    pub destination: &'a Destination,
    /// Position in the candidate pool.
    pub position: usize,
    pub score: u32,
    /// Travel cost in discretized units, rounded up.
    pub weight: u64,
}

impl SelectionCandidate<'_> {
    /// Score per unit of travel cost. Free destinations rank first.
    fn value_ratio(&self) -> f64 {
        if self.destination.travel_cost > 0.0 {
            f64::from(self.score) / self.destination.travel_cost
        } else {
            f64::INFINITY
        }
    }
}

/// Knapsack destination chooser.
///
/// `granularity` is the cost of one weight unit; `policy` decides what
/// happens when no candidate matches the traveler's interests.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    pub granularity: f64,
    pub policy: NoMatchPolicy,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            granularity: 10.0,
            policy: NoMatchPolicy::Reject,
        }
    }
}

impl Selector {
    /// Create a selector. A non-positive granularity falls back to one unit.
    pub fn new(granularity: f64, policy: NoMatchPolicy) -> Self {
        Self { granularity, policy }
    }

    /// Choose destinations from `pool` maximizing interest coverage with
    /// `Σ travel_cost ≤ ceiling` and at most `max_stops` entries.
    ///
    /// The result is in pool order, not visiting order.
    pub fn select<'a>(
        &self,
        pool: &[&'a Destination],
        interests: &BTreeSet<String>,
        ceiling: f64,
        max_stops: usize,
    ) -> Result<Vec<SelectionCandidate<'a>>, PlanError> {
        let granularity = self.effective_granularity(pool, ceiling);
        let candidates: Vec<SelectionCandidate<'a>> = pool
            .iter()
            .enumerate()
            .map(|(position, &destination)| SelectionCandidate {
                destination,
                position,
                score: destination.interest_score(interests),
                weight: units(destination.travel_cost, granularity),
            })
            .collect();

        let eligible: Vec<SelectionCandidate<'a>> =
            candidates.iter().copied().filter(|c| c.score > 0).collect();

        if eligible.is_empty() {
            return match self.policy {
                NoMatchPolicy::Reject => Err(PlanError::NoMatchingInterests),
                NoMatchPolicy::CheapestFirst => {
                    debug!(candidates = candidates.len(), "no interest overlap, ranking by cost");
                    cheapest_first(&candidates, ceiling, max_stops)
                }
            };
        }

        ensure_something_fits(&eligible, ceiling)?;

        let capacity = (ceiling.max(0.0) / granularity).floor() as u64;
        let chosen = knapsack(&eligible, capacity);
        let chosen = cap_by_ratio(chosen, max_stops);

        debug!(
            eligible = eligible.len(),
            chosen = chosen.len(),
            capacity,
            granularity,
            "knapsack selection finished"
        );

        if chosen.is_empty() {
            return Err(PlanError::EmptySelection {
                candidates: eligible.len(),
            });
        }
        Ok(chosen)
    }

    fn effective_granularity(&self, pool: &[&Destination], ceiling: f64) -> f64 {
        let base = if self.granularity.is_finite() && self.granularity > 0.0 {
            self.granularity
        } else {
            1.0
        };
        let total: f64 = pool.iter().map(|d| d.travel_cost).sum();
        let span = ceiling.min(total).max(0.0);
        let limit = MAX_DP_UNITS as f64;
        if span / base > limit {
            span / limit
        } else {
            base
        }
    }
}

fn units(cost: f64, granularity: f64) -> u64 {
    (cost.max(0.0) / granularity).ceil() as u64
}

fn ensure_something_fits(candidates: &[SelectionCandidate<'_>], ceiling: f64) -> Result<(), PlanError> {
    let cheapest = candidates
        .iter()
        .map(|c| c.destination.travel_cost)
        .fold(f64::INFINITY, f64::min);
    if cheapest > ceiling {
        return Err(PlanError::BudgetInfeasible {
            cost: cheapest,
            ceiling,
        });
    }
    Ok(())
}

/// Value and weight of a partial solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cell {
    score: u32,
    weight: u64,
}

impl Cell {
    /// Higher score wins; equal scores prefer the lighter subset.
    fn beats(&self, other: &Cell) -> bool {
        match self.score.cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.weight < other.weight,
        }
    }
}

/// Classic 0/1 knapsack over discretized weights.
///
/// Only strictly better cells replace existing ones, so among equal
/// subsets the one built from earlier candidates survives.
fn knapsack<'a>(items: &[SelectionCandidate<'a>], capacity: u64) -> Vec<SelectionCandidate<'a>> {
    let total_weight: u64 = items.iter().map(|c| c.weight).sum();
    if total_weight <= capacity {
        return items.to_vec();
    }

    let width = capacity as usize + 1;
    let mut best = vec![Cell::default(); width];
    let mut take = vec![vec![false; width]; items.len()];

    for (i, item) in items.iter().enumerate() {
        let weight = item.weight as usize;
        if weight >= width {
            continue;
        }
        for w in (weight..width).rev() {
            let prev = best[w - weight];
            let candidate = Cell {
                score: prev.score + item.score,
                weight: prev.weight + item.weight,
            };
            if candidate.beats(&best[w]) {
                best[w] = candidate;
                take[i][w] = true;
            }
        }
    }

    let mut chosen = Vec::new();
    let mut w = capacity as usize;
    for (i, item) in items.iter().enumerate().rev() {
        if take[i][w] {
            chosen.push(*item);
            w -= item.weight as usize;
        }
    }
    chosen.reverse();
    chosen
}

/// Keep the `max_stops` best value-for-money candidates, in pool order.
fn cap_by_ratio(mut chosen: Vec<SelectionCandidate<'_>>, max_stops: usize) -> Vec<SelectionCandidate<'_>> {
    if chosen.len() <= max_stops {
        return chosen;
    }
    chosen.sort_by(|a, b| {
        b.value_ratio()
            .total_cmp(&a.value_ratio())
            .then(a.position.cmp(&b.position))
    });
    chosen.truncate(max_stops);
    chosen.sort_by_key(|c| c.position);
    chosen
}

fn cheapest_first<'a>(
    candidates: &[SelectionCandidate<'a>],
    ceiling: f64,
    max_stops: usize,
) -> Result<Vec<SelectionCandidate<'a>>, PlanError> {
    if candidates.is_empty() {
        return Err(PlanError::NoMatchingInterests);
    }
    ensure_something_fits(candidates, ceiling)?;

    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| {
        a.destination
            .travel_cost
            .total_cmp(&b.destination.travel_cost)
            .then(a.position.cmp(&b.position))
    });

    let mut spent = 0.0;
    let mut chosen = Vec::new();
    for candidate in ranked {
        if chosen.len() >= max_stops {
            break;
        }
        let cost = candidate.destination.travel_cost;
        if spent + cost <= ceiling {
            spent += cost;
            chosen.push(candidate);
        }
    }

    if chosen.is_empty() {
        return Err(PlanError::EmptySelection {
            candidates: candidates.len(),
        });
    }
    chosen.sort_by_key(|c| c.position);
    Ok(chosen)
}
