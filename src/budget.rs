//! Budget enforcement and financial summaries.
//!
//! When an itinerary overshoots the budget ceiling, the stop with the worst
//! cost-to-interest ratio is dropped and the remaining destinations are
//! re-routed and re-allocated. This repeats until the plan fits or a single
//! stop is left.

use serde::Serialize;
use tracing::{debug, warn};

use crate::destination::Destination;
use crate::error::PlanError;
use crate::itinerary::{Itinerary, Stop};
use crate::route::Route;

/// Utilization at or above which a plan counts as tight.
const TIGHT_UTILIZATION_PERCENT: f64 = 85.0;

/// Leftover budget above which a plan counts as roomy.
const ROOMY_REMAINING: f64 = 500.0;

/// A stop dropped to bring the plan within budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimmedStop {
    pub id: String,
    /// Cost of the stop at the moment it was removed.
    pub total_cost: f64,
    pub cost_per_interest: f64,
}

/// Outcome of a successful enforcement pass.
#[derive(Debug, Clone)]
pub struct Enforced<'a> {
    pub route: Route<'a>,
    pub itinerary: Itinerary,
    /// Removed stops, in removal order.
    pub trimmed: Vec<TrimmedStop>,
}

/// Compares an itinerary's cost to the ceiling and trims until it fits.
#[derive(Debug, Clone, Copy)]
pub struct BudgetEnforcer {
    pub ceiling: f64,
}

impl BudgetEnforcer {
    /// Enforcer for an already-discounted ceiling (budget times margin).
    pub fn new(ceiling: f64) -> Self {
        Self { ceiling }
    }

    /// Trim `itinerary` until its total cost is within the ceiling.
    ///
    /// `replan` must rebuild the route and the day allocation for a reduced
    /// destination set. It receives a fresh slice on every call.
    pub fn enforce<'a, F>(
        &self,
        route: Route<'a>,
        itinerary: Itinerary,
        mut replan: F,
    ) -> Result<Enforced<'a>, PlanError>
    where
        F: FnMut(&[&'a Destination]) -> Result<(Route<'a>, Itinerary), PlanError>,
    {
        let mut route = route;
        let mut itinerary = itinerary;
        let mut trimmed = Vec::new();

        loop {
            if itinerary.is_empty() {
                return Err(PlanError::EmptySelection { candidates: 0 });
            }

            let total_cost = itinerary.total_cost();
            if total_cost <= self.ceiling {
                debug!(total_cost, ceiling = self.ceiling, removed = trimmed.len(), "within budget");
                return Ok(Enforced {
                    route,
                    itinerary,
                    trimmed,
                });
            }

            if itinerary.len() == 1 {
                warn!(total_cost, ceiling = self.ceiling, "single remaining stop is over budget");
                return Err(PlanError::BudgetInfeasible {
                    cost: total_cost,
                    ceiling: self.ceiling,
                });
            }

            let worst = worst_value(itinerary.stops());
            let removed = &itinerary.stops()[worst];
            warn!(
                destination = %removed.id(),
                stop_cost = removed.total_cost,
                ratio = removed.cost_per_interest(),
                total_cost,
                ceiling = self.ceiling,
                "removing stop to stay within budget"
            );
            trimmed.push(TrimmedStop {
                id: removed.id().to_string(),
                total_cost: removed.total_cost,
                cost_per_interest: removed.cost_per_interest(),
            });

            let remaining: Vec<&'a Destination> = route
                .visits
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != worst)
                .map(|(_, dest)| *dest)
                .collect();

            let (next_route, next_itinerary) = replan(&remaining)?;
            route = next_route;
            itinerary = next_itinerary;
        }
    }
}

/// Index of the stop with the highest cost-to-interest ratio.
///
/// Ties keep the earliest stop in visiting order.
fn worst_value(stops: &[Stop]) -> usize {
    let mut worst = 0;
    let mut worst_ratio = f64::NEG_INFINITY;
    for (index, stop) in stops.iter().enumerate() {
        let ratio = stop.cost_per_interest();
        if ratio > worst_ratio {
            worst = index;
            worst_ratio = ratio;
        }
    }
    worst
}

/// How much slack a plan leaves in the stated budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetHealth {
    /// Little headroom; cheaper lodging or travel dates are worth a look.
    Tight,
    /// Comfortable headroom for longer stays or upgrades.
    Roomy,
    Balanced,
}

/// Financial overview of a finished itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total_cost: f64,
    pub budget: f64,
    pub remaining: f64,
    pub utilization_percent: f64,
    pub average_daily_cost: f64,
    pub total_days: u32,
    pub health: BudgetHealth,
}

impl BudgetSummary {
    /// Summarize `itinerary` against the stated budget, not the ceiling.
    pub fn new(itinerary: &Itinerary, budget: f64) -> Self {
        let total_cost = itinerary.total_cost();
        let total_days = itinerary.total_days();
        let remaining = budget - total_cost;
        let utilization_percent = if budget > 0.0 {
            total_cost / budget * 100.0
        } else {
            0.0
        };
        let average_daily_cost = if total_days > 0 {
            total_cost / f64::from(total_days)
        } else {
            0.0
        };

        let health = if utilization_percent >= TIGHT_UTILIZATION_PERCENT {
            BudgetHealth::Tight
        } else if remaining > ROOMY_REMAINING {
            BudgetHealth::Roomy
        } else {
            BudgetHealth::Balanced
        };

        Self {
            total_cost,
            budget,
            remaining,
            utilization_percent,
            average_daily_cost,
            total_days,
            health,
        }
    }
}
