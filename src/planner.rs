//! End-to-end trip planning.
//!
//! A [`Planner`] runs one request through selection, routing, day
//! allocation and budget enforcement:
//!
//! ```text
//! Selecting → Routing → Allocating → BudgetChecking → Done
//!                ↑                          │
//!                └──────── Trimming ←───────┘
//! ```
//!
//! Any stage may end in `Failed` with a [`PlanError`].

use std::fmt;

use jiff::civil::Date;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::allocator::Allocator;
use crate::budget::{BudgetEnforcer, BudgetSummary, TrimmedStop};
use crate::destination::{Destination, interest_set};
use crate::error::PlanError;
use crate::haversine::Haversine;
use crate::itinerary::Itinerary;
use crate::route::{Route, RouteBuilder, RouteSummary};
use crate::selector::{NoMatchPolicy, Selector};
use crate::traits::{DestinationSource, DistanceMetric};

/// Tunables for the planning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Minimum days allotted to every stop.
    pub min_days_per_stop: u32,
    /// Upper bound accepted for a request's stop count.
    pub max_stops: usize,
    /// Fraction of the stated budget the plan may spend.
    pub safety_margin: f64,
    /// Maximum number of improving 2-opt moves per route.
    pub two_opt_max_iterations: usize,
    /// Size of one knapsack weight unit, in cost units.
    pub cost_granularity: f64,
    pub no_match_policy: NoMatchPolicy,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            min_days_per_stop: 2,
            max_stops: 15,
            safety_margin: 0.9,
            two_opt_max_iterations: 100,
            cost_granularity: 10.0,
            no_match_policy: NoMatchPolicy::Reject,
        }
    }
}

impl PlannerOptions {
    /// Reject option values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.min_days_per_stop == 0 {
            return Err(PlanError::InvalidRequest(
                "min_days_per_stop must be at least 1".into(),
            ));
        }
        if self.max_stops == 0 {
            return Err(PlanError::InvalidRequest("max_stops must be at least 1".into()));
        }
        if !(self.safety_margin > 0.0 && self.safety_margin <= 1.0) {
            return Err(PlanError::InvalidRequest(format!(
                "safety_margin must be in (0, 1], got {}",
                self.safety_margin
            )));
        }
        if !(self.cost_granularity.is_finite() && self.cost_granularity > 0.0) {
            return Err(PlanError::InvalidRequest(format!(
                "cost_granularity must be positive, got {}",
                self.cost_granularity
            )));
        }
        Ok(())
    }
}

/// A traveler's planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Id of the home destination.
    pub home: String,
    /// Desired number of stops; the plan may contain fewer.
    pub stop_count: usize,
    pub interests: Vec<String>,
    pub budget: f64,
    pub start_date: Date,
    /// Exclusive: the trip covers `start_date..end_date`.
    pub end_date: Date,
}

impl TripRequest {
    /// Build a request; call [`TripRequest::validate`] before trusting it.
    pub fn new(
        home: impl Into<String>,
        stop_count: usize,
        interests: impl IntoIterator<Item = impl Into<String>>,
        budget: f64,
        start_date: Date,
        end_date: Date,
    ) -> Self {
        Self {
            home: home.into(),
            stop_count,
            interests: interests.into_iter().map(Into::into).collect(),
            budget,
            start_date,
            end_date,
        }
    }

    /// Days between the start and end dates.
    pub fn total_days(&self) -> Result<u32, PlanError> {
        let days = self.start_date.until(self.end_date)?.get_days();
        u32::try_from(days).map_err(|_| {
            PlanError::InvalidRequest(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            ))
        })
    }

    /// Check the request shape before any planning work.
    pub fn validate(&self, max_stops: usize) -> Result<(), PlanError> {
        if self.home.trim().is_empty() {
            return Err(PlanError::InvalidRequest("home must not be empty".into()));
        }
        if self.stop_count == 0 || self.stop_count > max_stops {
            return Err(PlanError::InvalidRequest(format!(
                "stop_count must be between 1 and {max_stops}, got {}",
                self.stop_count
            )));
        }
        if interest_set(&self.interests).is_empty() {
            return Err(PlanError::InvalidRequest(
                "at least one interest is required".into(),
            ));
        }
        if !(self.budget.is_finite() && self.budget > 0.0) {
            return Err(PlanError::InvalidRequest(format!(
                "budget must be positive, got {}",
                self.budget
            )));
        }
        if self.end_date <= self.start_date {
            return Err(PlanError::InvalidRequest(format!(
                "end_date {} must be after start_date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}

/// A finished, within-budget plan.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub itinerary: Itinerary,
    pub route: RouteSummary,
    pub budget: BudgetSummary,
    /// Stops removed to meet the budget, in removal order.
    pub trimmed: Vec<TrimmedStop>,
}

/// Pipeline stage, as reported in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStage {
    Selecting,
    Routing,
    Allocating,
    BudgetChecking,
    Trimming,
    Done,
    Failed,
}

impl fmt::Display for PlanStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanStage::Selecting => "selecting",
            PlanStage::Routing => "routing",
            PlanStage::Allocating => "allocating",
            PlanStage::BudgetChecking => "budget_checking",
            PlanStage::Trimming => "trimming",
            PlanStage::Done => "done",
            PlanStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Plans trips over a shared, read-only destination pool.
///
/// The pool is borrowed, never copied, so one planner can serve many
/// requests and batches concurrently.
pub struct Planner<'d, D: ?Sized, M = Haversine> {
    source: &'d D,
    metric: M,
    options: PlannerOptions,
}

impl<'d, D: DestinationSource + ?Sized> Planner<'d, D, Haversine> {
    /// Planner with great-circle distances and default options.
    pub fn new(source: &'d D) -> Self {
        Self::with_metric(source, Haversine::default())
    }
}

impl<'d, D, M> Planner<'d, D, M>
where
    D: DestinationSource + ?Sized,
    M: DistanceMetric,
{
    /// Planner with a custom distance metric and default options.
    pub fn with_metric(source: &'d D, metric: M) -> Self {
        Self {
            source,
            metric,
            options: PlannerOptions::default(),
        }
    }

    /// Replace the options. They are validated on every `plan` call.
    pub fn with_options(mut self, options: PlannerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plan a single trip.
    pub fn plan(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        let result = self.run(request);
        if let Err(err) = &result {
            warn!(stage = %PlanStage::Failed, home = %request.home, error = %err, "trip planning failed");
        }
        result
    }

    fn run(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        self.options.validate()?;
        request.validate(self.options.max_stops)?;

        let source: &'d D = self.source;
        let home_id = request.home.trim();
        let home = source
            .find(home_id)
            .ok_or_else(|| PlanError::InvalidHome(home_id.to_string()))?;
        let interests = interest_set(&request.interests);

        let total_days = request.total_days()?;

        let ceiling = request.budget * self.options.safety_margin;

        debug!(stage = %PlanStage::Selecting, home = %home.id, ceiling, total_days, "planning trip");
        let pool: Vec<&'d Destination> = source
            .destinations()
            .iter()
            .filter(|dest| dest.id != home.id)
            .collect();
        let selector = Selector::new(self.options.cost_granularity, self.options.no_match_policy);
        let selected: Vec<&'d Destination> = selector
            .select(&pool, &interests, ceiling, request.stop_count)?
            .into_iter()
            .map(|candidate| candidate.destination)
            .collect();

        let builder = RouteBuilder::new(&self.metric, self.options.two_opt_max_iterations);
        let allocator = Allocator::new(self.options.min_days_per_stop);
        let mut passes = 0usize;

        let mut replan = |visits: &[&'d Destination]| -> Result<(Route<'d>, Itinerary), PlanError> {
            if passes > 0 {
                debug!(stage = %PlanStage::Trimming, remaining = visits.len(), "replanning reduced set");
            }
            passes += 1;

            debug!(stage = %PlanStage::Routing, stops = visits.len(), "stage");
            let route = builder.build(home, visits);

            debug!(stage = %PlanStage::Allocating, total_days, "stage");
            let stops = allocator.schedule(&route, &interests, request.start_date, total_days)?;
            let itinerary = Itinerary::new(stops, route.total_distance_km);

            debug!(
                stage = %PlanStage::BudgetChecking,
                total_cost = itinerary.total_cost(),
                ceiling,
                "stage"
            );
            Ok((route, itinerary))
        };

        let (route, itinerary) = replan(&selected)?;
        let enforced = BudgetEnforcer::new(ceiling).enforce(route, itinerary, replan)?;

        let plan = TripPlan {
            route: enforced.route.summary(),
            budget: BudgetSummary::new(&enforced.itinerary, request.budget),
            itinerary: enforced.itinerary,
            trimmed: enforced.trimmed,
        };

        info!(
            stage = %PlanStage::Done,
            home = %home.id,
            stops = plan.itinerary.len(),
            total_cost = plan.itinerary.total_cost(),
            distance_km = plan.route.total_distance_km,
            trimmed = plan.trimmed.len(),
            "trip planned"
        );
        Ok(plan)
    }

    /// Plan independent requests in parallel. Results keep request order.
    pub fn plan_batch(&self, requests: &[TripRequest]) -> Vec<Result<TripPlan, PlanError>>
    where
        D: Sync,
        M: Sync,
    {
        requests.par_iter().map(|request| self.plan(request)).collect()
    }
}
