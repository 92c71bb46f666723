//! Interest-weighted day allocation.

use std::collections::BTreeSet;

use jiff::Span;
use jiff::civil::Date;

use crate::error::PlanError;
use crate::itinerary::Stop;
use crate::route::Route;

/// Distributes trip days over a route's stops.
///
/// Every stop first receives `min_days_per_stop`; the remainder is shared in
/// proportion to interest score.
#[derive(Debug, Clone, Copy)]
pub struct Allocator {
    pub min_days_per_stop: u32,
}

impl Default for Allocator {
    fn default() -> Self {
        Self { min_days_per_stop: 2 }
    }
}

impl Allocator {
    /// Allocator guaranteeing `min_days_per_stop` days to every stop.
    pub fn new(min_days_per_stop: u32) -> Self {
        Self { min_days_per_stop }
    }

    /// Split `total_days` over stops with the given scores, in route order.
    ///
    /// The result always sums to `total_days`.
    pub fn allocate(&self, scores: &[u32], total_days: u32) -> Result<Vec<u32>, PlanError> {
        let count = scores.len();
        if count == 0 {
            return Ok(Vec::new());
        }

        let required = u64::from(self.min_days_per_stop) * count as u64;
        if required > u64::from(total_days) {
            return Err(PlanError::TripTooShort {
                required,
                available: u64::from(total_days),
            });
        }
        let remaining = u64::from(total_days) - required;

        // All-zero scores degrade to an even split.
        let weights: Vec<u64> = if scores.iter().all(|&s| s == 0) {
            vec![1; count]
        } else {
            scores.iter().map(|&s| u64::from(s)).collect()
        };
        let weight_sum: u64 = weights.iter().sum();

        let mut days: Vec<u64> = weights
            .iter()
            .map(|&w| u64::from(self.min_days_per_stop) + remaining * w / weight_sum)
            .collect();

        let assigned: u64 = days.iter().sum();
        let mut leftover = u64::from(total_days) - assigned;

        let mut ranking: Vec<usize> = (0..count).collect();
        ranking.sort_by(|&a, &b| weights[b].cmp(&weights[a]).then(a.cmp(&b)));

        for &index in ranking.iter().cycle() {
            if leftover == 0 {
                break;
            }
            days[index] += 1;
            leftover -= 1;
        }

        // Each entry is bounded by `total_days`, which fits in u32.
        Ok(days.into_iter().map(|d| d as u32).collect())
    }

    /// Allocate days along `route` and date each stop from `trip_start`.
    pub fn schedule(
        &self,
        route: &Route<'_>,
        interests: &BTreeSet<String>,
        trip_start: Date,
        total_days: u32,
    ) -> Result<Vec<Stop>, PlanError> {
        let scores: Vec<u32> = route
            .visits
            .iter()
            .map(|dest| dest.interest_score(interests))
            .collect();
        let days = self.allocate(&scores, total_days)?;

        let mut offset: i64 = 0;
        let mut stops = Vec::with_capacity(days.len());
        for ((dest, score), days) in route.visits.iter().zip(scores).zip(days) {
            let start_date = trip_start.checked_add(Span::new().try_days(offset)?)?;
            stops.push(Stop::new((*dest).clone(), score, days, start_date)?);
            offset += i64::from(days);
        }
        Ok(stops)
    }
}
