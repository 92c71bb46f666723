//! Test fixtures for trip-planner.
//!
//! Provides realistic test data including:
//! - Country centroids with travel and lodging costs
//! - A JSON dataset file in the loader's format
//! - A request builder

#![allow(dead_code)]

pub mod countries;

pub use countries::*;

use std::path::PathBuf;

use jiff::civil::{Date, date};
use trip_planner::planner::TripRequest;

/// Path to the bundled JSON dataset.
pub fn dataset_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("destinations.json")
}

/// Builder for trip requests with scenario defaults.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    home: String,
    stop_count: usize,
    interests: Vec<String>,
    budget: f64,
    start: Date,
    days: i64,
}

impl RequestBuilder {
    /// India home, two stops, beaches/food/culture, 20 days from 2026-06-01.
    pub fn new() -> Self {
        Self {
            home: "India".into(),
            stop_count: 2,
            interests: vec!["beaches".into(), "food".into(), "culture".into()],
            budget: 2000.0,
            start: date(2026, 6, 1),
            days: 20,
        }
    }

    pub fn home(mut self, home: &str) -> Self {
        self.home = home.into();
        self
    }

    pub fn stops(mut self, stop_count: usize) -> Self {
        self.stop_count = stop_count;
        self
    }

    pub fn interests(mut self, interests: &[&str]) -> Self {
        self.interests = interests.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = budget;
        self
    }

    pub fn days(mut self, days: i64) -> Self {
        self.days = days;
        self
    }

    pub fn build(self) -> TripRequest {
        let end = self
            .start
            .checked_add(jiff::Span::new().days(self.days))
            .expect("fixture dates stay in range");
        TripRequest::new(
            self.home,
            self.stop_count,
            self.interests,
            self.budget,
            self.start,
            end,
        )
    }
}
