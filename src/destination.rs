//! Destination records and interest scoring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the latitude and longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Descriptive fields carried for downstream enrichment. The optimizer
/// never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_season: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_cities: Vec<String>,
}

/// A candidate destination.
///
/// Costs are expressed in a single normalized currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub coordinate: Coordinate,
    pub interests: Vec<String>,
    /// Minimum travel cost from home to this destination.
    pub travel_cost: f64,
    /// Minimum accommodation cost per day.
    pub accommodation_per_day: f64,
    #[serde(default)]
    pub profile: DestinationProfile,
}

impl Destination {
    /// Destination with an empty profile.
    pub fn new(
        id: impl Into<String>,
        coordinate: impl Into<Coordinate>,
        interests: impl IntoIterator<Item = impl Into<String>>,
        travel_cost: f64,
        accommodation_per_day: f64,
    ) -> Self {
        Self {
            id: id.into(),
            coordinate: coordinate.into(),
            interests: interests.into_iter().map(Into::into).collect(),
            travel_cost,
            accommodation_per_day,
            profile: DestinationProfile::default(),
        }
    }

    /// Attach descriptive fields for downstream enrichment.
    pub fn with_profile(mut self, profile: DestinationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Number of distinct tags shared with the traveler's interests.
    pub fn interest_score(&self, interests: &BTreeSet<String>) -> u32 {
        let own: BTreeSet<&str> = self.interests.iter().map(String::as_str).collect();
        own.into_iter().filter(|tag| interests.contains(*tag)).count() as u32
    }

    /// Tags shared with the traveler's interests, in record order.
    pub fn matching_interests<'a>(&'a self, interests: &BTreeSet<String>) -> Vec<&'a str> {
        let mut seen = BTreeSet::new();
        self.interests
            .iter()
            .filter(|tag| interests.contains(*tag) && seen.insert(tag.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Cost of a stay of `days` days: travel plus accommodation.
    pub fn stay_cost(&self, days: u32) -> f64 {
        self.travel_cost + self.accommodation_per_day * f64::from(days)
    }
}

/// Normalize a list of raw interest strings into a lookup set.
pub fn interest_set<I, S>(interests: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    interests
        .into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
