//! Destination dataset loading and validation.
//!
//! The dataset is a JSON object keyed by destination name:
//!
//! ```json
//! {
//!   "Thailand": {
//!     "interests": ["beaches", "food"],
//!     "avg_travel_cost": 600,
//!     "avg_accommodation_cost": 40,
//!     "coordinates": [15.87, 100.99],
//!     "currency": "THB"
//!   }
//! }
//! ```
//!
//! Document order is preserved; it is the order selection tie-breaks follow.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::destination::{Coordinate, Destination, DestinationProfile};
use crate::error::DatasetError;
use crate::traits::DestinationSource;

#[derive(Debug, Deserialize)]
struct DestinationRecord {
    interests: Vec<String>,
    avg_travel_cost: f64,
    avg_accommodation_cost: f64,
    coordinates: Vec<f64>,
    #[serde(flatten)]
    profile: DestinationProfile,
}

/// An immutable, ordered pool of destinations.
///
/// Loaded once and shared read-only across planning requests.
#[derive(Debug, Clone)]
pub struct Dataset {
    destinations: Vec<Destination>,
}

impl Dataset {
    /// Build a dataset from already-typed records, validating each one.
    pub fn new(destinations: Vec<Destination>) -> Result<Self, DatasetError> {
        if destinations.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut seen = HashSet::new();
        for dest in &destinations {
            validate(dest)?;
            if !seen.insert(dest.id.as_str()) {
                return Err(DatasetError::Duplicate(dest.id.clone()));
            }
        }

        Ok(Self { destinations })
    }

    /// Parse and validate a JSON document in the format shown above.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: Map<String, Value> = serde_json::from_str(json)?;
        let mut destinations = Vec::with_capacity(raw.len());

        for (name, value) in raw {
            let record: DestinationRecord = serde_json::from_value(value)
                .map_err(|err| DatasetError::invalid(&name, err.to_string()))?;

            let coordinate = match record.coordinates.as_slice() {
                [lat, lng] => Coordinate::new(*lat, *lng),
                other => {
                    return Err(DatasetError::invalid(
                        &name,
                        format!("coordinates must be [lat, lng], got {} values", other.len()),
                    ));
                }
            };

            destinations.push(Destination {
                id: name.trim().to_string(),
                coordinate,
                interests: record.interests,
                travel_cost: record.avg_travel_cost,
                accommodation_per_day: record.avg_accommodation_cost,
                profile: record.profile,
            });
        }

        let dataset = Self::new(destinations)?;
        debug!(destinations = dataset.len(), "loaded destination dataset");
        Ok(dataset)
    }

    /// Read a JSON dataset from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    /// Every interest tag offered by at least one destination, sorted.
    pub fn all_interests(&self) -> Vec<&str> {
        self.destinations
            .iter()
            .flat_map(|dest| dest.interests.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl DestinationSource for Dataset {
    fn destinations(&self) -> &[Destination] {
        &self.destinations
    }
}

fn validate(dest: &Destination) -> Result<(), DatasetError> {
    if dest.id.trim().is_empty() {
        return Err(DatasetError::invalid(&dest.id, "name must not be blank"));
    }
    if !dest.coordinate.is_valid() {
        return Err(DatasetError::invalid(
            &dest.id,
            format!(
                "coordinates ({}, {}) are outside the valid lat/lng range",
                dest.coordinate.lat, dest.coordinate.lng
            ),
        ));
    }
    if !dest.travel_cost.is_finite() || dest.travel_cost < 0.0 {
        return Err(DatasetError::invalid(&dest.id, "travel cost must be a non-negative number"));
    }
    if !dest.accommodation_per_day.is_finite() || dest.accommodation_per_day < 0.0 {
        return Err(DatasetError::invalid(
            &dest.id,
            "accommodation cost must be a non-negative number",
        ));
    }
    Ok(())
}
