//! Error types for planning and dataset loading.

use thiserror::Error;

/// Why a planning request produced no itinerary.
///
/// Every variant is deterministic: retrying the same request yields the
/// same error.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown home location `{0}`")]
    InvalidHome(String),

    #[error("no destination matches any of the requested interests")]
    NoMatchingInterests,

    #[error("budget ceiling {ceiling:.2} cannot cover the cheapest option ({cost:.2})")]
    BudgetInfeasible { cost: f64, ceiling: f64 },

    #[error("trip of {available} days is too short: {required} days needed")]
    TripTooShort { required: u64, available: u64 },

    #[error("selection is empty although {candidates} candidates were eligible")]
    EmptySelection { candidates: usize },

    #[error("date arithmetic failed: {0}")]
    Calendar(#[from] jiff::Error),
}

/// Failures while loading or validating a destination dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("destination `{name}`: {reason}")]
    Invalid { name: String, reason: String },

    #[error("duplicate destination `{0}`")]
    Duplicate(String),

    #[error("dataset contains no destinations")]
    Empty,
}

impl DatasetError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
