//! trip-planner core
//!
//! Budget-aware trip optimization: knapsack destination selection,
//! great-circle route sequencing, interest-weighted day allocation and
//! iterative budget trimming.

pub mod traits;
pub mod error;
pub mod destination;
pub mod dataset;
pub mod haversine;
pub mod polyline;
pub mod selector;
pub mod route;
pub mod allocator;
pub mod itinerary;
pub mod budget;
pub mod planner;
