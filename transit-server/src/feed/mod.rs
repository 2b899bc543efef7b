//! Live vehicle feed.
//!
//! Polls an HTTP feed of vehicle positions and keeps the newest snapshot
//! for the planner and the map.

mod client;
mod error;
mod filter;
mod store;

pub use client::{FeedConfig, VehicleFeedClient, fallback_vehicles};
pub use error::FeedError;
pub use filter::{VehicleQuery, filter_vehicles};
pub use store::{VehicleSnapshot, VehicleStore};
