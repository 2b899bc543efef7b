//! Trip planner.
//!
//! Answers "how do I get from here to there?" with up to three candidate
//! itineraries of walk, bus and metro legs.
//!
//! Planning falls through a fixed chain of stages: itineraries built from
//! road-routing results, then itineraries synthesized from heuristic
//! timings and live vehicle positions, then a canned itinerary.

mod config;
mod external;
mod facade;
mod fallback;
mod rank;
mod synthesize;

pub use config::{LegCost, PlannerConfig};
pub use external::ExternalPlanner;
pub use facade::{
    PlanOutcome, PlanRequest, PlanStage, StrategyOutcome, TripPlanner, VehicleSource,
};
pub use fallback::fallback_itinerary;
pub use rank::{pad_alternatives, rank_and_pad, rank_itineraries};
pub use synthesize::{RouteArchetype, SegmentSynthesizer};
