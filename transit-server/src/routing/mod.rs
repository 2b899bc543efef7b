//! Road-routing client.
//!
//! Wraps an OSRM-compatible routing service, which returns road-following
//! polylines with distance and duration between two coordinates.
//!
//! Routing is best-effort: callers get `None` for any failure and are
//! expected to skip the option that needed the route.

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, OsrmClient, Profile, RoadRoute, RouteFetcher, RoutingConfig};
pub use error::RoutingError;
pub use types::{Geometry, OsrmRoute, RouteResponse};
