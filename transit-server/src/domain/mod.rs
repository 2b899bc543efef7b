//! Domain types for the transit planner.
//!
//! These types represent validated transit data: coordinates, stops, live
//! vehicles and the itineraries the planner produces. Types that carry an
//! invariant enforce it at construction time.

mod coord;
mod error;
mod itinerary;
mod preference;
mod stop;
mod vehicle;

pub use coord::{InvalidCoordinate, LatLng};
pub use error::DomainError;
pub use itinerary::{BusLeg, Itinerary, MetroLeg, Segment, Step, StepKind, Walk};
pub use preference::Preference;
pub use stop::{Stop, StopKind};
pub use vehicle::{VehiclePosition, first_number, occupancy_rank};
