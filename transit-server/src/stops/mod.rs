//! Stop index and nearest-stop lookup.
//!
//! Stops are loaded once at startup, either from the bundled dataset
//! (city bus stops plus metro stations) or from a JSON file, and never
//! change afterwards.

mod error;
mod index;
mod nearest;

pub use error::StopIndexError;
pub use index::StopIndex;
pub use nearest::{KM_PER_DEGREE, NearestStop, nearest_stop};
