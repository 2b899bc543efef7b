//! Text and accessibility filtering of live vehicles.

use serde::Deserialize;

use crate::domain::VehiclePosition;

/// Occupancy rank above which a vehicle counts as crowded.
const CROWDED_ABOVE: u8 = 2;

/// Rank assumed for vehicles with unknown occupancy.
const UNKNOWN_OCCUPANCY_RANK: u8 = 2;

/// Filter options for the vehicle list.
///
/// Field names match the query string of `GET /api/buses`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleQuery {
    pub start: String,
    pub end: String,
    pub wheelchair: bool,
    pub ramps: bool,
    pub elevators: bool,
    pub avoid_steep: bool,
    pub avoid_crowded: bool,
    pub calm_mode: bool,
}

fn matches_text(needle: &str, endpoint: Option<&str>, route: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let haystack = format!("{} {}", endpoint.unwrap_or_default(), route).to_lowercase();
    haystack.contains(&needle)
}

fn passes_accessibility(vehicle: &VehiclePosition, query: &VehicleQuery) -> bool {
    if query.wheelchair && !vehicle.wheelchair_accessible {
        return false;
    }
    if query.ramps && !vehicle.has_ramps {
        return false;
    }
    if query.elevators && !vehicle.elevator_access {
        return false;
    }
    if query.avoid_steep && vehicle.is_steep {
        return false;
    }
    if query.avoid_crowded
        && vehicle.occupancy_rank().unwrap_or(UNKNOWN_OCCUPANCY_RANK) > CROWDED_ABOVE
    {
        return false;
    }
    true
}

/// Apply `query` to `vehicles`.
///
/// Calm mode orders the survivors from least to most crowded, keeping feed
/// order among equals and putting unknown occupancy last.
pub fn filter_vehicles<'a>(
    vehicles: &'a [VehiclePosition],
    query: &VehicleQuery,
) -> Vec<&'a VehiclePosition> {
    let mut result: Vec<&VehiclePosition> = vehicles
        .iter()
        .filter(|v| matches_text(&query.start, v.start.as_deref(), &v.route))
        .filter(|v| matches_text(&query.end, v.end.as_deref(), &v.route))
        .filter(|v| passes_accessibility(v, query))
        .collect();

    if query.calm_mode {
        result.sort_by_key(|v| v.occupancy_rank().unwrap_or(u8::MAX));
    }

    result
}
