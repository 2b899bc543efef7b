//! Data transfer objects for the web API.
//!
//! Field names follow what the map frontend already consumes, so most
//! responses are camelCase.

use serde::{Deserialize, Serialize};

use crate::carpool::{Booking, Ride};
use crate::domain::{Itinerary, LatLng, Segment, Step, StepKind, Stop, VehiclePosition};
use crate::feed::VehicleSnapshot;
use crate::planner::{PlanOutcome, PlanStage};

/// Query for listing stops.
#[derive(Debug, Default, Deserialize)]
pub struct StopsQuery {
    /// "bus" or "metro"
    pub kind: Option<String>,
}

/// Response listing stops.
#[derive(Debug, Serialize)]
pub struct StopsResponse {
    pub stops: Vec<Stop>,
}

/// Query for the nearest stop.
#[derive(Debug, Deserialize)]
pub struct NearestStopQuery {
    pub lat: f64,
    pub lng: f64,
    /// "bus" or "metro"
    pub kind: Option<String>,
}

/// Nearest stop with the walk to reach it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestStopResponse {
    pub stop: Stop,
    pub distance_km: f64,
    pub walk_minutes: u32,
}

/// Live vehicles after filtering.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusesResponse {
    pub buses: Vec<VehiclePosition>,
    /// RFC 3339 time the snapshot was fetched
    pub fetched_at: String,
    pub sequence: u64,
}

impl BusesResponse {
    pub fn new(snapshot: &VehicleSnapshot, buses: Vec<VehiclePosition>) -> Self {
        Self {
            buses,
            fetched_at: snapshot.fetched_at.to_rfc3339(),
            sequence: snapshot.sequence,
        }
    }
}

/// A trip endpoint as picked on the map.
#[derive(Debug, Deserialize)]
pub struct PlaceRequest {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
}

/// Request body for trip planning.
#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    pub start: PlaceRequest,
    pub end: PlaceRequest,
    /// "time", "cost" or "switches"; defaults to "time"
    pub preference: Option<String>,
}

/// One rendered step of an itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step: usize,
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub description: String,
    /// Minutes, including any wait
    pub duration: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
}

/// A candidate trip.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResult {
    pub id: String,
    pub name: String,
    pub total_travel_time: u32,
    pub estimated_cost: u32,
    pub transfers: usize,
    pub steps: Vec<StepResult>,
    /// `[lat, lng]` pairs for drawing on the map
    pub coordinates: Vec<[f64; 2]>,
}

/// Response for trip planning.
#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    /// Stage that produced the itineraries
    pub stage: PlanStage,
    /// Best first
    pub itineraries: Vec<ItineraryResult>,
}

/// Query for ride search.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RideSearchQuery {
    pub start: String,
    pub end: String,
    /// Party size; rides with fewer free seats are left out
    pub members: Option<u32>,
}

/// Response for ride search.
#[derive(Debug, Serialize)]
pub struct RidesResponse {
    pub rides: Vec<Ride>,
}

/// Request body for booking a ride.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub members: u32,
}

/// Response for a booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: Booking,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StepResult {
    pub fn from_step(step: &Step<'_>) -> Self {
        let mut result = Self {
            step: step.number,
            kind: step.kind,
            description: step.description.clone(),
            duration: step.duration_min,
            from_stop: None,
            to_stop: None,
            bus_id: None,
            route: None,
            wait_time: None,
            line: None,
            cost: None,
        };

        match step.segment {
            Segment::Walk(walk) => {
                result.to_stop = Some(walk.to.clone());
            }
            Segment::Bus(bus) => {
                result.from_stop = Some(bus.from_stop.clone());
                result.to_stop = Some(bus.to_stop.clone());
                result.bus_id = bus.bus_id.clone();
                result.route = Some(bus.route.clone());
                result.wait_time = Some(bus.wait_min);
                result.cost = Some(bus.cost);
            }
            Segment::Metro(metro) => {
                result.from_stop = Some(metro.from_stop.clone());
                result.to_stop = Some(metro.to_stop.clone());
                result.line = Some(metro.line.clone());
                result.cost = Some(metro.cost);
            }
        }

        result
    }
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            id: itinerary.id().to_string(),
            name: itinerary.name().to_string(),
            total_travel_time: itinerary.total_travel_time_min(),
            estimated_cost: itinerary.estimated_cost(),
            transfers: itinerary.transfer_count(),
            steps: itinerary.steps().iter().map(StepResult::from_step).collect(),
            coordinates: itinerary
                .coordinates()
                .iter()
                .map(|c: &LatLng| [c.lat, c.lng])
                .collect(),
        }
    }
}

impl PlanTripResponse {
    pub fn from_outcome(outcome: &PlanOutcome) -> Self {
        Self {
            stage: outcome.stage,
            itineraries: outcome
                .itineraries
                .iter()
                .map(ItineraryResult::from_itinerary)
                .collect(),
        }
    }
}
