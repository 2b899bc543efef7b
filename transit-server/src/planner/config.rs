//! Heuristic timings and fares for trip planning.

/// Travel time and fare of a synthesized transit leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegCost {
    pub travel_min: u32,
    pub cost: u32,
}

impl LegCost {
    pub const fn new(travel_min: u32, cost: u32) -> Self {
        Self { travel_min, cost }
    }
}

/// Configuration parameters for trip planning.
///
/// The heuristic planner has no timetable; every transit leg gets a fixed
/// travel time and fare from here. Only the wait at the first stop comes
/// from live data.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Average walking speed (km/h).
    pub walking_speed_kmh: f64,

    /// Vehicles closer than this to a stop count towards its wait (km).
    pub nearby_radius_km: f64,

    /// Wait assumed when no vehicle is near the stop (minutes).
    pub default_wait_min: u32,

    /// Single bus from start stop to end stop.
    pub direct_bus: LegCost,

    /// Bus from the start stop to the transfer metro station.
    pub feeder_bus: LegCost,

    /// Metro from the transfer station to the end stop.
    pub metro: LegCost,

    /// Line name used when the transfer station lists none.
    pub default_metro_line: String,

    /// Walk to the metro when no station could be resolved (minutes).
    pub metro_transfer_walk_min: u32,

    /// First bus of a two-bus trip.
    pub first_bus: LegCost,

    /// Second bus of a two-bus trip.
    pub second_bus: LegCost,

    /// Fixed wait for the second bus (minutes).
    pub second_bus_wait_min: u32,

    /// Walk between buses when no stop could be resolved (minutes).
    pub bus_transfer_walk_min: u32,

    /// Fare of a bus leg built from a driving route.
    pub routed_bus_cost: u32,

    /// Fare of a metro leg built from a driving route.
    pub routed_metro_cost: u32,

    /// Fare of the direct ride used when no stop-to-stop route exists.
    pub direct_ride_cost: u32,

    /// Walk assumed when a foot route is unavailable (minutes).
    pub default_walk_min: u32,

    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Whether to try the road-routing service before synthesizing.
    pub use_external_planner: bool,
}

impl PlannerConfig {
    /// Whole minutes needed to walk `distance_km`.
    pub fn walk_minutes(&self, distance_km: f64) -> u32 {
        if distance_km <= 0.0 || self.walking_speed_kmh <= 0.0 {
            return 0;
        }
        (distance_km / self.walking_speed_kmh * 60.0).round() as u32
    }

    /// Disable or enable the road-routing stage.
    pub fn with_external_planner(mut self, enabled: bool) -> Self {
        self.use_external_planner = enabled;
        self
    }

    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            walking_speed_kmh: 5.0,
            nearby_radius_km: 0.5,
            default_wait_min: 10,
            direct_bus: LegCost::new(25, 30),
            feeder_bus: LegCost::new(15, 20),
            metro: LegCost::new(20, 15),
            default_metro_line: "Green Line".to_string(),
            metro_transfer_walk_min: 5,
            first_bus: LegCost::new(12, 15),
            second_bus: LegCost::new(15, 15),
            second_bus_wait_min: 5,
            bus_transfer_walk_min: 3,
            routed_bus_cost: 30,
            routed_metro_cost: 15,
            direct_ride_cost: 50,
            default_walk_min: 5,
            max_results: 3,
            use_external_planner: true,
        }
    }
}
