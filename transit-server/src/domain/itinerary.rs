//! Itinerary types.
//!
//! An `Itinerary` is a complete candidate trip from origin to destination,
//! made of ordered segments: walks, bus rides and metro rides.

use serde::Serialize;

use super::{DomainError, LatLng};

/// A walk, either to a stop, between stops, or to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Walking duration in minutes
    pub duration_min: u32,
    /// Where the walk ends, for display
    pub to: String,
}

impl Walk {
    /// Creates a new walk.
    pub fn new(duration_min: u32, to: impl Into<String>) -> Self {
        Self {
            duration_min,
            to: to.into(),
        }
    }
}

/// A bus ride between two stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusLeg {
    pub from_stop: String,
    pub to_stop: String,
    /// The vehicle expected to serve this leg, when the live feed knows one
    pub bus_id: Option<String>,
    /// Route label (e.g. "Majestic ⇄ Koramangala")
    pub route: String,
    /// Minutes until the bus arrives
    pub wait_min: u32,
    /// Minutes on board
    pub travel_min: u32,
    pub cost: u32,
}

/// A metro ride between two stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetroLeg {
    pub from_stop: String,
    pub to_stop: String,
    pub line: String,
    pub travel_min: u32,
    pub cost: u32,
}

/// A segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Walk(Walk),
    Bus(BusLeg),
    Metro(MetroLeg),
}

impl Segment {
    /// Duration in minutes; for a bus this includes the wait.
    pub fn duration_min(&self) -> u32 {
        match self {
            Segment::Walk(walk) => walk.duration_min,
            Segment::Bus(bus) => bus.wait_min + bus.travel_min,
            Segment::Metro(metro) => metro.travel_min,
        }
    }

    /// Fare for this segment (walks are free).
    pub fn cost(&self) -> u32 {
        match self {
            Segment::Walk(_) => 0,
            Segment::Bus(bus) => bus.cost,
            Segment::Metro(metro) => metro.cost,
        }
    }

    /// Returns true for bus and metro segments.
    pub fn is_transit(&self) -> bool {
        !matches!(self, Segment::Walk(_))
    }

    /// The step kind this segment renders as.
    pub fn kind(&self) -> StepKind {
        match self {
            Segment::Walk(_) => StepKind::Walk,
            Segment::Bus(_) => StepKind::Bus,
            Segment::Metro(_) => StepKind::Metro,
        }
    }

    /// Human-readable instruction for this segment.
    pub fn description(&self) -> String {
        match self {
            Segment::Walk(walk) => format!("Walk ({} min) to {}", walk.duration_min, walk.to),
            Segment::Bus(bus) => {
                let bus_id = bus.bus_id.as_deref().unwrap_or("N/A");
                let number = bus.bus_id.as_deref().unwrap_or(&bus.route);
                format!(
                    "Take Bus #{number} (Bus ID: {bus_id}). Real-Time Wait: {} min.",
                    bus.wait_min
                )
            }
            Segment::Metro(metro) => {
                format!("Switch to Metro {} to {}", metro.line, metro.to_stop)
            }
        }
    }
}

/// Mode of a rendered step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Walk,
    Bus,
    Metro,
}

/// A numbered, rendered segment as shown to the rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<'a> {
    /// 1-based position in the itinerary
    pub number: usize,
    pub kind: StepKind,
    pub description: String,
    pub duration_min: u32,
    pub segment: &'a Segment,
}

/// A complete candidate trip.
///
/// # Invariants
///
/// - At least one segment
/// - No zero-minute walks
/// - `total_travel_time_min` is the sum of segment durations
/// - `estimated_cost` is the sum of segment costs
/// - `transfer_count` is the number of transit segments minus one (min 0)
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    id: String,
    name: String,
    segments: Vec<Segment>,
    coordinates: Vec<LatLng>,
    total_travel_time_min: u32,
    estimated_cost: u32,
    transfer_count: usize,
}

impl Itinerary {
    /// Constructs an itinerary, deriving its totals from the segments.
    ///
    /// Zero-minute walks are dropped first; they add nothing to the trip.
    ///
    /// # Errors
    ///
    /// Returns `Err` if no segments remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{BusLeg, Itinerary, Segment, Walk};
    ///
    /// let itinerary = Itinerary::new(
    ///     "route-1",
    ///     "Route 1 (Time Efficient)",
    ///     vec![
    ///         Segment::Walk(Walk::new(4, "MG Road")),
    ///         Segment::Bus(BusLeg {
    ///             from_stop: "MG Road".into(),
    ///             to_stop: "Koramangala Sony World".into(),
    ///             bus_id: Some("bus-101".into()),
    ///             route: "MG Road ⇄ Koramangala".into(),
    ///             wait_min: 3,
    ///             travel_min: 25,
    ///             cost: 30,
    ///         }),
    ///         Segment::Walk(Walk::new(0, "final destination")),
    ///     ],
    ///     vec![],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(itinerary.total_travel_time_min(), 32);
    /// assert_eq!(itinerary.estimated_cost(), 30);
    /// assert_eq!(itinerary.transfer_count(), 0);
    /// assert_eq!(itinerary.segments().len(), 2);
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mut segments: Vec<Segment>,
        coordinates: Vec<LatLng>,
    ) -> Result<Self, DomainError> {
        segments.retain(|s| !matches!(s, Segment::Walk(walk) if walk.duration_min == 0));

        if segments.is_empty() {
            return Err(DomainError::EmptyItinerary);
        }

        Ok(Self::assemble(id.into(), name.into(), segments, coordinates))
    }

    /// Builds an itinerary from segments already known to be non-empty.
    pub(crate) fn assemble(
        id: String,
        name: String,
        segments: Vec<Segment>,
        coordinates: Vec<LatLng>,
    ) -> Self {
        let total_travel_time_min = segments.iter().map(Segment::duration_min).sum();
        let estimated_cost = segments.iter().map(Segment::cost).sum();
        let transit = segments.iter().filter(|s| s.is_transit()).count();

        Self {
            id,
            name,
            segments,
            coordinates,
            total_travel_time_min,
            estimated_cost,
            transfer_count: transit.saturating_sub(1),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Road-following or straight-line geometry for map display.
    pub fn coordinates(&self) -> &[LatLng] {
        &self.coordinates
    }

    pub fn total_travel_time_min(&self) -> u32 {
        self.total_travel_time_min
    }

    pub fn estimated_cost(&self) -> u32 {
        self.estimated_cost
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_count
    }

    /// Renders the segments as numbered steps.
    pub fn steps(&self) -> Vec<Step<'_>> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, segment)| Step {
                number: i + 1,
                kind: segment.kind(),
                description: segment.description(),
                duration_min: segment.duration_min(),
                segment,
            })
            .collect()
    }

    /// Returns a copy with a different id and name.
    pub fn renamed(&self, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..self.clone()
        }
    }
}
