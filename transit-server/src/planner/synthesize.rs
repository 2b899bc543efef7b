//! Heuristic itinerary synthesis.
//!
//! Builds the three candidate trip shapes from the stop index, fixed leg
//! timings and the live vehicle snapshot. No I/O happens here; the same
//! inputs always produce the same itineraries.

use crate::domain::{
    BusLeg, Itinerary, MetroLeg, Segment, Stop, StopKind, VehiclePosition, Walk,
};
use crate::stops::{NearestStop, StopIndex};

use super::config::PlannerConfig;
use super::facade::PlanRequest;

/// Destination label used when the request names none.
const FINAL_DESTINATION: &str = "final destination";

/// The trip shapes the synthesizer knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteArchetype {
    /// One bus from the start stop to the end stop.
    Direct,
    /// Bus to a metro station near the midpoint, then metro.
    BusMetro,
    /// Bus to a stop near the midpoint, then a second bus.
    BusBus,
}

impl RouteArchetype {
    pub const ALL: [RouteArchetype; 3] = [
        RouteArchetype::Direct,
        RouteArchetype::BusMetro,
        RouteArchetype::BusBus,
    ];

    /// Route number used in ids and names.
    pub fn number(&self) -> u32 {
        match self {
            RouteArchetype::Direct => 1,
            RouteArchetype::BusMetro => 2,
            RouteArchetype::BusBus => 3,
        }
    }
}

/// Start and end of a trip, snapped to their nearest stops.
struct Ends<'a> {
    start_stop: NearestStop<'a>,
    end_stop: NearestStop<'a>,
}

/// Builds candidate itineraries from heuristic timings.
pub struct SegmentSynthesizer<'a> {
    stops: &'a StopIndex,
    config: &'a PlannerConfig,
}

impl<'a> SegmentSynthesizer<'a> {
    pub fn new(stops: &'a StopIndex, config: &'a PlannerConfig) -> Self {
        Self { stops, config }
    }

    fn resolve(&self, request: &PlanRequest) -> Option<Ends<'a>> {
        let start_stop = self.stops.nearest(request.start, None)?;
        let end_stop = self.stops.nearest(request.end, None)?;
        Some(Ends {
            start_stop,
            end_stop,
        })
    }

    /// Build every archetype that can be built, in route-number order.
    ///
    /// Returns an empty list when the stop index is empty.
    pub fn synthesize_all(
        &self,
        request: &PlanRequest,
        vehicles: &[VehiclePosition],
    ) -> Vec<Itinerary> {
        let Some(ends) = self.resolve(request) else {
            return Vec::new();
        };

        RouteArchetype::ALL
            .iter()
            .filter_map(|archetype| self.build(*archetype, request, &ends, vehicles))
            .collect()
    }

    /// Build a single archetype.
    pub fn synthesize(
        &self,
        archetype: RouteArchetype,
        request: &PlanRequest,
        vehicles: &[VehiclePosition],
    ) -> Option<Itinerary> {
        let ends = self.resolve(request)?;
        self.build(archetype, request, &ends, vehicles)
    }

    /// Wait at `stop` and the id of the vehicle it belongs to.
    ///
    /// The wait is the smallest ETA among vehicles within the nearby radius;
    /// with none nearby it is the configured default and there is no id.
    pub fn realtime_wait(&self, stop: &Stop, vehicles: &[VehiclePosition]) -> (u32, Option<String>) {
        let position = stop.position();
        vehicles
            .iter()
            .filter(|v| position.haversine_km(&v.position()) < self.config.nearby_radius_km)
            .min_by_key(|v| v.eta_minutes())
            .map(|v| (v.eta_minutes(), Some(v.id.clone())))
            .unwrap_or((self.config.default_wait_min, None))
    }

    fn build(
        &self,
        archetype: RouteArchetype,
        request: &PlanRequest,
        ends: &Ends<'_>,
        vehicles: &[VehiclePosition],
    ) -> Option<Itinerary> {
        let start = ends.start_stop.stop;
        let end = ends.end_stop.stop;
        let initial_walk = Walk::new(
            self.config.walk_minutes(ends.start_stop.distance_km()),
            start.name.clone(),
        );
        let final_walk = Walk::new(
            self.config.walk_minutes(ends.end_stop.distance_km()),
            request.end_name.as_deref().unwrap_or(FINAL_DESTINATION),
        );
        let (wait_min, bus_id) = self.realtime_wait(start, vehicles);
        let midpoint = start.position().midpoint(&end.position());

        let mut coordinates = vec![request.start, start.position()];
        let legs: Vec<Segment> = match archetype {
            RouteArchetype::Direct => {
                let leg = self.config.direct_bus;
                vec![Segment::Bus(BusLeg {
                    from_stop: start.name.clone(),
                    to_stop: end.name.clone(),
                    bus_id,
                    route: format!("{} ⇄ {}", start.label(), end.label()),
                    wait_min,
                    travel_min: leg.travel_min,
                    cost: leg.cost,
                })]
            }
            RouteArchetype::BusMetro => {
                let station = self.stops.nearest(midpoint, Some(StopKind::Metro));
                let station_name = station.map_or("Metro Station", |s| s.stop.name.as_str());
                let transfer_min = station.map_or(self.config.metro_transfer_walk_min, |s| {
                    self.config.walk_minutes(s.distance_km())
                });
                let line = station
                    .and_then(|s| s.stop.first_line())
                    .unwrap_or(&self.config.default_metro_line);
                if let Some(s) = station {
                    coordinates.push(s.stop.position());
                }

                let bus = self.config.feeder_bus;
                let metro = self.config.metro;
                vec![
                    Segment::Bus(BusLeg {
                        from_stop: start.name.clone(),
                        to_stop: station_name.to_string(),
                        bus_id,
                        route: format!("{} → Metro", start.label()),
                        wait_min,
                        travel_min: bus.travel_min,
                        cost: bus.cost,
                    }),
                    Segment::Walk(Walk::new(transfer_min, "transfer point")),
                    Segment::Metro(MetroLeg {
                        from_stop: station_name.to_string(),
                        to_stop: end.name.clone(),
                        line: line.to_string(),
                        travel_min: metro.travel_min,
                        cost: metro.cost,
                    }),
                ]
            }
            RouteArchetype::BusBus => {
                let transfer = self.stops.nearest(midpoint, Some(StopKind::Bus));
                let transfer_name = transfer.map_or("Transfer Point", |s| s.stop.name.as_str());
                let transfer_min = transfer.map_or(self.config.bus_transfer_walk_min, |s| {
                    self.config.walk_minutes(s.distance_km())
                });
                if let Some(s) = transfer {
                    coordinates.push(s.stop.position());
                }

                let first = self.config.first_bus;
                let second = self.config.second_bus;
                vec![
                    Segment::Bus(BusLeg {
                        from_stop: start.name.clone(),
                        to_stop: transfer_name.to_string(),
                        bus_id,
                        route: format!("{} → Transfer", start.label()),
                        wait_min,
                        travel_min: first.travel_min,
                        cost: first.cost,
                    }),
                    Segment::Walk(Walk::new(transfer_min, "transfer point")),
                    Segment::Bus(BusLeg {
                        from_stop: transfer_name.to_string(),
                        to_stop: end.name.clone(),
                        bus_id: None,
                        route: format!("Transfer → {}", end.label()),
                        wait_min: self.config.second_bus_wait_min,
                        travel_min: second.travel_min,
                        cost: second.cost,
                    }),
                ]
            }
        };
        coordinates.push(end.position());
        coordinates.push(request.end);

        let mut segments = Vec::with_capacity(legs.len() + 2);
        segments.push(Segment::Walk(initial_walk));
        segments.extend(legs);
        segments.push(Segment::Walk(final_walk));

        let n = archetype.number();
        Itinerary::new(
            format!("route-{n}"),
            format!("Route {n} ({})", request.preference.label()),
            segments,
            coordinates,
        )
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LatLng, Preference};

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    /// Central Bangalore to Koramangala, as the frontend sends it.
    fn request(preference: Preference) -> PlanRequest {
        PlanRequest::new(point(12.9716, 77.5946), point(12.9352, 77.6245))
            .with_preference(preference)
    }

    fn vehicle(id: &str, lat: f64, lng: f64, eta: &str) -> VehiclePosition {
        VehiclePosition {
            id: id.into(),
            lat,
            lng,
            route: String::new(),
            eta: Some(eta.into()),
            cost: None,
            occupancy: None,
            speed: None,
            start: None,
            end: None,
            provider: None,
            wheelchair_accessible: false,
            has_ramps: false,
            elevator_access: false,
            is_steep: false,
        }
    }

    #[test]
    fn builds_three_archetypes() {
        let stops = StopIndex::bundled().unwrap();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);

        let options = synth.synthesize_all(&request(Preference::Cost), &[]);
        assert_eq!(options.len(), 3);

        let ids: Vec<_> = options.iter().map(Itinerary::id).collect();
        assert_eq!(ids, ["route-1", "route-2", "route-3"]);
        assert_eq!(options[0].name(), "Route 1 (Cost Efficient)");

        assert_eq!(options[0].estimated_cost(), 30);
        assert_eq!(options[1].estimated_cost(), 35);
        assert_eq!(options[2].estimated_cost(), 30);

        assert_eq!(options[0].transfer_count(), 0);
        assert_eq!(options[1].transfer_count(), 1);
        assert_eq!(options[2].transfer_count(), 1);
    }

    #[test]
    fn direct_route_timings() {
        let stops = StopIndex::bundled().unwrap();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);

        let direct = synth
            .synthesize(RouteArchetype::Direct, &request(Preference::Time), &[])
            .unwrap();

        // The end point sits on a stop, so there is no final walk
        let segments = direct.segments();
        assert_eq!(segments.len(), 2);
        let Segment::Walk(walk) = &segments[0] else {
            panic!("expected initial walk, got {:?}", segments[0]);
        };
        let Segment::Bus(bus) = &segments[1] else {
            panic!("expected bus, got {:?}", segments[1]);
        };

        // No vehicles: default wait and no bus id
        assert_eq!(bus.wait_min, 10);
        assert_eq!(bus.bus_id, None);
        assert_eq!(bus.travel_min, 25);
        assert_eq!(walk.to, bus.from_stop);
        assert_eq!(direct.total_travel_time_min(), walk.duration_min + 35);

        let coords = direct.coordinates();
        assert_eq!(coords.first(), Some(&point(12.9716, 77.5946)));
        assert_eq!(coords.last(), Some(&point(12.9352, 77.6245)));
        assert_eq!(coords.len(), 4);
    }

    #[test]
    fn bus_metro_uses_station_line() {
        let stops = StopIndex::bundled().unwrap();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);

        let itinerary = synth
            .synthesize(RouteArchetype::BusMetro, &request(Preference::Time), &[])
            .unwrap();

        let metro = itinerary
            .segments()
            .iter()
            .find_map(|s| match s {
                Segment::Metro(m) => Some(m),
                _ => None,
            })
            .unwrap();
        let station = stops.get("tty").unwrap();
        assert_eq!(metro.from_stop, station.name);
        assert_eq!(Some(metro.line.as_str()), station.first_line());
        assert_eq!(itinerary.coordinates().len(), 5);
    }

    #[test]
    fn final_walk_uses_destination_name() {
        let stops = StopIndex::bundled().unwrap();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);

        // Off-stop destination so the final walk is kept
        let request = PlanRequest::new(point(12.9716, 77.5946), point(12.94, 77.63))
            .with_end_name("Office");
        let direct = synth.synthesize(RouteArchetype::Direct, &request, &[]).unwrap();

        let Some(Segment::Walk(last)) = direct.segments().last() else {
            panic!("expected final walk");
        };
        assert_eq!(last.to, "Office");
    }

    #[test]
    fn realtime_wait_uses_soonest_nearby_vehicle() {
        let stops = StopIndex::bundled().unwrap();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);
        let stop = stops.get("majestic").unwrap();

        let vehicles = vec![
            vehicle("near-slow", stop.lat + 0.001, stop.lng, "8 mins"),
            vehicle("near-fast", stop.lat, stop.lng + 0.001, "2 mins"),
            vehicle("far", stop.lat + 0.1, stop.lng, "1 min"),
        ];
        assert_eq!(
            synth.realtime_wait(stop, &vehicles),
            (2, Some("near-fast".to_string()))
        );

        assert_eq!(synth.realtime_wait(stop, &vehicles[2..]), (10, None));
    }

    #[test]
    fn empty_index_builds_nothing() {
        let stops = StopIndex::empty();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);

        assert!(synth.synthesize_all(&request(Preference::Time), &[]).is_empty());
    }

    #[test]
    fn bus_only_index_falls_back_to_default_metro() {
        let json = r#"{"stops":[
            {"id":"a","name":"Stop A","lat":12.97,"lng":77.59,"kind":"bus"},
            {"id":"b","name":"Stop B","lat":12.93,"lng":77.62,"kind":"bus"}
        ]}"#;
        let stops = StopIndex::from_json(json).unwrap();
        let config = PlannerConfig::default();
        let synth = SegmentSynthesizer::new(&stops, &config);

        let itinerary = synth
            .synthesize(RouteArchetype::BusMetro, &request(Preference::Time), &[])
            .unwrap();

        let transfer_walk = itinerary.segments().iter().find_map(|s| match s {
            Segment::Walk(w) if w.to == "transfer point" => Some(w.duration_min),
            _ => None,
        });
        assert_eq!(transfer_walk, Some(5));

        let metro = itinerary
            .segments()
            .iter()
            .find_map(|s| match s {
                Segment::Metro(m) => Some(m),
                _ => None,
            })
            .unwrap();
        assert_eq!(metro.from_stop, "Metro Station");
        assert_eq!(metro.line, "Green Line");
    }
}
