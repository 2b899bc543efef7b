//! Itineraries assembled from road-routing results.
//!
//! Tries, in order: a bus along the driving route between the nearest
//! stops, a bus and metro split at the midpoint between them, and a direct
//! ride between the raw coordinates. The first shape that can be routed is
//! returned.

use tracing::debug;

use crate::domain::{BusLeg, Itinerary, LatLng, MetroLeg, Segment, Walk};
use crate::routing::{Profile, RoadRoute, RouteFetcher};
use crate::stops::StopIndex;

use super::config::PlannerConfig;
use super::facade::PlanRequest;

/// Plans using the road-routing service.
pub struct ExternalPlanner<'a, F> {
    fetcher: &'a F,
    stops: &'a StopIndex,
    config: &'a PlannerConfig,
}

fn whole_minutes(route: &RoadRoute) -> u32 {
    route.duration_min.round().max(0.0) as u32
}

impl<'a, F: RouteFetcher> ExternalPlanner<'a, F> {
    pub fn new(fetcher: &'a F, stops: &'a StopIndex, config: &'a PlannerConfig) -> Self {
        Self {
            fetcher,
            stops,
            config,
        }
    }

    fn walk_minutes(&self, leg: Option<&RoadRoute>) -> u32 {
        leg.map_or(self.config.default_walk_min, whole_minutes)
    }

    /// Build routed itineraries; empty when nothing could be routed.
    pub async fn plan(&self, request: &PlanRequest) -> Vec<Itinerary> {
        let (Some(start_stop), Some(end_stop)) = (
            self.stops.nearest(request.start, None),
            self.stops.nearest(request.end, None),
        ) else {
            debug!("No stops to route between");
            return Vec::new();
        };
        let start = start_stop.stop;
        let end = end_stop.stop;

        let (walk_in, walk_out, drive) = futures::join!(
            self.fetcher.route(request.start, start.position(), Profile::Foot),
            self.fetcher.route(end.position(), request.end, Profile::Foot),
            self.fetcher
                .route(start.position(), end.position(), Profile::Driving),
        );

        let destination = request
            .end_name
            .as_deref()
            .unwrap_or("destination")
            .to_string();
        let first_walk = Walk::new(self.walk_minutes(walk_in.as_ref()), start.name.clone());
        let last_walk = Walk::new(self.walk_minutes(walk_out.as_ref()), destination.clone());

        let polyline = |middle: &[&RoadRoute]| -> Vec<LatLng> {
            let mut coordinates: Vec<LatLng> = Vec::new();
            if let Some(walk) = &walk_in {
                coordinates.extend_from_slice(&walk.coordinates);
            }
            for leg in middle {
                coordinates.extend_from_slice(&leg.coordinates);
            }
            if let Some(walk) = &walk_out {
                coordinates.extend_from_slice(&walk.coordinates);
            }
            coordinates
        };

        if let Some(drive) = drive {
            debug!(from = %start.id, to = %end.id, "Routed direct bus");
            let segments = vec![
                Segment::Walk(first_walk),
                Segment::Bus(BusLeg {
                    from_stop: start.name.clone(),
                    to_stop: end.name.clone(),
                    bus_id: None,
                    route: format!("{} ⇌ {}", start.name, end.name),
                    wait_min: 0,
                    travel_min: whole_minutes(&drive),
                    cost: self.config.routed_bus_cost,
                }),
                Segment::Walk(last_walk),
            ];
            return Itinerary::new(
                "route-1",
                format!("{} ⇌ {}", start.name, end.name),
                segments,
                polyline(&[&drive]),
            )
            .into_iter()
            .collect();
        }

        let midpoint = start.position().midpoint(&end.position());
        let (to_mid, from_mid) = futures::join!(
            self.fetcher
                .route(start.position(), midpoint, Profile::Driving),
            self.fetcher.route(midpoint, end.position(), Profile::Driving),
        );

        if let (Some(to_mid), Some(from_mid)) = (to_mid, from_mid) {
            debug!(from = %start.id, to = %end.id, "Routed bus and metro via midpoint");
            let segments = vec![
                Segment::Walk(first_walk),
                Segment::Bus(BusLeg {
                    from_stop: start.name.clone(),
                    to_stop: "Transfer Point".to_string(),
                    bus_id: None,
                    route: format!("{} → Transfer", start.name),
                    wait_min: 0,
                    travel_min: whole_minutes(&to_mid),
                    cost: self.config.routed_bus_cost,
                }),
                Segment::Metro(MetroLeg {
                    from_stop: "Transfer Point".to_string(),
                    to_stop: end.name.clone(),
                    line: self.config.default_metro_line.clone(),
                    travel_min: whole_minutes(&from_mid),
                    cost: self.config.routed_metro_cost,
                }),
                Segment::Walk(last_walk),
            ];
            return Itinerary::new(
                "route-2",
                format!("{} ⇌ {} (via Metro)", start.name, end.name),
                segments,
                polyline(&[&to_mid, &from_mid]),
            )
            .into_iter()
            .collect();
        }

        let Some(direct) = self
            .fetcher
            .route(request.start, request.end, Profile::Driving)
            .await
        else {
            debug!("No routed option available");
            return Vec::new();
        };

        let origin = request.start_name.as_deref().unwrap_or("Start");
        let segments = vec![Segment::Bus(BusLeg {
            from_stop: origin.to_string(),
            to_stop: destination.clone(),
            bus_id: None,
            route: "Direct ride".to_string(),
            wait_min: 0,
            travel_min: whole_minutes(&direct),
            cost: self.config.direct_ride_cost,
        })];
        Itinerary::new(
            "route-3",
            format!("{origin} ⇌ {destination}"),
            segments,
            direct.coordinates,
        )
        .into_iter()
        .collect()
    }
}
