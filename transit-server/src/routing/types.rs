//! OSRM response types.
//!
//! Only the fields the planner needs are modelled; everything else in the
//! response is ignored.

use serde::Deserialize;

use crate::domain::LatLng;

use super::client::RoadRoute;
use super::error::RoutingError;

/// Top-level `/route/v1` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// "Ok" on success, otherwise an error code such as "NoRoute"
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    pub geometry: Geometry,
    /// Metres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

/// GeoJSON line geometry; coordinates are `[lng, lat]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteResponse {
    /// Convert the first route into a `RoadRoute`.
    ///
    /// Flips coordinates to `[lat, lng]` order, metres to kilometres and
    /// seconds to minutes.
    pub fn into_road_route(self) -> Result<RoadRoute, RoutingError> {
        if self.code != "Ok" {
            return Err(RoutingError::NoRoute {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRoute {
                code: "Ok".to_string(),
                message: "response contained no routes".to_string(),
            })?;

        let coordinates = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| LatLng { lat, lng })
            .collect();

        Ok(RoadRoute {
            coordinates,
            distance_km: route.distance / 1000.0,
            duration_min: route.duration / 60.0,
        })
    }
}
