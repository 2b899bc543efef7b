//! OSRM HTTP client.

use std::fmt;
use std::future::Future;

use tracing::{debug, warn};

use crate::domain::LatLng;

use super::error::RoutingError;
use super::types::RouteResponse;

/// Default base URL: the public OSRM demo server.
pub const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Travel profile understood by the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    Driving,
    Foot,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Driving => "driving",
            Profile::Foot => "foot",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A road-following route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRoute {
    /// Polyline in `[lat, lng]` order
    pub coordinates: Vec<LatLng>,
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Something that can produce road routes.
///
/// Implementations swallow their own failures: `None` means "no route
/// available", whatever the cause.
pub trait RouteFetcher: Send + Sync {
    fn route(
        &self,
        from: LatLng,
        to: LatLng,
        profile: Profile,
    ) -> impl Future<Output = Option<RoadRoute>> + Send;
}

/// Configuration for the routing client.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Base URL of the OSRM server, without a trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or a self-hosted server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the OSRM `/route/v1` endpoint.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn route_url(&self, from: LatLng, to: LatLng, profile: Profile) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            profile.as_str(),
            from.lng,
            from.lat,
            to.lng,
            to.lat
        )
    }

    /// Fetch a route, reporting why it failed.
    pub async fn try_route(
        &self,
        from: LatLng,
        to: LatLng,
        profile: Profile,
    ) -> Result<RoadRoute, RoutingError> {
        let url = self.route_url(from, to, profile);

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: RouteResponse =
            serde_json::from_str(&body).map_err(|e| RoutingError::Json {
                message: e.to_string(),
            })?;

        parsed.into_road_route()
    }
}

impl RouteFetcher for OsrmClient {
    async fn route(&self, from: LatLng, to: LatLng, profile: Profile) -> Option<RoadRoute> {
        match self.try_route(from, to, profile).await {
            Ok(route) => {
                debug!(
                    %profile,
                    from = %from,
                    to = %to,
                    distance_km = route.distance_km,
                    duration_min = route.duration_min,
                    "Fetched road route"
                );
                Some(route)
            }
            Err(e) => {
                warn!(%profile, from = %from, to = %to, error = %e, "Road route unavailable");
                None
            }
        }
    }
}
