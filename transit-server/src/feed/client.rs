//! Live vehicle feed HTTP client.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::VehiclePosition;

use super::error::FeedError;

/// Canned vehicles served when no feed is configured or the feed answers
/// with an unrecognised shape.
const FALLBACK_VEHICLES: &str = include_str!("../../data/fallback_buses.json");

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default refresh interval.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Configuration for the vehicle feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed URL; `None` serves the bundled fallback vehicles
    pub url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// How often the poller refreshes the snapshot
    pub poll_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self {
            url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Shapes the feed is known to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedPayload {
    List(Vec<VehiclePosition>),
    Wrapped { buses: Vec<VehiclePosition> },
    Other(serde::de::IgnoredAny),
}

/// The bundled fallback vehicles.
pub fn fallback_vehicles() -> Vec<VehiclePosition> {
    match serde_json::from_str(FALLBACK_VEHICLES) {
        Ok(vehicles) => vehicles,
        Err(e) => {
            warn!(error = %e, "Bundled fallback vehicles are malformed");
            Vec::new()
        }
    }
}

/// Decode a feed body.
///
/// Accepts a bare array or `{"buses": [...]}`; any other JSON value falls
/// back to the bundled vehicles. Non-JSON is an error.
fn parse_payload(body: &str) -> Result<Vec<VehiclePosition>, FeedError> {
    let payload: FeedPayload = serde_json::from_str(body).map_err(|e| FeedError::Json {
        message: e.to_string(),
    })?;

    Ok(match payload {
        FeedPayload::List(vehicles) | FeedPayload::Wrapped { buses: vehicles } => vehicles,
        FeedPayload::Other(_) => {
            warn!("Unrecognised feed payload, using fallback vehicles");
            fallback_vehicles()
        }
    })
}

/// Client for the live vehicle feed.
#[derive(Debug, Clone)]
pub struct VehicleFeedClient {
    http: reqwest::Client,
    url: Option<String>,
}

impl VehicleFeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
        })
    }

    /// Fetch the current vehicle list.
    pub async fn fetch(&self) -> Result<Vec<VehiclePosition>, FeedError> {
        let Some(url) = &self.url else {
            debug!("No feed URL configured, serving fallback vehicles");
            return Ok(fallback_vehicles());
        };

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_payload(&body)
    }
}
