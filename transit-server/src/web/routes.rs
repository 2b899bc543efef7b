//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::carpool::CarpoolError;
use crate::domain::{LatLng, Preference, StopKind};
use crate::feed::{VehicleQuery, filter_vehicles};
use crate::planner::{PlanRequest, TripPlanner, VehicleSource};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops", get(list_stops))
        .route("/api/stops/nearest", get(nearest_stop))
        .route("/api/buses", get(list_buses))
        .route("/api/plan", post(plan_trip))
        .route("/api/carpool/rides", get(search_rides))
        .route("/api/carpool/rides/:id/bookings", post(book_ride))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_kind(kind: Option<&str>) -> Result<Option<StopKind>, AppError> {
    match kind.map(|k| k.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(None),
        Some("bus") => Ok(Some(StopKind::Bus)),
        Some("metro") => Ok(Some(StopKind::Metro)),
        Some(other) => Err(AppError::BadRequest {
            message: format!("Invalid stop kind: {other}"),
        }),
    }
}

fn parse_point(lat: f64, lng: f64, what: &str) -> Result<LatLng, AppError> {
    LatLng::new(lat, lng).map_err(|e| AppError::BadRequest {
        message: format!("Invalid {what}: {e}"),
    })
}

/// List stops, optionally of one kind.
async fn list_stops(
    State(state): State<AppState>,
    query: Result<Query<StopsQuery>, QueryRejection>,
) -> Result<Json<StopsResponse>, AppError> {
    let Query(req) = query?;
    let stops = match parse_kind(req.kind.as_deref())? {
        Some(kind) => state.stops.of_kind(kind).cloned().collect(),
        None => state.stops.all().to_vec(),
    };
    Ok(Json(StopsResponse { stops }))
}

/// Find the stop closest to a point.
async fn nearest_stop(
    State(state): State<AppState>,
    query: Result<Query<NearestStopQuery>, QueryRejection>,
) -> Result<Json<NearestStopResponse>, AppError> {
    let Query(req) = query?;
    let point = parse_point(req.lat, req.lng, "location")?;
    let kind = parse_kind(req.kind.as_deref())?;

    let nearest = state
        .stops
        .nearest(point, kind)
        .ok_or_else(|| AppError::NotFound {
            message: "No stops loaded".to_string(),
        })?;

    let distance_km = nearest.distance_km();
    Ok(Json(NearestStopResponse {
        stop: nearest.stop.clone(),
        distance_km,
        walk_minutes: state.planner.walk_minutes(distance_km),
    }))
}

/// Live vehicles matching the query filters.
async fn list_buses(
    State(state): State<AppState>,
    query: Result<Query<VehicleQuery>, QueryRejection>,
) -> Result<Json<BusesResponse>, AppError> {
    let Query(query) = query?;
    let snapshot = state
        .vehicles
        .snapshot()
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Vehicle feed unavailable: {e}"),
        })?;

    let buses = filter_vehicles(&snapshot.vehicles, &query)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(BusesResponse::new(&snapshot, buses)))
}

/// Plan a trip between two points.
async fn plan_trip(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: PlanTripRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(&body), "Rejected plan request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let start = parse_point(req.start.lat, req.start.lng, "start")?;
    let end = parse_point(req.end.lat, req.end.lng, "end")?;
    let preference = match req.preference.as_deref().map(str::trim) {
        None | Some("") => Preference::default(),
        Some(p) => p.parse::<Preference>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
    };

    let mut request = PlanRequest::new(start, end).with_preference(preference);
    if let Some(name) = req.start.name.filter(|n| !n.trim().is_empty()) {
        request = request.with_start_name(name);
    }
    if let Some(name) = req.end.name.filter(|n| !n.trim().is_empty()) {
        request = request.with_end_name(name);
    }

    let planner = TripPlanner::new(
        state.routes.as_ref(),
        state.vehicles.as_ref(),
        &state.stops,
        &state.planner,
    );
    let outcome = planner.plan(&request).await;
    info!(
        stage = ?outcome.stage,
        itineraries = outcome.itineraries.len(),
        preference = preference.as_str(),
        "Planned trip"
    );

    Ok(Json(PlanTripResponse::from_outcome(&outcome)).into_response())
}

/// Search carpool rides.
async fn search_rides(
    State(state): State<AppState>,
    query: Result<Query<RideSearchQuery>, QueryRejection>,
) -> Result<Json<RidesResponse>, AppError> {
    let Query(req) = query?;
    let members = req.members.unwrap_or(1).max(1);
    let rides = state.carpool.search(&req.start, &req.end, members).await;
    Ok(Json(RidesResponse { rides }))
}

/// Book seats on a carpool ride.
async fn book_ride(
    State(state): State<AppState>,
    Path(ride_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let req: BookingRequest = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })?;

    let booking = state.carpool.book(&ride_id, req.members).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse { booking })))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl From<CarpoolError> for AppError {
    fn from(e: CarpoolError) -> Self {
        let message = e.to_string();
        match e {
            CarpoolError::UnknownRide(_) => AppError::NotFound { message },
            CarpoolError::NoMembers => AppError::BadRequest { message },
            CarpoolError::NotEnoughSeats { .. } => AppError::Conflict { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::*;
    use crate::cache::{CachedRouteFetcher, RouteCacheConfig};
    use crate::carpool::RideBoard;
    use crate::feed::{FeedConfig, VehicleFeedClient, VehicleStore};
    use crate::planner::PlannerConfig;
    use crate::routing::{OsrmClient, RoutingConfig};
    use crate::stops::StopIndex;

    /// State with bundled stops, fallback vehicles and no road routing.
    fn offline_state() -> AppState {
        let feed = VehicleFeedClient::new(&FeedConfig::new()).unwrap();
        let routes = CachedRouteFetcher::new(
            OsrmClient::new(RoutingConfig::default()).unwrap(),
            &RouteCacheConfig::default(),
        );
        AppState::new(
            StopIndex::bundled().unwrap(),
            Arc::new(VehicleStore::new(feed)),
            routes,
            PlannerConfig::default().with_external_planner(false),
            RideBoard::sample(),
        )
    }

    async fn serve() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(offline_state()))
                .await
                .unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn health_is_ok() {
        let addr = serve().await;
        let body = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn stops_by_kind() {
        let addr = serve().await;

        let all: Value = reqwest::get(format!("http://{addr}/api/stops"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let metro: Value = reqwest::get(format!("http://{addr}/api/stops?kind=metro"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let all = all["stops"].as_array().unwrap();
        let metro = metro["stops"].as_array().unwrap();
        assert!(!metro.is_empty());
        assert!(metro.len() < all.len());
        assert!(metro.iter().all(|s| s["kind"] == "metro"));

        let resp = reqwest::get(format!("http://{addr}/api/stops?kind=tram"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn nearest_bus_stop() {
        let addr = serve().await;
        let body: Value = reqwest::get(format!(
            "http://{addr}/api/stops/nearest?lat=12.9778&lng=77.5713&kind=bus"
        ))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

        assert_eq!(body["stop"]["id"], "majestic");
        assert_eq!(body["walkMinutes"], 0);

        let resp = reqwest::get(format!("http://{addr}/api/stops/nearest?lat=95&lng=77.5"))
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_query_is_json_error() {
        let addr = serve().await;

        for path in [
            "/api/stops/nearest?lat=abc&lng=1",
            "/api/stops/nearest?lng=77.5",
            "/api/carpool/rides?members=abc",
            "/api/buses?wheelchair=yes",
        ] {
            let resp = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
            assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST, "{path}");
            let content_type = resp
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            assert!(content_type.starts_with("application/json"), "{path}");
            let body: Value = resp.json().await.unwrap();
            assert!(
                body["error"]
                    .as_str()
                    .is_some_and(|e| e.contains("query string")),
                "{path}: {body}"
            );
        }
    }

    #[tokio::test]
    async fn buses_are_filtered() {
        let addr = serve().await;

        let all: Value = reqwest::get(format!("http://{addr}/api/buses"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(all["buses"].as_array().unwrap().len(), 3);
        assert_eq!(all["sequence"], 1);

        let ramps: Value = reqwest::get(format!("http://{addr}/api/buses?ramps=true&avoidSteep=true"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let ids: Vec<_> = ramps["buses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["bus-101"]);
    }

    #[tokio::test]
    async fn plan_returns_ranked_itineraries() {
        let addr = serve().await;
        let body: Value = reqwest::Client::new()
            .post(format!("http://{addr}/api/plan"))
            .json(&json!({
                "start": {"lat": 12.9716, "lng": 77.5946},
                "end": {"lat": 12.9352, "lng": 77.6245, "name": "Sony World"},
                "preference": "cost"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["stage"], "heuristic_synthesis");
        let itineraries = body["itineraries"].as_array().unwrap();
        assert_eq!(itineraries.len(), 3);

        let costs: Vec<_> = itineraries
            .iter()
            .map(|i| i["estimatedCost"].as_u64().unwrap())
            .collect();
        let mut sorted = costs.clone();
        sorted.sort();
        assert_eq!(costs, sorted);
        assert!(itineraries.iter().all(|i| !i["steps"].as_array().unwrap().is_empty()));
    }

    #[tokio::test]
    async fn plan_rejects_bad_input() {
        let addr = serve().await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://{addr}/api/plan"))
            .json(&json!({
                "start": {"lat": 12.97, "lng": 77.59},
                "end": {"lat": 12.93, "lng": 77.62},
                "preference": "fastest"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "unknown preference: fastest");

        let resp = client
            .post(format!("http://{addr}/api/plan"))
            .json(&json!({
                "start": {"lat": 12.97, "lng": 200.0},
                "end": {"lat": 12.93, "lng": 77.62}
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

        let resp = client
            .post(format!("http://{addr}/api/plan"))
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn carpool_search_and_book() {
        let addr = serve().await;
        let client = reqwest::Client::new();

        let rides: Value = client
            .get(format!("http://{addr}/api/carpool/rides?start=noida&members=2"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(rides["rides"][0]["id"], "ride-03");

        let resp = client
            .post(format!("http://{addr}/api/carpool/rides/ride-03/bookings"))
            .json(&json!({"members": 2}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["booking"]["seatsLeft"], 1);

        let resp = client
            .post(format!("http://{addr}/api/carpool/rides/ride-03/bookings"))
            .json(&json!({"members": 2}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CONFLICT);

        let resp = client
            .post(format!("http://{addr}/api/carpool/rides/ride-99/bookings"))
            .json(&json!({"members": 1}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
