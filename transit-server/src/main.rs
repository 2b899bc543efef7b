use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_server::cache::{CachedRouteFetcher, RouteCacheConfig};
use transit_server::carpool::RideBoard;
use transit_server::config::ServerConfig;
use transit_server::feed::{VehicleFeedClient, VehicleStore};
use transit_server::planner::PlannerConfig;
use transit_server::routing::OsrmClient;
use transit_server::stops::StopIndex;
use transit_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "transit_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Load stops (bundled unless a file is configured)
    let stops = match &config.stops_file {
        Some(path) => StopIndex::from_file(path)?,
        None => StopIndex::bundled()?,
    };
    info!(stops = stops.len(), "Loaded stops");

    // Road routing, cached; planning skips it when no URL is configured
    let osrm = OsrmClient::new(config.routing.clone().unwrap_or_default())?;
    let routes = CachedRouteFetcher::new(osrm, &RouteCacheConfig::default());
    let planner = PlannerConfig::default().with_external_planner(config.routing.is_some());
    match &config.routing {
        Some(routing) => info!(base_url = %routing.base_url, "Road routing enabled"),
        None => info!("Road routing disabled"),
    }

    // Live vehicles: load once, then poll in the background
    let feed = VehicleFeedClient::new(&config.feed)?;
    let vehicles = Arc::new(VehicleStore::new(feed));
    match vehicles.refresh().await {
        Ok(snapshot) => info!(vehicles = snapshot.vehicles.len(), "Loaded vehicle snapshot"),
        Err(e) => warn!(error = %e, "Initial vehicle fetch failed, will retry"),
    }
    Arc::clone(&vehicles).spawn_poller(config.feed.poll_interval);

    let state = AppState::new(stops, vehicles, routes, planner, RideBoard::sample());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Transit planner listening");
    info!("  GET  /health");
    info!("  GET  /api/stops, /api/stops/nearest");
    info!("  GET  /api/buses");
    info!("  POST /api/plan");
    info!("  GET  /api/carpool/rides, POST /api/carpool/rides/:id/bookings");

    axum::serve(listener, app).await?;
    Ok(())
}
