//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedRouteFetcher;
use crate::carpool::RideBoard;
use crate::feed::VehicleStore;
use crate::planner::PlannerConfig;
use crate::routing::OsrmClient;
use crate::stops::StopIndex;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Static stop data
    pub stops: Arc<StopIndex>,

    /// Latest live vehicle snapshot
    pub vehicles: Arc<VehicleStore>,

    /// Cached road-routing client
    pub routes: Arc<CachedRouteFetcher<OsrmClient>>,

    /// Trip planner configuration
    pub planner: Arc<PlannerConfig>,

    /// Carpool ride board
    pub carpool: Arc<RideBoard>,
}

impl AppState {
    /// Create a new app state.
    ///
    /// The vehicle store is taken as an `Arc` because the background poller
    /// shares it.
    pub fn new(
        stops: StopIndex,
        vehicles: Arc<VehicleStore>,
        routes: CachedRouteFetcher<OsrmClient>,
        planner: PlannerConfig,
        carpool: RideBoard,
    ) -> Self {
        Self {
            stops: Arc::new(stops),
            vehicles,
            routes: Arc::new(routes),
            planner: Arc::new(planner),
            carpool: Arc::new(carpool),
        }
    }
}
