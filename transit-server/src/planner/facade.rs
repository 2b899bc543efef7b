//! Trip planning entry point.
//!
//! Runs the planning stages in a fixed order and returns the first
//! non-empty result. The last stage always produces an itinerary, so a
//! plan never comes back empty.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Itinerary, LatLng, Preference};
use crate::feed::{FeedError, VehicleSnapshot};
use crate::routing::RouteFetcher;
use crate::stops::StopIndex;

use super::config::PlannerConfig;
use super::external::ExternalPlanner;
use super::fallback::fallback_itinerary;
use super::rank::rank_and_pad;
use super::synthesize::SegmentSynthesizer;

/// A planning strategy, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStage {
    /// Itineraries built from road-routing results.
    ExternalPlanner,
    /// Itineraries synthesized from heuristic timings and live vehicles.
    HeuristicSynthesis,
    /// The canned itinerary.
    DirectFallback,
}

impl PlanStage {
    pub const ORDER: [PlanStage; 3] = [
        PlanStage::ExternalPlanner,
        PlanStage::HeuristicSynthesis,
        PlanStage::DirectFallback,
    ];
}

/// What a stage produced.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Found(Vec<Itinerary>),
    /// Nothing usable; move on to the next stage.
    Skip,
}

/// Request for a trip plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub start: LatLng,
    pub end: LatLng,
    /// Display name of the start, if the user picked a named place.
    pub start_name: Option<String>,
    /// Display name of the end, used for the final walk.
    pub end_name: Option<String>,
    pub preference: Preference,
}

impl PlanRequest {
    pub fn new(start: LatLng, end: LatLng) -> Self {
        Self {
            start,
            end,
            start_name: None,
            end_name: None,
            preference: Preference::default(),
        }
    }

    pub fn with_preference(mut self, preference: Preference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_start_name(mut self, name: impl Into<String>) -> Self {
        self.start_name = Some(name.into());
        self
    }

    pub fn with_end_name(mut self, name: impl Into<String>) -> Self {
        self.end_name = Some(name.into());
        self
    }
}

/// Result of planning: the stage that answered and its itineraries.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub stage: PlanStage,
    /// Between one and `max_results` itineraries, best-first.
    pub itineraries: Vec<Itinerary>,
}

/// Trait for providing the live vehicle snapshot.
///
/// This abstraction allows the planner to be tested without a feed.
pub trait VehicleSource: Send + Sync {
    fn snapshot(&self) -> impl Future<Output = Result<Arc<VehicleSnapshot>, FeedError>> + Send;
}

/// Trip planner.
pub struct TripPlanner<'a, F, V> {
    fetcher: &'a F,
    vehicles: &'a V,
    stops: &'a StopIndex,
    config: &'a PlannerConfig,
}

impl<'a, F, V> TripPlanner<'a, F, V>
where
    F: RouteFetcher,
    V: VehicleSource,
{
    pub fn new(
        fetcher: &'a F,
        vehicles: &'a V,
        stops: &'a StopIndex,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            fetcher,
            vehicles,
            stops,
            config,
        }
    }

    /// Plan a trip.
    ///
    /// Stages are tried once each, in `PlanStage::ORDER`; failures inside a
    /// stage are logged and treated as "nothing found".
    pub async fn plan(&self, request: &PlanRequest) -> PlanOutcome {
        for stage in PlanStage::ORDER {
            debug!(?stage, "Trying plan stage");
            match self.run_stage(stage, request).await {
                StrategyOutcome::Found(itineraries) => {
                    info!(?stage, count = itineraries.len(), "Plan found");
                    return PlanOutcome { stage, itineraries };
                }
                StrategyOutcome::Skip => debug!(?stage, "Plan stage skipped"),
            }
        }

        PlanOutcome {
            stage: PlanStage::DirectFallback,
            itineraries: vec![fallback_itinerary()],
        }
    }

    async fn run_stage(&self, stage: PlanStage, request: &PlanRequest) -> StrategyOutcome {
        match stage {
            PlanStage::ExternalPlanner => self.external(request).await,
            PlanStage::HeuristicSynthesis => self.heuristic(request).await,
            PlanStage::DirectFallback => StrategyOutcome::Found(vec![fallback_itinerary()]),
        }
    }

    async fn external(&self, request: &PlanRequest) -> StrategyOutcome {
        if !self.config.use_external_planner {
            return StrategyOutcome::Skip;
        }

        let options = ExternalPlanner::new(self.fetcher, self.stops, self.config)
            .plan(request)
            .await;
        self.finish(options, request.preference)
    }

    async fn heuristic(&self, request: &PlanRequest) -> StrategyOutcome {
        let snapshot = match self.vehicles.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Vehicle snapshot unavailable, skipping synthesis");
                return StrategyOutcome::Skip;
            }
        };

        let options = SegmentSynthesizer::new(self.stops, self.config)
            .synthesize_all(request, &snapshot.vehicles);
        self.finish(options, request.preference)
    }

    fn finish(&self, options: Vec<Itinerary>, preference: Preference) -> StrategyOutcome {
        if options.is_empty() {
            return StrategyOutcome::Skip;
        }
        let target = self.config.max_results.max(1);
        StrategyOutcome::Found(rank_and_pad(options, preference, target))
    }
}
