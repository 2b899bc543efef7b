//! Caching layer for road routes.
//!
//! Plans between nearby points ask the routing service for the same legs
//! over and over (the same stops get resolved for every request from a
//! neighbourhood). Routes are cached by profile and endpoints rounded to
//! five decimal places, roughly one metre.
//!
//! Only successful lookups are cached; a failure is retried on the next
//! request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::LatLng;
use crate::routing::{Profile, RoadRoute, RouteFetcher};

/// Scale applied to coordinates before rounding to build a key.
const KEY_SCALE: f64 = 1e5;

/// Cache key: (profile, from lat, from lng, to lat, to lng), coordinates
/// scaled by 1e5 and rounded.
type RouteKey = (Profile, i64, i64, i64, i64);

/// Configuration for the route cache.
#[derive(Debug, Clone)]
pub struct RouteCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for RouteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

impl RouteCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

fn scaled(value: f64) -> i64 {
    (value * KEY_SCALE).round() as i64
}

fn route_key(from: LatLng, to: LatLng, profile: Profile) -> RouteKey {
    (
        profile,
        scaled(from.lat),
        scaled(from.lng),
        scaled(to.lat),
        scaled(to.lng),
    )
}

/// Route fetcher with caching.
///
/// Wraps any `RouteFetcher` and keeps successful routes for the configured
/// TTL.
pub struct CachedRouteFetcher<F> {
    inner: F,
    routes: MokaCache<RouteKey, Arc<RoadRoute>>,
}

impl<F: RouteFetcher> CachedRouteFetcher<F> {
    pub fn new(inner: F, config: &RouteCacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, routes }
    }

    /// Access the underlying fetcher, bypassing the cache.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.routes.invalidate_all();
    }
}

impl<F: RouteFetcher> RouteFetcher for CachedRouteFetcher<F> {
    async fn route(&self, from: LatLng, to: LatLng, profile: Profile) -> Option<RoadRoute> {
        let key = route_key(from, to, profile);

        if let Some(cached) = self.routes.get(&key).await {
            debug!(%profile, from = %from, to = %to, "Route cache hit");
            return Some(cached.as_ref().clone());
        }

        let route = self.inner.route(from, to, profile).await?;
        self.routes.insert(key, Arc::new(route.clone())).await;
        Some(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher that counts calls and succeeds only when told to.
    struct CountingFetcher {
        calls: AtomicUsize,
        succeed: bool,
    }

    impl CountingFetcher {
        fn new(succeed: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                succeed,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RouteFetcher for CountingFetcher {
        async fn route(&self, from: LatLng, to: LatLng, _profile: Profile) -> Option<RoadRoute> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed.then(|| RoadRoute {
                coordinates: vec![from, to],
                distance_km: 2.0,
                duration_min: 4.0,
            })
        }
    }

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    #[test]
    fn default_config() {
        let config = RouteCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[test]
    fn key_rounds_to_five_decimals() {
        let a = route_key(point(12.971601, 77.594599), point(1.0, 2.0), Profile::Foot);
        let b = route_key(point(12.971598, 77.594602), point(1.0, 2.0), Profile::Foot);
        assert_eq!(a, b);

        let c = route_key(point(12.97161, 77.5946), point(1.0, 2.0), Profile::Foot);
        assert_ne!(a, c);

        let d = route_key(point(12.971601, 77.594599), point(1.0, 2.0), Profile::Driving);
        assert_ne!(a, d);
    }

    #[tokio::test]
    async fn hit_skips_inner_fetcher() {
        let cached = CachedRouteFetcher::new(CountingFetcher::new(true), &RouteCacheConfig::default());
        let (a, b) = (point(12.97, 77.59), point(12.93, 77.62));

        let first = cached.route(a, b, Profile::Driving).await.unwrap();
        let second = cached.route(a, b, Profile::Driving).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 1);

        // Different profile is a different entry
        cached.route(a, b, Profile::Foot).await.unwrap();
        assert_eq!(cached.inner().calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedRouteFetcher::new(CountingFetcher::new(false), &RouteCacheConfig::default());
        let (a, b) = (point(12.97, 77.59), point(12.93, 77.62));

        assert!(cached.route(a, b, Profile::Driving).await.is_none());
        assert!(cached.route(a, b, Profile::Driving).await.is_none());
        assert_eq!(cached.inner().calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cached = CachedRouteFetcher::new(CountingFetcher::new(true), &RouteCacheConfig::default());
        let (a, b) = (point(12.97, 77.59), point(12.93, 77.62));

        cached.route(a, b, Profile::Foot).await.unwrap();
        cached.invalidate_all();
        cached.route(a, b, Profile::Foot).await.unwrap();
        assert_eq!(cached.inner().calls(), 2);
    }
}
