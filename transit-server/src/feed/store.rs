//! Latest accepted vehicle snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::VehiclePosition;
use crate::planner::VehicleSource;

use super::client::VehicleFeedClient;
use super::error::FeedError;

/// One complete response from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    /// Request sequence number, taken before the request was sent
    pub sequence: u64,
    pub fetched_at: DateTime<Utc>,
    pub vehicles: Vec<VehiclePosition>,
}

impl VehicleSnapshot {
    pub fn new(sequence: u64, vehicles: Vec<VehiclePosition>) -> Self {
        Self {
            sequence,
            fetched_at: Utc::now(),
            vehicles,
        }
    }
}

/// Holds the newest vehicle snapshot.
///
/// Every fetch takes a sequence number before it starts. A response is only
/// stored if its sequence is newer than the stored one, so a slow response
/// can never replace data from a request that started later.
#[derive(Debug)]
pub struct VehicleStore {
    client: VehicleFeedClient,
    current: RwLock<Option<Arc<VehicleSnapshot>>>,
    sequence: AtomicU64,
}

impl VehicleStore {
    pub fn new(client: VehicleFeedClient) -> Self {
        Self {
            client,
            current: RwLock::new(None),
            sequence: AtomicU64::new(0),
        }
    }

    /// Reserve the sequence number for a new request.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `snapshot` if it is newer than the current one.
    ///
    /// Returns whether it was accepted.
    pub async fn store(&self, snapshot: VehicleSnapshot) -> bool {
        let mut guard = self.current.write().await;
        if let Some(current) = guard.as_ref() {
            if snapshot.sequence <= current.sequence {
                debug!(
                    stale = snapshot.sequence,
                    current = current.sequence,
                    "Ignoring stale vehicle snapshot"
                );
                return false;
            }
        }
        *guard = Some(Arc::new(snapshot));
        true
    }

    /// The current snapshot, if one has been accepted.
    pub async fn current(&self) -> Option<Arc<VehicleSnapshot>> {
        self.current.read().await.clone()
    }

    /// Fetch from the feed and store the result.
    ///
    /// On failure the existing snapshot is kept and the error returned.
    /// Returns the snapshot current after the attempt, which may be a newer
    /// one stored by a concurrent refresh.
    pub async fn refresh(&self) -> Result<Arc<VehicleSnapshot>, FeedError> {
        let sequence = self.next_sequence();
        let vehicles = self.client.fetch().await?;
        self.store(VehicleSnapshot::new(sequence, vehicles)).await;
        self.current().await.ok_or(FeedError::NotLoaded)
    }

    /// Refresh the store every `interval` in a background task.
    ///
    /// The first tick fires immediately and is skipped; call `refresh` once
    /// before spawning to load the initial snapshot.
    pub fn spawn_poller(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.refresh().await {
                    Ok(snapshot) => info!(
                        vehicles = snapshot.vehicles.len(),
                        sequence = snapshot.sequence,
                        "Refreshed vehicle snapshot"
                    ),
                    Err(e) => warn!(error = %e, "Vehicle refresh failed, keeping previous snapshot"),
                }
            }
        })
    }
}

impl VehicleSource for VehicleStore {
    /// The current snapshot, fetching one first if nothing is loaded yet.
    async fn snapshot(&self) -> Result<Arc<VehicleSnapshot>, FeedError> {
        match self.current().await {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::client::{FeedConfig, fallback_vehicles};

    fn offline_store() -> VehicleStore {
        VehicleStore::new(VehicleFeedClient::new(&FeedConfig::new()).unwrap())
    }

    fn vehicle(id: &str) -> VehiclePosition {
        VehiclePosition {
            id: id.into(),
            lat: 12.97,
            lng: 77.6,
            route: String::new(),
            eta: None,
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
    fn sequences_increase() {
        let store = offline_store();
        let a = store.next_sequence();
        let b = store.next_sequence();
        assert!(b > a);
    }

    #[tokio::test]
    async fn stale_snapshot_is_ignored() {
        let store = offline_store();
        let older = store.next_sequence();
        let newer = store.next_sequence();

        // The later request answers first
        assert!(store.store(VehicleSnapshot::new(newer, vec![vehicle("new")])).await);
        assert!(!store.store(VehicleSnapshot::new(older, vec![vehicle("old")])).await);

        let current = store.current().await.unwrap();
        assert_eq!(current.sequence, newer);
        assert_eq!(current.vehicles[0].id, "new");
    }

    #[tokio::test]
    async fn equal_sequence_is_ignored() {
        let store = offline_store();
        let seq = store.next_sequence();
        assert!(store.store(VehicleSnapshot::new(seq, vec![vehicle("a")])).await);
        assert!(!store.store(VehicleSnapshot::new(seq, vec![vehicle("b")])).await);
        assert_eq!(store.current().await.unwrap().vehicles[0].id, "a");
    }

    #[tokio::test]
    async fn refresh_loads_fallback_without_feed() {
        let store = offline_store();
        assert!(store.current().await.is_none());

        let snapshot = store.refresh().await.unwrap();
        assert_eq!(snapshot.vehicles, fallback_vehicles());
        assert_eq!(snapshot.sequence, 1);
    }

    #[tokio::test]
    async fn source_loads_on_first_use() {
        let store = offline_store();
        let first = store.snapshot().await.unwrap();
        let second = store.snapshot().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous() {
        // Nothing listens on this port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = FeedConfig::new()
            .with_url(format!("http://{addr}/buses"))
            .with_timeout(2);
        let store = VehicleStore::new(VehicleFeedClient::new(&config).unwrap());
        let seq = store.next_sequence();
        store.store(VehicleSnapshot::new(seq, vec![vehicle("kept")])).await;

        assert!(store.refresh().await.is_err());
        assert_eq!(store.current().await.unwrap().vehicles[0].id, "kept");
    }
}
