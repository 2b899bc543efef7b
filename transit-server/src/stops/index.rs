//! Static stop lookup table.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{LatLng, Stop, StopKind};

use super::error::StopIndexError;
use super::nearest::{NearestStop, nearest_stop};

/// Bundled dataset: city bus stops and metro stations.
const BUNDLED_STOPS: &str = include_str!("../../data/stops.json");

/// On-disk layout of a stops file.
#[derive(Debug, Deserialize)]
struct StopsFile {
    stops: Vec<Stop>,
}

/// An immutable collection of stops with unique ids.
#[derive(Debug, Clone, Default)]
pub struct StopIndex {
    stops: Vec<Stop>,
}

impl StopIndex {
    /// Build an index, validating ids and coordinates.
    pub fn new(stops: Vec<Stop>) -> Result<Self, StopIndexError> {
        let mut seen = HashSet::with_capacity(stops.len());

        for stop in &stops {
            if LatLng::new(stop.lat, stop.lng).is_err() {
                return Err(StopIndexError::InvalidCoordinate {
                    id: stop.id.clone(),
                });
            }
            if !seen.insert(stop.id.as_str()) {
                return Err(StopIndexError::DuplicateId(stop.id.clone()));
            }
        }

        Ok(Self { stops })
    }

    /// An index with no stops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the bundled dataset.
    pub fn bundled() -> Result<Self, StopIndexError> {
        Self::from_json(BUNDLED_STOPS)
    }

    /// Parse a `{"stops": [...]}` document.
    pub fn from_json(json: &str) -> Result<Self, StopIndexError> {
        let file: StopsFile = serde_json::from_str(json)?;
        Self::new(file.stops)
    }

    /// Load a stops file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StopIndexError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StopIndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// All stops, in load order.
    pub fn all(&self) -> &[Stop] {
        &self.stops
    }

    /// Stops of one kind.
    pub fn of_kind(&self, kind: StopKind) -> impl Iterator<Item = &Stop> + '_ {
        self.stops.iter().filter(move |s| s.kind == kind)
    }

    /// Look up a stop by id.
    pub fn get(&self, id: &str) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// Nearest stop to `point`, optionally restricted to one kind.
    pub fn nearest(&self, point: LatLng, kind: Option<StopKind>) -> Option<NearestStop<'_>> {
        match kind {
            Some(kind) => nearest_stop(point, self.of_kind(kind)),
            None => nearest_stop(point, &self.stops),
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}
