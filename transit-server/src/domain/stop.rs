//! Stops and stations.

use serde::{Deserialize, Serialize};

use super::LatLng;

/// Whether a stop is served by buses or by the metro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Bus,
    Metro,
}

/// A named stop or station.
///
/// Stops are immutable once loaded; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Unique identifier (e.g. "mg-road", "cbpk")
    pub id: String,
    /// Full display name
    pub name: String,
    /// Short label used in route names (e.g. "MG Road", "CBPK")
    #[serde(default, rename = "shortLabel", alias = "short_label")]
    pub short_label: String,
    pub lat: f64,
    pub lng: f64,
    pub kind: StopKind,
    /// Metro lines serving this station (empty for bus stops)
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Stop {
    /// Returns the stop's coordinate.
    pub fn position(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// Short label, falling back to the full name.
    pub fn label(&self) -> &str {
        if self.short_label.is_empty() {
            &self.name
        } else {
            &self.short_label
        }
    }

    /// The first line serving this station, if any.
    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }
}
