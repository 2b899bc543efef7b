//! Geographic coordinates.

use std::fmt;

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lng}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lng: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in degrees.
///
/// `LatLng::new` rejects non-finite values and values outside
/// `[-90, 90]` / `[-180, 180]`. The fields are public so static data can be
/// built directly; anything arriving from a request goes through `new`.
///
/// # Examples
///
/// ```
/// use transit_server::domain::LatLng;
///
/// let mg_road = LatLng::new(12.9755, 77.605).unwrap();
/// assert_eq!(mg_road.lat, 12.9755);
///
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// assert!(LatLng::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a validated coordinate.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lng,
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lng,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinate {
                lat,
                lng,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lng })
    }

    /// Returns the geometric midpoint (simple average of both axes).
    pub fn midpoint(&self, other: &LatLng) -> LatLng {
        LatLng {
            lat: (self.lat + other.lat) / 2.0,
            lng: (self.lng + other.lng) / 2.0,
        }
    }

    /// Planar distance in degrees: `sqrt(dLat² + dLng²)`.
    ///
    /// Only locally meaningful; it ignores the shrinking of longitude
    /// degrees away from the equator.
    pub fn planar_distance(&self, other: &LatLng) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lng = self.lng - other.lng;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }

    /// Great-circle distance in kilometres.
    pub fn haversine_km(&self, other: &LatLng) -> f64 {
        self.to_point().haversine_distance(&other.to_point()) / 1000.0
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
