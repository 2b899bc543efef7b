//! Live vehicle positions.

use serde::{Deserialize, Serialize};

use super::LatLng;

/// Wait assumed when a vehicle reports no usable ETA (minutes).
const DEFAULT_ETA_MINS: u32 = 5;

/// A vehicle as reported by the live feed.
///
/// `eta` and `cost` are display strings ("3 mins", "₹32"); use
/// [`VehiclePosition::eta_minutes`] and [`VehiclePosition::cost_amount`] to
/// get numbers out of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePosition {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub eta: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub occupancy: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub wheelchair_accessible: bool,
    #[serde(default)]
    pub has_ramps: bool,
    #[serde(default)]
    pub elevator_access: bool,
    #[serde(default)]
    pub is_steep: bool,
}

impl VehiclePosition {
    /// Returns the vehicle's coordinate.
    pub fn position(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }

    /// ETA in minutes, defaulting to 5 when absent or unparseable.
    pub fn eta_minutes(&self) -> u32 {
        self.eta
            .as_deref()
            .and_then(first_number)
            .unwrap_or(DEFAULT_ETA_MINS)
    }

    /// Fare as a number, defaulting to 0.
    pub fn cost_amount(&self) -> u32 {
        self.cost.as_deref().and_then(first_number).unwrap_or(0)
    }

    /// Crowding rank of the reported occupancy, if recognised.
    pub fn occupancy_rank(&self) -> Option<u8> {
        self.occupancy.as_deref().and_then(occupancy_rank)
    }
}

/// Extract the first run of ASCII digits in `s` as a number.
///
/// # Examples
///
/// ```
/// use transit_server::domain::first_number;
///
/// assert_eq!(first_number("3 mins"), Some(3));
/// assert_eq!(first_number("₹180"), Some(180));
/// assert_eq!(first_number("soon"), None);
/// ```
pub fn first_number(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Crowding rank: light 1, moderate 2, busy 3, high 4.
pub fn occupancy_rank(occupancy: &str) -> Option<u8> {
    match occupancy.trim().to_ascii_lowercase().as_str() {
        "light" => Some(1),
        "moderate" => Some(2),
        "busy" => Some(3),
        "high" => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(eta: Option<&str>, cost: Option<&str>) -> VehiclePosition {
        VehiclePosition {
            id: "bus-1".into(),
            lat: 12.97,
            lng: 77.6,
            route: "A ⇄ B".into(),
            eta: eta.map(String::from),
            cost: cost.map(String::from),
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
    fn eta_parsing() {
        assert_eq!(vehicle(Some("7 mins"), None).eta_minutes(), 7);
        assert_eq!(vehicle(Some("arriving"), None).eta_minutes(), 5);
        assert_eq!(vehicle(None, None).eta_minutes(), 5);
    }

    #[test]
    fn cost_parsing() {
        assert_eq!(vehicle(None, Some("₹32")).cost_amount(), 32);
        assert_eq!(vehicle(None, Some("free")).cost_amount(), 0);
        assert_eq!(vehicle(None, None).cost_amount(), 0);
    }

    #[test]
    fn first_number_takes_first_run_only() {
        assert_eq!(first_number("12 to 15 mins"), Some(12));
        assert_eq!(first_number(""), None);
    }

    #[test]
    fn occupancy_ranks() {
        assert_eq!(occupancy_rank("Light"), Some(1));
        assert_eq!(occupancy_rank("moderate"), Some(2));
        assert_eq!(occupancy_rank("BUSY"), Some(3));
        assert_eq!(occupancy_rank("High"), Some(4));
        assert_eq!(occupancy_rank("packed"), None);
    }

    #[test]
    fn deserializes_minimal_feed_entry() {
        // The GTFS-RT bridge only sends id, position, speed and trip
        let json = r#"{"id":"DL1PC1234","lat":28.6,"lng":77.2,"speed":8.5,"trip_id":"T1"}"#;
        let v: VehiclePosition = serde_json::from_str(json).unwrap();
        assert_eq!(v.id, "DL1PC1234");
        assert_eq!(v.speed, Some(8.5));
        assert_eq!(v.route, "");
        assert_eq!(v.eta_minutes(), 5);
        assert!(!v.wheelchair_accessible);
    }

    #[test]
    fn deserializes_camel_case_flags() {
        let json = r#"{"id":"bus-101","lat":1.0,"lng":2.0,"wheelchairAccessible":true,"isSteep":true}"#;
        let v: VehiclePosition = serde_json::from_str(json).unwrap();
        assert!(v.wheelchair_accessible);
        assert!(v.is_steep);
        assert!(!v.has_ramps);
    }
}
