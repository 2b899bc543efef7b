//! Carpool ride board.
//!
//! An in-memory list of offered rides that riders can search by
//! neighbourhood and book seats on.

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

/// A ride offered by a driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ride {
    pub id: String,
    pub driver: String,
    /// Driver rating as displayed, e.g. "4.9"
    pub rating: String,
    pub start: String,
    pub end: String,
    /// Departure time as displayed, e.g. "07:45 AM"
    pub departure: String,
    /// Seats still free
    pub seats: u32,
    /// Fare as displayed, e.g. "₹80 share"
    pub cost: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eco: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A confirmed booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub ride_id: String,
    pub members: u32,
    /// Seats left on the ride after this booking
    pub seats_left: u32,
}

/// Errors from booking a ride.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CarpoolError {
    #[error("unknown ride: {0}")]
    UnknownRide(String),

    #[error("a booking needs at least one member")]
    NoMembers,

    #[error("ride {ride_id} has {available} seats, {requested} requested")]
    NotEnoughSeats {
        ride_id: String,
        requested: u32,
        available: u32,
    },
}

struct Board {
    rides: Vec<Ride>,
    bookings: u64,
}

/// Thread-safe ride board.
pub struct RideBoard {
    inner: RwLock<Board>,
}

/// Seed rides: (id, driver, rating, start, end, departure, seats, cost, eco, tag).
type SampleRide<'a> = (
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    u32,
    &'a str,
    &'a str,
    Option<&'a str>,
);

const SAMPLE_RIDES: [SampleRide<'static>; 4] = [
    (
        "ride-01",
        "Priya",
        "4.9",
        "Connaught Place",
        "Gurgaon",
        "07:45 AM",
        2,
        "₹80 share",
        "Saves 4kg CO₂",
        Some("hot"),
    ),
    (
        "ride-02",
        "Rahul",
        "4.7",
        "Dwarka",
        "Rajiv Chowk",
        "08:10 AM",
        1,
        "₹60 share",
        "Saves 3kg CO₂",
        Some("new"),
    ),
    (
        "ride-03",
        "Meera",
        "5.0",
        "Noida",
        "Karol Bagh",
        "06:30 PM",
        3,
        "₹70 share",
        "Saves 5kg CO₂",
        None,
    ),
    (
        "ride-04",
        "Amit",
        "4.8",
        "Rohini",
        "Laxmi Nagar",
        "07:15 AM",
        2,
        "₹65 share",
        "Saves 4kg CO₂",
        None,
    ),
];

/// Case-insensitive containment; blank needles match everything.
fn matches(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

impl RideBoard {
    pub fn new(rides: Vec<Ride>) -> Self {
        Self {
            inner: RwLock::new(Board { rides, bookings: 0 }),
        }
    }

    /// A board seeded with the sample rides.
    pub fn sample() -> Self {
        let rides = SAMPLE_RIDES
            .iter()
            .map(
                |&(id, driver, rating, start, end, departure, seats, cost, eco, tag)| Ride {
                    id: id.to_string(),
                    driver: driver.to_string(),
                    rating: rating.to_string(),
                    start: start.to_string(),
                    end: end.to_string(),
                    departure: departure.to_string(),
                    seats,
                    cost: cost.to_string(),
                    eco: Some(eco.to_string()),
                    tag: tag.map(String::from),
                },
            )
            .collect();
        Self::new(rides)
    }

    /// Rides matching the start and end text with room for `members`.
    pub async fn search(&self, start: &str, end: &str, members: u32) -> Vec<Ride> {
        let board = self.inner.read().await;
        board
            .rides
            .iter()
            .filter(|r| matches(&r.start, start) && matches(&r.end, end))
            .filter(|r| r.seats >= members)
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Ride> {
        let board = self.inner.read().await;
        board.rides.iter().find(|r| r.id == id).cloned()
    }

    /// Reserve `members` seats on a ride.
    ///
    /// Seats are checked and taken under one write lock, so concurrent
    /// bookings cannot oversell a ride. On error nothing changes.
    pub async fn book(&self, ride_id: &str, members: u32) -> Result<Booking, CarpoolError> {
        if members == 0 {
            return Err(CarpoolError::NoMembers);
        }

        let mut board = self.inner.write().await;
        let ride = board
            .rides
            .iter_mut()
            .find(|r| r.id == ride_id)
            .ok_or_else(|| CarpoolError::UnknownRide(ride_id.to_string()))?;

        if ride.seats < members {
            return Err(CarpoolError::NotEnoughSeats {
                ride_id: ride_id.to_string(),
                requested: members,
                available: ride.seats,
            });
        }

        ride.seats -= members;
        let seats_left = ride.seats;
        board.bookings += 1;

        let booking = Booking {
            id: format!("booking-{}", board.bookings),
            ride_id: ride_id.to_string(),
            members,
            seats_left,
        };
        info!(booking = %booking.id, ride = %ride_id, members, seats_left, "Ride booked");
        Ok(booking)
    }
}
