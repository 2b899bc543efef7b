//! Canned itinerary served when every other stage came up empty.

use crate::domain::{BusLeg, Itinerary, Segment, Walk};

/// A fixed walk, bus, walk trip from Majestic.
///
/// Built without going through validation since the segment list is
/// statically non-empty; the totals are still derived from the segments.
pub fn fallback_itinerary() -> Itinerary {
    let segments = vec![
        Segment::Walk(Walk::new(5, "Majestic Bus Stand")),
        Segment::Bus(BusLeg {
            from_stop: "Majestic Bus Stand".to_string(),
            to_stop: "Tech Park".to_string(),
            bus_id: Some("bus-101".to_string()),
            route: "City Center ⇄ Tech Park".to_string(),
            wait_min: 3,
            travel_min: 25,
            cost: 30,
        }),
        Segment::Walk(Walk::new(3, "final destination")),
    ];

    Itinerary::assemble(
        "route-fallback-1".to_string(),
        "Route 1 (Time Efficient)".to_string(),
        segments,
        Vec::new(),
    )
}
