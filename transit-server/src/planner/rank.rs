//! Itinerary ranking for plan results.

use crate::domain::{Itinerary, Preference};

/// Sort itineraries best-first by the chosen preference.
///
/// The sort is stable, so options that tie keep the order they were
/// generated in.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>, preference: Preference) -> Vec<Itinerary> {
    match preference {
        Preference::Time => itineraries.sort_by_key(Itinerary::total_travel_time_min),
        Preference::Cost => itineraries.sort_by_key(Itinerary::estimated_cost),
        Preference::Switches => itineraries.sort_by_key(Itinerary::transfer_count),
    }
    itineraries
}

/// Pad a non-empty list to `target` entries with copies of the best one.
///
/// Copies get " (Alternative)" appended to the name and "-alt", "-alt-2",
/// ... appended to the id. The list is truncated to `target`. An empty list
/// stays empty.
pub fn pad_alternatives(mut itineraries: Vec<Itinerary>, target: usize) -> Vec<Itinerary> {
    if let Some(best) = itineraries.first().cloned() {
        let mut copy = 1;
        while itineraries.len() < target {
            let suffix = if copy == 1 {
                "-alt".to_string()
            } else {
                format!("-alt-{copy}")
            };
            itineraries.push(best.renamed(
                format!("{}{suffix}", best.id()),
                format!("{} (Alternative)", best.name()),
            ));
            copy += 1;
        }
    }
    itineraries.truncate(target);
    itineraries
}

/// Rank, then pad to `target`.
pub fn rank_and_pad(
    itineraries: Vec<Itinerary>,
    preference: Preference,
    target: usize,
) -> Vec<Itinerary> {
    pad_alternatives(rank_itineraries(itineraries, preference), target)
}
