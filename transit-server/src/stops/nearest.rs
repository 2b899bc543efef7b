//! Nearest-stop search.

use crate::domain::{LatLng, Stop};

/// Rough kilometres per degree, used to turn planar distances into
/// walking distances.
pub const KM_PER_DEGREE: f64 = 111.0;

/// The stop closest to a point, with its distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestStop<'a> {
    pub stop: &'a Stop,
    /// Planar distance in degrees
    pub distance_deg: f64,
}

impl NearestStop<'_> {
    /// Approximate distance in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.distance_deg * KM_PER_DEGREE
    }
}

/// Find the candidate closest to `point` by planar distance.
///
/// Returns `None` when there are no candidates. Equal distances resolve to
/// the stop with the lowest `id`, so the result does not depend on
/// iteration order.
///
/// # Examples
///
/// ```
/// use transit_server::domain::LatLng;
/// use transit_server::stops::{StopIndex, nearest_stop};
///
/// let index = StopIndex::bundled().unwrap();
/// let point = LatLng::new(12.9352, 77.6245).unwrap();
///
/// let nearest = nearest_stop(point, index.all()).unwrap();
/// assert_eq!(nearest.stop.id, "koramangala");
/// assert_eq!(nearest.distance_deg, 0.0);
///
/// assert!(nearest_stop(point, []).is_none());
/// ```
pub fn nearest_stop<'a, I>(point: LatLng, candidates: I) -> Option<NearestStop<'a>>
where
    I: IntoIterator<Item = &'a Stop>,
{
    let mut best: Option<NearestStop<'a>> = None;

    for stop in candidates {
        let distance_deg = point.planar_distance(&stop.position());
        let better = match &best {
            None => true,
            Some(current) => {
                distance_deg < current.distance_deg
                    || (distance_deg == current.distance_deg && stop.id < current.stop.id)
            }
        };
        if better {
            best = Some(NearestStop { stop, distance_deg });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StopKind;

    fn stop(id: &str, lat: f64, lng: f64) -> Stop {
        Stop {
            id: id.into(),
            name: id.to_uppercase(),
            short_label: String::new(),
            lat,
            lng,
            kind: StopKind::Bus,
            lines: vec![],
        }
    }

    fn point(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    #[test]
    fn empty_candidates() {
        let stops: Vec<Stop> = vec![];
        assert!(nearest_stop(point(0.0, 0.0), &stops).is_none());
    }

    #[test]
    fn picks_closest() {
        let stops = vec![stop("a", 1.0, 1.0), stop("b", 0.1, 0.1), stop("c", -2.0, 0.0)];
        let nearest = nearest_stop(point(0.0, 0.0), &stops).unwrap();
        assert_eq!(nearest.stop.id, "b");
        assert!((nearest.distance_deg - 0.02f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn tie_breaks_on_lowest_id() {
        // Both are exactly 1 degree away
        let stops = vec![stop("zeta", 1.0, 0.0), stop("alpha", -1.0, 0.0)];
        let nearest = nearest_stop(point(0.0, 0.0), &stops).unwrap();
        assert_eq!(nearest.stop.id, "alpha");

        let reversed: Vec<Stop> = stops.into_iter().rev().collect();
        let nearest = nearest_stop(point(0.0, 0.0), &reversed).unwrap();
        assert_eq!(nearest.stop.id, "alpha");
    }

    #[test]
    fn distance_km_uses_rough_factor() {
        let stops = vec![stop("a", 0.01, 0.0)];
        let nearest = nearest_stop(point(0.0, 0.0), &stops).unwrap();
        assert!((nearest.distance_km() - 1.11).abs() < 1e-9);
    }
}
