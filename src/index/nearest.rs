//! Nearest-location query
//!
//! The index is ordered by identifier, not by position, so the query is a
//! full scan of the in-order traversal.

use serde::{Deserialize, Serialize};

use super::avl::LocationIndex;
use crate::models::{Coordinates, Location};

/// How the distance between two points is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Straight-line distance over raw degree values
    Euclidean,
    /// Great-circle distance in kilometers
    #[default]
    Haversine,
}

impl DistanceMetric {
    #[must_use]
    pub fn distance(self, from: Coordinates, to: Coordinates) -> f64 {
        match self {
            DistanceMetric::Euclidean => {
                (from.latitude - to.latitude).hypot(from.longitude - to.longitude)
            }
            DistanceMetric::Haversine => haversine::distance(
                haversine::Location {
                    latitude: from.latitude,
                    longitude: from.longitude,
                },
                haversine::Location {
                    latitude: to.latitude,
                    longitude: to.longitude,
                },
                haversine::Units::Kilometers,
            ),
        }
    }
}

/// Closest location to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub location: &'a Location,
    pub distance: f64,
}

impl LocationIndex {
    /// Find the location closest to `point`, or `None` for an empty index.
    ///
    /// On equal distances the location with the smaller identifier wins.
    #[must_use]
    pub fn find_nearest(&self, point: Coordinates, metric: DistanceMetric) -> Option<Nearest<'_>> {
        self.traverse().fold(None, |best, location| {
            let distance = metric.distance(point, location.coordinates());
            match best {
                // a NaN distance is replaced by the next one and never replaces
                Some(current) if !current.distance.is_nan() && !(distance < current.distance) => {
                    Some(current)
                }
                _ => Some(Nearest { location, distance }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn index_of(points: &[(&str, f64, f64)]) -> LocationIndex {
        let mut index = LocationIndex::new();
        for (id, lat, lon) in points {
            index.insert(Location::new(*id, *id, *lat, *lon)).unwrap();
        }
        index
    }

    #[rstest]
    #[case(DistanceMetric::Euclidean)]
    #[case(DistanceMetric::Haversine)]
    fn test_nearest_picks_closest(#[case] metric: DistanceMetric) {
        let index = index_of(&[("A", 0.0, 0.0), ("B", 10.0, 10.0), ("C", 5.0, 5.0)]);

        let nearest = index.find_nearest(Coordinates::new(4.0, 4.0), metric).unwrap();

        assert_eq!(nearest.location.id, "C");
        assert!(nearest.distance > 0.0);
    }

    #[test]
    fn test_nearest_on_empty_index() {
        let index = LocationIndex::new();
        assert!(index.find_nearest(Coordinates::new(4.0, 4.0), DistanceMetric::Haversine).is_none());
    }

    #[test]
    fn test_nearest_tie_prefers_smaller_id() {
        let index = index_of(&[("zeta", 1.0, 1.0), ("alpha", 1.0, 1.0), ("mid", 9.0, 9.0)]);

        let nearest = index.find_nearest(Coordinates::new(0.0, 0.0), DistanceMetric::Euclidean).unwrap();

        assert_eq!(nearest.location.id, "alpha");
    }

    #[rstest]
    #[case::nan_first(&[("a", f64::NAN, 0.0), ("b", 3.0, 3.0), ("c", 8.0, 8.0)])]
    #[case::nan_last(&[("a", 8.0, 8.0), ("b", 3.0, 3.0), ("c", f64::NAN, 0.0)])]
    fn test_nan_distance_never_wins(#[case] points: &[(&str, f64, f64)]) {
        let index = index_of(points);

        for metric in [DistanceMetric::Euclidean, DistanceMetric::Haversine] {
            let nearest = index.find_nearest(Coordinates::new(0.0, 0.0), metric).unwrap();
            assert_eq!(nearest.location.id, "b");
            assert!(!nearest.distance.is_nan());
        }
    }

    #[test]
    fn test_exact_match_has_zero_distance() {
        let index = index_of(&[("x", 55.6761, 12.5683), ("y", 48.8566, 2.3522)]);

        let nearest = index
            .find_nearest(Coordinates::new(48.8566, 2.3522), DistanceMetric::Haversine)
            .unwrap();

        assert_eq!(nearest.location.id, "y");
        assert!(nearest.distance.abs() < 1e-9);
    }

    #[test]
    fn test_haversine_distance_in_kilometers() {
        let copenhagen = Coordinates::new(55.6761, 12.5683);
        let aarhus = Coordinates::new(56.1629, 10.2039);

        let km = DistanceMetric::Haversine.distance(copenhagen, aarhus);

        assert!(km > 150.0 && km < 170.0, "got {km}");
    }

    #[test]
    fn test_metric_serde_names() {
        let metric: DistanceMetric = serde_json::from_str("\"euclidean\"").unwrap();
        assert_eq!(metric, DistanceMetric::Euclidean);
        assert_eq!(DistanceMetric::default(), DistanceMetric::Haversine);
    }
}
