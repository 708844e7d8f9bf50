//! Best-scooter selection
//!
//! Builds a max-heap over battery level and pops until a scooter that is
//! not in repair comes out, so only the unavailable scooters ranked above
//! the answer are ever looked at.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::models::Scooter;

/// Heap entry ordered by battery level only
#[derive(Debug)]
struct ByBattery<'a>(&'a Scooter);

impl PartialEq for ByBattery<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.battery == other.0.battery
    }
}

impl Eq for ByBattery<'_> {}

impl PartialOrd for ByBattery<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByBattery<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.battery.cmp(&other.0.battery)
    }
}

/// Picks the scooter to hand out at a location
pub struct ScooterSelector;

impl ScooterSelector {
    /// Available scooter with the highest battery, or `None` when the list
    /// is empty or every scooter is in repair. Among equal batteries any
    /// one may be returned.
    #[must_use]
    pub fn select_best(scooters: &[Scooter]) -> Option<&Scooter> {
        let mut heap: BinaryHeap<ByBattery<'_>> = scooters.iter().map(ByBattery).collect();

        while let Some(ByBattery(scooter)) = heap.pop() {
            if scooter.is_available() {
                return Some(scooter);
            }
            trace!(scooter = %scooter.id, battery = scooter.battery, "skipping scooter in repair");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scooters(specs: &[(u8, bool)]) -> Vec<Scooter> {
        specs
            .iter()
            .enumerate()
            .map(|(i, (battery, repair))| Scooter::new(format!("s{i}"), *battery, *repair))
            .collect()
    }

    #[test]
    fn test_skips_scooter_in_repair() {
        let list = scooters(&[(50, false), (90, true), (70, false)]);

        let best = ScooterSelector::select_best(&list).unwrap();

        assert_eq!(best.battery, 70);
        assert_eq!(best.id, "s2");
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::all_in_repair(&[(100, true), (20, true), (55, true)])]
    fn test_nothing_selectable(#[case] specs: &[(u8, bool)]) {
        let list = scooters(specs);
        assert!(ScooterSelector::select_best(&list).is_none());
    }

    #[rstest]
    #[case(&[(10, false)], 10)]
    #[case(&[(0, false), (0, true)], 0)]
    #[case(&[(99, true), (98, true), (40, false), (60, false)], 60)]
    #[case(&[(80, false), (80, false), (80, true)], 80)]
    fn test_returns_max_available_battery(#[case] specs: &[(u8, bool)], #[case] expected: u8) {
        let list = scooters(specs);

        let best = ScooterSelector::select_best(&list).unwrap();

        assert_eq!(best.battery, expected);
        assert!(best.is_available());
    }
}
