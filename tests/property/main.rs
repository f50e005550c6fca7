//! Property tests for decay, cleaning and priority bounds.

use proptest::prelude::*;

use upkeep_planner::registry::{Location, LocationRegistry, MAX_PRIORITY};

fn arb_location() -> impl Strategy<Value = Location> {
    (1u8..=10, 1u32..=30, 1u8..=10, 0.0f64..=100.0, 0u32..=60, 0u32..=50).prop_map(
        |(importance, frequency, visit_priority, cleanliness, last_cleaned, visits)| {
            Location::new(0, "Prop", importance, frequency, visit_priority, cleanliness)
                .unwrap()
                .with_history(last_cleaned, visits)
        },
    )
}

fn single(location: Location) -> LocationRegistry {
    LocationRegistry::from_locations([location]).unwrap()
}

proptest! {
    #[test]
    fn prop_cleanliness_stays_in_range_after_decay(loc in arb_location(), days in 1u32..=400) {
        let mut registry = single(loc);
        registry.apply_decay(days);
        let cleanliness = registry.get(0).unwrap().cleanliness();
        prop_assert!((0.0..=100.0).contains(&cleanliness));
    }

    #[test]
    fn prop_decay_is_monotonic_in_days(loc in arb_location(), d1 in 1u32..=40, extra in 0u32..=40) {
        let mut shorter = single(loc.clone());
        let mut longer = single(loc);
        shorter.apply_decay(d1);
        longer.apply_decay(d1 + extra);
        prop_assert!(
            longer.get(0).unwrap().cleanliness() <= shorter.get(0).unwrap().cleanliness()
        );
    }

    #[test]
    fn prop_split_decay_matches_single_step(loc in arb_location(), a in 1u32..=20, b in 1u32..=20) {
        let mut split = single(loc.clone());
        let mut whole = single(loc);
        split.apply_decay(a);
        split.apply_decay(b);
        whole.apply_decay(a + b);
        let (s, w) = (split.get(0).unwrap(), whole.get(0).unwrap());
        prop_assert_eq!(s.last_cleaned(), w.last_cleaned());
        prop_assert!((s.cleanliness() - w.cleanliness()).abs() < 1e-9);
    }

    #[test]
    fn prop_priority_is_bounded(loc in arb_location(), days in 0u32..=100) {
        let mut registry = single(loc);
        registry.apply_decay(days);
        let priority = registry.priority_of(0);
        prop_assert!(priority >= 0.0);
        prop_assert!(priority <= MAX_PRIORITY + 1e-9);
    }

    #[test]
    fn prop_cleaning_resets_and_counts_once(loc in arb_location(), days in 0u32..=50) {
        let visits = loc.visit_count();
        let mut registry = single(loc);
        registry.apply_decay(days);
        registry.mark_cleaned(0);
        let cleaned = registry.get(0).unwrap();
        prop_assert_eq!(cleaned.cleanliness(), 100.0);
        prop_assert_eq!(cleaned.last_cleaned(), 0);
        prop_assert_eq!(cleaned.visit_count(), visits + 1);
    }
}

#[test]
fn max_priority_constant() {
    assert!((MAX_PRIORITY - 44.2).abs() < 1e-9);
}
