//! Location registry: cleanliness decay, cleaning and dynamic priority.

use serde::Serialize;
use tracing::debug;

use crate::error::{LocationError, RegistryError};
use crate::graph::MAX_NODE_ID;
use crate::traits::{NodeId, PriorityView};

/// Cleanliness of a freshly cleaned location, in percent.
pub const FULLY_CLEAN: f64 = 100.0;

const IMPORTANCE_WEIGHT: f64 = 0.3;
const DIRT_WEIGHT: f64 = 0.4;
const VISIT_PRIORITY_WEIGHT: f64 = 0.1;
const TIME_WEIGHT: f64 = 0.2;

/// Multiplier applied to the time factor while a location is still inside
/// its preferred cleaning interval.
const RECENTLY_CLEANED_PENALTY: f64 = 0.2;

/// Upper bound of [`LocationRegistry::priority_of`] for in-range attributes.
pub const MAX_PRIORITY: f64 =
    IMPORTANCE_WEIGHT * 10.0 + DIRT_WEIGHT * 100.0 + VISIT_PRIORITY_WEIGHT * 10.0 + TIME_WEIGHT;

/// A physical place that needs periodic cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    id: NodeId,
    name: String,
    importance: u8,
    cleaning_frequency: u32,
    visit_priority: u8,
    last_cleaned: u32,
    cleanliness: f64,
    visit_count: u32,
}

impl Location {
    /// Creates a location that was cleaned today and never visited.
    ///
    /// `cleanliness` is clamped into `[0, 100]`.
    pub fn new(
        id: NodeId,
        name: impl Into<String>,
        importance: u8,
        cleaning_frequency: u32,
        visit_priority: u8,
        cleanliness: f64,
    ) -> Result<Self, LocationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LocationError::EmptyName);
        }
        if id > MAX_NODE_ID {
            return Err(LocationError::IdOutOfRange(id));
        }
        if !(1..=10).contains(&importance) {
            return Err(LocationError::ImportanceOutOfRange(importance));
        }
        if !(1..=10).contains(&visit_priority) {
            return Err(LocationError::VisitPriorityOutOfRange(visit_priority));
        }
        if cleaning_frequency == 0 {
            return Err(LocationError::ZeroCleaningFrequency);
        }

        Ok(Self {
            id,
            name,
            importance,
            cleaning_frequency,
            visit_priority,
            last_cleaned: 0,
            cleanliness: clamp_cleanliness(cleanliness),
            visit_count: 0,
        })
    }

    /// Restores the mutable history of a previously persisted location.
    pub fn with_history(mut self, last_cleaned: u32, visit_count: u32) -> Self {
        self.last_cleaned = last_cleaned;
        self.visit_count = visit_count;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn importance(&self) -> u8 {
        self.importance
    }

    pub fn cleaning_frequency(&self) -> u32 {
        self.cleaning_frequency
    }

    pub fn visit_priority(&self) -> u8 {
        self.visit_priority
    }

    /// Days elapsed since the last cleaning.
    pub fn last_cleaned(&self) -> u32 {
        self.last_cleaned
    }

    /// Cleanliness in percent, always within `[0, 100]`.
    pub fn cleanliness(&self) -> f64 {
        self.cleanliness
    }

    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    /// Percentage points lost per elapsed day.
    pub fn decay_rate(&self) -> f64 {
        FULLY_CLEAN / (2.0 * f64::from(self.cleaning_frequency))
    }

    fn decay(&mut self, days: u32) {
        self.last_cleaned = self.last_cleaned.saturating_add(days);
        let loss = f64::from(days) * self.decay_rate();
        self.cleanliness = (self.cleanliness - loss).max(0.0);
    }

    fn clean(&mut self) {
        self.last_cleaned = 0;
        self.cleanliness = FULLY_CLEAN;
        self.visit_count = self.visit_count.saturating_add(1);
    }

    /// Dynamic priority computed from the current state.
    ///
    /// ```text
    /// time  = min(1, last_cleaned / cleaning_frequency)
    ///         × 0.2 while last_cleaned < cleaning_frequency
    /// score = 0.3 × importance + 0.4 × (100 − cleanliness)
    ///       + 0.1 × visit_priority + 0.2 × time
    /// ```
    pub fn priority(&self) -> f64 {
        let frequency = f64::from(self.cleaning_frequency);
        let mut time_factor = (f64::from(self.last_cleaned) / frequency).min(1.0);
        if self.last_cleaned < self.cleaning_frequency {
            time_factor *= RECENTLY_CLEANED_PENALTY;
        }

        IMPORTANCE_WEIGHT * f64::from(self.importance)
            + DIRT_WEIGHT * (FULLY_CLEAN - self.cleanliness)
            + VISIT_PRIORITY_WEIGHT * f64::from(self.visit_priority)
            + TIME_WEIGHT * time_factor
    }
}

fn clamp_cleanliness(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, FULLY_CLEAN)
}

/// Read-only status row for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationStatus {
    pub id: NodeId,
    pub name: String,
    pub cleanliness: f64,
    pub days_since_clean: u32,
    pub priority: f64,
    pub visit_count: u32,
}

/// Owns every location for the lifetime of a run.
///
/// Locations keep their registration order, which is also the tie-break
/// order for [`LocationRegistry::rank_by_priority`].
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry, rejecting the first duplicated id.
    pub fn from_locations(
        locations: impl IntoIterator<Item = Location>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for location in locations {
            registry.register(location)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, location: Location) -> Result<(), RegistryError> {
        if self.get(location.id).is_some() {
            return Err(RegistryError::DuplicateId(location.id));
        }
        self.locations.push(location);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn get(&self, id: NodeId) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    /// Ages every location by `days`.
    pub fn apply_decay(&mut self, days: u32) {
        if days == 0 {
            return;
        }
        for location in &mut self.locations {
            location.decay(days);
        }
    }

    /// Resets a location to fully clean and counts the visit.
    ///
    /// Unknown ids are ignored.
    pub fn mark_cleaned(&mut self, id: NodeId) {
        match self.locations.iter_mut().find(|loc| loc.id == id) {
            Some(location) => location.clean(),
            None => debug!(id, "ignoring cleaning of unknown location"),
        }
    }

    /// Priority of a location, or `0.0` if the id is unknown.
    pub fn priority_of(&self, id: NodeId) -> f64 {
        self.get(id).map(Location::priority).unwrap_or(0.0)
    }

    /// Visit count of a location, or `0` if the id is unknown.
    pub fn visit_count_of(&self, id: NodeId) -> u32 {
        self.get(id).map(Location::visit_count).unwrap_or(0)
    }

    /// All locations ordered by descending priority.
    ///
    /// The sort is stable, so equal scores keep registration order.
    pub fn rank_by_priority(&self) -> Vec<(NodeId, f64)> {
        let mut ranking: Vec<(NodeId, f64)> = self
            .locations
            .iter()
            .map(|loc| (loc.id, loc.priority()))
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }

    pub fn status(&self) -> Vec<LocationStatus> {
        self.locations
            .iter()
            .map(|loc| LocationStatus {
                id: loc.id,
                name: loc.name.clone(),
                cleanliness: loc.cleanliness,
                days_since_clean: loc.last_cleaned,
                priority: loc.priority(),
                visit_count: loc.visit_count,
            })
            .collect()
    }
}

impl PriorityView for LocationRegistry {
    fn priority_of(&self, id: NodeId) -> f64 {
        LocationRegistry::priority_of(self, id)
    }

    fn visit_count_of(&self, id: NodeId) -> u32 {
        LocationRegistry::visit_count_of(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: NodeId, frequency: u32, cleanliness: f64) -> Location {
        Location::new(id, format!("loc-{}", id), 5, frequency, 5, cleanliness).unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range_attributes() {
        assert_eq!(
            Location::new(0, "Hall", 0, 3, 5, 100.0),
            Err(LocationError::ImportanceOutOfRange(0))
        );
        assert_eq!(
            Location::new(0, "Hall", 5, 3, 11, 100.0),
            Err(LocationError::VisitPriorityOutOfRange(11))
        );
        assert_eq!(
            Location::new(0, "Hall", 5, 0, 5, 100.0),
            Err(LocationError::ZeroCleaningFrequency)
        );
        assert_eq!(Location::new(0, "  ", 5, 3, 5, 100.0), Err(LocationError::EmptyName));
        assert_eq!(
            Location::new(MAX_NODE_ID + 1, "Hall", 5, 3, 5, 100.0),
            Err(LocationError::IdOutOfRange(MAX_NODE_ID + 1))
        );
    }

    #[test]
    fn test_new_clamps_cleanliness() {
        assert_eq!(location(0, 3, 140.0).cleanliness(), 100.0);
        assert_eq!(location(0, 3, -5.0).cleanliness(), 0.0);
    }

    #[test]
    fn test_decay_rate_halves_per_frequency() {
        let mut registry = LocationRegistry::from_locations([location(0, 5, 100.0)]).unwrap();
        registry.apply_decay(1);
        let loc = registry.get(0).unwrap();
        assert!((loc.cleanliness() - 90.0).abs() < 1e-9);
        assert_eq!(loc.last_cleaned(), 1);
    }

    #[test]
    fn test_decay_floors_at_zero() {
        let mut registry = LocationRegistry::from_locations([location(0, 1, 30.0)]).unwrap();
        registry.apply_decay(4);
        assert_eq!(registry.get(0).unwrap().cleanliness(), 0.0);
        assert_eq!(registry.get(0).unwrap().last_cleaned(), 4);
    }

    #[test]
    fn test_decay_is_additive_over_days() {
        let mut stepwise = LocationRegistry::from_locations([location(0, 4, 100.0)]).unwrap();
        let mut at_once = stepwise.clone();
        stepwise.apply_decay(1);
        stepwise.apply_decay(1);
        at_once.apply_decay(2);
        let a = stepwise.get(0).unwrap();
        let b = at_once.get(0).unwrap();
        assert!((a.cleanliness() - b.cleanliness()).abs() < 1e-9);
        assert_eq!(a.last_cleaned(), b.last_cleaned());
    }

    #[test]
    fn test_mark_cleaned_resets_and_counts() {
        let mut registry =
            LocationRegistry::from_locations([location(0, 2, 10.0).with_history(7, 3)]).unwrap();
        registry.mark_cleaned(0);
        let loc = registry.get(0).unwrap();
        assert_eq!(loc.cleanliness(), 100.0);
        assert_eq!(loc.last_cleaned(), 0);
        assert_eq!(loc.visit_count(), 4);
    }

    #[test]
    fn test_mark_cleaned_unknown_is_noop() {
        let mut registry = LocationRegistry::from_locations([location(0, 2, 10.0)]).unwrap();
        let before = registry.get(0).cloned();
        registry.mark_cleaned(42);
        assert_eq!(registry.get(0).cloned(), before);
    }

    #[test]
    fn test_priority_formula() {
        // importance 5, visit priority 5, cleanliness 60, 2 of 4 days elapsed:
        // time = 0.5 * 0.2 = 0.1
        let loc = location(0, 4, 60.0).with_history(2, 0);
        let expected = 0.3 * 5.0 + 0.4 * 40.0 + 0.1 * 5.0 + 0.2 * 0.1;
        assert!((loc.priority() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_priority_penalty_lifts_at_threshold() {
        let before = location(0, 4, 100.0).with_history(3, 0);
        let at = location(0, 4, 100.0).with_history(4, 0);
        let base = 0.3 * 5.0 + 0.1 * 5.0;
        assert!((before.priority() - (base + 0.2 * 0.75 * 0.2)).abs() < 1e-9);
        assert!((at.priority() - (base + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_ids_yield_sentinels() {
        let registry = LocationRegistry::new();
        assert_eq!(registry.priority_of(3), 0.0);
        assert_eq!(registry.visit_count_of(3), 0);
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut registry = LocationRegistry::from_locations([location(1, 2, 50.0)]).unwrap();
        assert_eq!(
            registry.register(location(1, 3, 80.0)),
            Err(RegistryError::DuplicateId(1))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let registry = LocationRegistry::from_locations([
            location(4, 3, 50.0),
            location(2, 3, 50.0),
            location(9, 3, 20.0),
        ])
        .unwrap();
        let ids: Vec<NodeId> = registry.rank_by_priority().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![9, 4, 2]);
    }

    #[test]
    fn test_find_by_name() {
        let registry = LocationRegistry::from_locations([
            Location::new(3, "Library", 9, 2, 8, 70.0).unwrap(),
        ])
        .unwrap();
        assert_eq!(registry.find_by_name("Library").map(Location::id), Some(3));
        assert!(registry.find_by_name("Gym").is_none());
    }
}
