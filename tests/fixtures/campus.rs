//! Location builders and graph shapes.

use upkeep_planner::graph::{Edge, PathGraph};
use upkeep_planner::registry::{Location, LocationRegistry};
use upkeep_planner::traits::NodeId;

/// Builder for test locations.
///
/// Defaults: importance 5, frequency 5, visit priority 5, fully clean,
/// cleaned today, never visited.
#[derive(Clone, Debug)]
pub struct TestLocation {
    id: NodeId,
    importance: u8,
    frequency: u32,
    visit_priority: u8,
    cleanliness: f64,
    last_cleaned: u32,
    visits: u32,
}

impl TestLocation {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            importance: 5,
            frequency: 5,
            visit_priority: 5,
            cleanliness: 100.0,
            last_cleaned: 0,
            visits: 0,
        }
    }

    pub fn importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn frequency(mut self, days: u32) -> Self {
        self.frequency = days;
        self
    }

    pub fn visit_priority(mut self, priority: u8) -> Self {
        self.visit_priority = priority;
        self
    }

    pub fn cleanliness(mut self, percent: f64) -> Self {
        self.cleanliness = percent;
        self
    }

    pub fn last_cleaned(mut self, days: u32) -> Self {
        self.last_cleaned = days;
        self
    }

    pub fn visits(mut self, count: u32) -> Self {
        self.visits = count;
        self
    }

    pub fn build(self) -> Location {
        Location::new(
            self.id,
            format!("Location {}", self.id),
            self.importance,
            self.frequency,
            self.visit_priority,
            self.cleanliness,
        )
        .expect("valid test location")
        .with_history(self.last_cleaned, self.visits)
    }
}

pub fn registry(locations: impl IntoIterator<Item = TestLocation>) -> LocationRegistry {
    LocationRegistry::from_locations(locations.into_iter().map(TestLocation::build))
        .expect("unique test ids")
}

/// `count` default locations with ids `0..count`.
pub fn uniform_registry(count: usize) -> LocationRegistry {
    registry((0..count).map(TestLocation::new))
}

/// Two-way chain `0 - 1 - ... - (n-1)` with unit distances.
pub fn chain(n: usize) -> PathGraph {
    let mut graph = PathGraph::new(n);
    for i in 1..n {
        graph.add_two_way(Edge::new(i - 1, i, 1.0)).unwrap();
    }
    graph
}

/// Distance-only cost, for checks that should not depend on the registry.
pub fn by_distance(edge: &Edge) -> f64 {
    edge.distance
}
