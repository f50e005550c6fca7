//! Core seams for the maintenance planner.
//!
//! The search, the scheduler and the persistence layer talk to each other
//! through these traits so each can be exercised against a stand-in.

use crate::error::SnapshotError;
use crate::graph::Edge;
use crate::snapshot::Snapshot;

/// Stable integer key of a location. Also indexes the adjacency structure.
pub type NodeId = usize;

/// Read access to the live urgency state of locations.
///
/// Unknown ids must answer with the neutral values (`0.0` and `0`) rather
/// than failing.
pub trait PriorityView {
    /// Current dynamic priority of a location.
    fn priority_of(&self, id: NodeId) -> f64;

    /// Number of times the location has been cleaned so far.
    fn visit_count_of(&self, id: NodeId) -> u32;
}

/// Computes the cost of traversing a single directed edge.
///
/// Called once per relaxation, so implementations may read state that
/// changes between searches.
pub trait EdgeCostModel {
    fn edge_cost(&self, edge: &Edge) -> f64;
}

impl<F> EdgeCostModel for F
where
    F: Fn(&Edge) -> f64,
{
    fn edge_cost(&self, edge: &Edge) -> f64 {
        self(edge)
    }
}

/// Loads and stores the full set of locations and edges.
pub trait SnapshotStore {
    /// Returns `Ok(None)` when no snapshot has been written yet.
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}
