//! Directed adjacency storage for traversable paths.
//!
//! Edges are directed. Adding `a -> b` does not make `b -> a` traversable;
//! use [`PathGraph::add_two_way`] or insert both directions explicitly when
//! a path can be walked both ways.

use serde::Serialize;

use crate::error::EdgeError;
use crate::traits::NodeId;

/// Default travel time and difficulty for edges that do not specify them.
pub const DEFAULT_EDGE_FACTOR: f64 = 1.0;

/// Largest node id a graph will allocate room for.
pub const MAX_NODE_ID: NodeId = 1 << 20;

/// A directed path between two locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance: f64,
    /// Persisted but not used by the routing cost.
    pub travel_time: f64,
    /// Road-condition factor.
    pub difficulty: f64,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, distance: f64) -> Self {
        Self {
            from,
            to,
            distance,
            travel_time: DEFAULT_EDGE_FACTOR,
            difficulty: DEFAULT_EDGE_FACTOR,
        }
    }

    pub fn with_travel_time(mut self, travel_time: f64) -> Self {
        self.travel_time = travel_time;
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// The reverse edge with the same attributes.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            ..self.clone()
        }
    }

    /// Checks both ends are within [`MAX_NODE_ID`] and that every numeric
    /// attribute is positive and finite.
    pub fn validate(&self) -> Result<(), EdgeError> {
        check_node(self.from.max(self.to))?;
        for (field, value) in [
            ("distance", self.distance),
            ("travel_time", self.travel_time),
            ("difficulty", self.difficulty),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EdgeError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

fn check_node(node: NodeId) -> Result<(), EdgeError> {
    if node > MAX_NODE_ID {
        return Err(EdgeError::NodeOutOfRange(node));
    }
    Ok(())
}

/// Adjacency list indexed by source node.
#[derive(Debug, Clone, Default)]
pub struct PathGraph {
    adjacency: Vec<Vec<Edge>>,
}

impl PathGraph {
    /// Creates a graph with `node_count` nodes and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// Appends a directed edge, growing the node range to cover both ends.
    ///
    /// Edges touching a node above [`MAX_NODE_ID`] are rejected.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), EdgeError> {
        let highest = edge.from.max(edge.to);
        check_node(highest)?;
        if highest >= self.adjacency.len() {
            self.adjacency.resize_with(highest + 1, Vec::new);
        }
        self.adjacency[edge.from].push(edge);
        Ok(())
    }

    /// Inserts `edge` and its reverse.
    pub fn add_two_way(&mut self, edge: Edge) -> Result<(), EdgeError> {
        let reverse = edge.reversed();
        self.add_edge(edge)?;
        self.add_edge(reverse)
    }

    /// Outgoing edges of `node`, empty when the node is out of range.
    pub fn edges_from(&self, node: NodeId) -> &[Edge] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Every edge, grouped by source node in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.adjacency.iter().flatten()
    }
}
