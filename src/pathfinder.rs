//! Priority-weighted shortest path search.
//!
//! Plain Dijkstra over [`PathGraph`], except that the weight of every edge is
//! asked from an [`EdgeCostModel`] at relaxation time. With
//! [`PriorityWeightedCost`] that weight depends on how urgently the
//! destination needs cleaning and how often it has been visited, both read
//! from the registry at the moment the edge is relaxed.
//!
//! The multiplier `2 − priority_factor` grows from 1.0 toward roughly 1.44
//! as the destination priority rises, and the visit term grows with every
//! recorded visit, so frequently cleaned hubs get steadily more expensive to
//! route through.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::graph::{Edge, PathGraph};
use crate::traits::{EdgeCostModel, NodeId, PriorityView};

/// Cost reported for targets that cannot be reached.
pub const UNREACHABLE_COST: f64 = f64::INFINITY;

/// Weight factors for [`PriorityWeightedCost`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchWeights {
    /// Weight of the edge distance.
    pub alpha: f64,
    /// Weight of the edge difficulty.
    pub beta: f64,
    /// Weight of the destination visit factor.
    pub gamma: f64,
    /// Visit factor growth per recorded visit.
    pub delta: f64,
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            beta: 0.3,
            gamma: 0.1,
            delta: 0.2,
        }
    }
}

impl SearchWeights {
    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("delta", self.delta),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

/// Edge cost driven by the live state of the destination location.
///
/// ```text
/// priority_factor = 1 − priority(to) / 100
/// visit_factor    = 1 + visits(to) × δ
/// weight          = (α × distance + β × difficulty + γ × visit_factor)
///                   × (2 − priority_factor)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeightedCost<'a, P: PriorityView> {
    view: &'a P,
    weights: SearchWeights,
}

impl<'a, P: PriorityView> PriorityWeightedCost<'a, P> {
    pub fn new(view: &'a P, weights: SearchWeights) -> Self {
        Self { view, weights }
    }
}

impl<P: PriorityView> EdgeCostModel for PriorityWeightedCost<'_, P> {
    fn edge_cost(&self, edge: &Edge) -> f64 {
        let w = &self.weights;
        let priority_factor = 1.0 - self.view.priority_of(edge.to) / 100.0;
        let visit_factor = 1.0 + f64::from(self.view.visit_count_of(edge.to)) * w.delta;

        let base = w.alpha * edge.distance + w.beta * edge.difficulty + w.gamma * visit_factor;
        base * (2.0 - priority_factor)
    }
}

/// Outcome of a single search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Nodes from source to target, both included. Empty when unreachable.
    pub nodes: Vec<NodeId>,
    /// Accumulated weighted cost, [`UNREACHABLE_COST`] when unreachable.
    pub cost: f64,
}

impl PathResult {
    fn unreachable() -> Self {
        Self {
            nodes: Vec::new(),
            cost: UNREACHABLE_COST,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Number of edges walked.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Frontier entry. Ordered so that `BinaryHeap` pops the cheapest first,
/// lowest node id on equal cost.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Finds the cheapest path from `source` to `target` under `cost_model`.
///
/// `source == target` yields `[source]` at cost zero. Sources or targets
/// outside the graph are unreachable. Edges the model prices as negative or
/// NaN are not traversed.
pub fn shortest_path<C>(graph: &PathGraph, source: NodeId, target: NodeId, cost_model: &C) -> PathResult
where
    C: EdgeCostModel + ?Sized,
{
    if source == target {
        return PathResult {
            nodes: vec![source],
            cost: 0.0,
        };
    }

    let n = graph.node_count();
    if source >= n || target >= n {
        return PathResult::unreachable();
    }

    let mut distances = vec![UNREACHABLE_COST; n];
    let mut parents: Vec<Option<NodeId>> = vec![None; n];
    let mut frontier = BinaryHeap::new();

    distances[source] = 0.0;
    frontier.push(Frontier {
        cost: 0.0,
        node: source,
    });

    while let Some(Frontier { cost, node }) = frontier.pop() {
        if cost > distances[node] {
            continue;
        }

        for edge in graph.edges_from(node) {
            let step = cost_model.edge_cost(edge);
            if step.is_nan() || step < 0.0 {
                debug!(from = edge.from, to = edge.to, step, "ignoring edge with invalid cost");
                continue;
            }
            let next = cost + step;
            if next < distances[edge.to] {
                distances[edge.to] = next;
                parents[edge.to] = Some(node);
                frontier.push(Frontier {
                    cost: next,
                    node: edge.to,
                });
            }
        }
    }

    if distances[target] == UNREACHABLE_COST {
        trace!(source, target, "target unreachable");
        return PathResult::unreachable();
    }

    let mut nodes = vec![target];
    let mut at = target;
    while let Some(parent) = parents[at] {
        nodes.push(parent);
        at = parent;
    }
    nodes.reverse();

    PathResult {
        nodes,
        cost: distances[target],
    }
}

/// Convenience wrapper bundling a graph, a priority source and weights.
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeightedPathFinder<'a, P: PriorityView> {
    graph: &'a PathGraph,
    view: &'a P,
    weights: SearchWeights,
}

impl<'a, P: PriorityView> PriorityWeightedPathFinder<'a, P> {
    pub fn new(graph: &'a PathGraph, view: &'a P, weights: SearchWeights) -> Self {
        Self {
            graph,
            view,
            weights,
        }
    }

    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> PathResult {
        let cost = PriorityWeightedCost::new(self.view, self.weights);
        shortest_path(self.graph, source, target, &cost)
    }
}
