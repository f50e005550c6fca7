//! Daily maintenance scheduling (greedy baseline).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::PathGraph;
use crate::pathfinder::{PathResult, PriorityWeightedPathFinder, SearchWeights};
use crate::registry::LocationRegistry;
use crate::traits::NodeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    /// Fraction of locations targeted per day, as `1 / target_divisor`.
    pub target_divisor: usize,
    /// Lower bound on the number of daily targets.
    pub min_targets: usize,
    /// Days of decay applied at the start of each simulated day.
    pub decay_days: u32,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            target_divisor: 3,
            min_targets: 1,
            decay_days: 1,
        }
    }
}

impl ScheduleOptions {
    /// Number of targets selected out of `location_count` locations.
    pub fn target_count(&self, location_count: usize) -> usize {
        let share = location_count / self.target_divisor.max(1);
        share.max(self.min_targets).min(location_count)
    }
}

/// A sequenced multi-stop route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Visited nodes, starting at the depot.
    pub route: Vec<NodeId>,
    /// Sum of the weighted costs of every leg.
    pub total_cost: f64,
    /// Targets that could not be reached from where the route stopped.
    pub unreached: Vec<NodeId>,
}

/// Result of one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// 1-based day number within a simulation, 1 for a single `advance_day`.
    pub day: u32,
    /// Targets chosen from the priority ranking, highest first.
    pub targets: Vec<NodeId>,
    pub route: Vec<NodeId>,
    pub total_cost: f64,
    pub unreached: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct MaintenanceScheduler {
    options: ScheduleOptions,
    weights: SearchWeights,
}

impl MaintenanceScheduler {
    pub fn new(options: ScheduleOptions, weights: SearchWeights) -> Self {
        Self { options, weights }
    }

    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    pub fn weights(&self) -> &SearchWeights {
        &self.weights
    }

    /// Ages the registry, routes through today's most urgent locations and
    /// cleans every node the route passes.
    pub fn advance_day(
        &self,
        registry: &mut LocationRegistry,
        graph: &PathGraph,
        depot: NodeId,
    ) -> DayPlan {
        registry.apply_decay(self.options.decay_days);

        let targets = self.select_targets(registry);
        let plan = self.plan_route(registry, graph, depot, &targets);

        for &node in &plan.route {
            registry.mark_cleaned(node);
        }

        DayPlan {
            day: 1,
            targets,
            route: plan.route,
            total_cost: plan.total_cost,
            unreached: plan.unreached,
        }
    }

    /// Runs `days` consecutive days from the same depot.
    pub fn simulate(
        &self,
        registry: &mut LocationRegistry,
        graph: &PathGraph,
        depot: NodeId,
        days: u32,
    ) -> Vec<DayPlan> {
        (1..=days)
            .map(|day| {
                let mut plan = self.advance_day(registry, graph, depot);
                plan.day = day;
                info!(
                    day,
                    stops = plan.route.len(),
                    cost = plan.total_cost,
                    unreached = plan.unreached.len(),
                    "day planned"
                );
                plan
            })
            .collect()
    }

    /// The top share of the current priority ranking.
    pub fn select_targets(&self, registry: &LocationRegistry) -> Vec<NodeId> {
        let count = self.options.target_count(registry.len());
        registry
            .rank_by_priority()
            .into_iter()
            .take(count)
            .map(|(id, _)| id)
            .collect()
    }

    /// Greedy nearest-target sequencing.
    ///
    /// The next target is the one with the fewest hops from the current
    /// position (first in `targets` order on ties), while the reported cost
    /// accumulates the weighted cost of each chosen leg. Stops early once no
    /// remaining target is reachable.
    pub fn plan_route(
        &self,
        registry: &LocationRegistry,
        graph: &PathGraph,
        depot: NodeId,
        targets: &[NodeId],
    ) -> RoutePlan {
        let finder = PriorityWeightedPathFinder::new(graph, registry, self.weights);

        let mut route = vec![depot];
        let mut current = depot;
        let mut total_cost = 0.0;
        let mut remaining = targets.to_vec();

        while !remaining.is_empty() {
            let mut best: Option<(usize, PathResult)> = None;

            for (index, &target) in remaining.iter().enumerate() {
                let path = finder.shortest_path(current, target);
                if path.nodes.len() <= 1 {
                    continue;
                }
                let closer = best
                    .as_ref()
                    .is_none_or(|(_, best_path)| path.hops() < best_path.hops());
                if closer {
                    best = Some((index, path));
                }
            }

            let Some((index, path)) = best else {
                debug!(current, remaining = ?remaining, "no remaining target reachable");
                break;
            };

            let target = remaining.remove(index);
            debug!(from = current, to = target, hops = path.hops(), cost = path.cost, "leg chosen");

            total_cost += path.cost;
            route.extend_from_slice(&path.nodes[1..]);
            current = target;
        }

        RoutePlan {
            route,
            total_cost,
            unreached: remaining,
        }
    }
}
