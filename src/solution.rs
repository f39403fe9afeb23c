//! Solution representation for MDMTSP.
//!
//! A [`Solution`] is one closed route (the tour of a single depot group); an
//! [`MdmtspSolution`] collects the routes of every depot with the aggregate
//! cost and the wall-clock time of the whole optimization pass.

use crate::instance::{CostMatrix, MdmtspInstance, NodeLabel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// A single closed route and how it was obtained
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Visiting order as dense node indices; the last node connects back to the first
    pub route: Vec<usize>,
    /// Closed-tour cost of the route
    pub cost: f64,
    /// Algorithm that generated this solution
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
}

impl Solution {
    /// Create a new empty solution
    pub fn new() -> Self {
        Solution {
            route: Vec::new(),
            cost: 0.0,
            algorithm: String::new(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Create a solution from a route
    pub fn from_route(costs: &CostMatrix, route: Vec<usize>, algorithm: &str) -> Self {
        let cost = costs.route_cost(&route);
        Solution {
            route,
            cost,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            iterations: None,
        }
    }

    /// Recompute the cost from the route
    pub fn validate(&mut self, costs: &CostMatrix) {
        self.cost = costs.route_cost(&self.route);
    }

    /// Check that the route visits exactly the given nodes, each once
    pub fn is_permutation_of(&self, nodes: &[usize]) -> bool {
        if self.route.len() != nodes.len() {
            return false;
        }
        let expected: HashSet<usize> = nodes.iter().copied().collect();
        let unique: HashSet<usize> = self.route.iter().copied().collect();
        unique.len() == self.route.len() && unique == expected
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)?;
        if let Some(iter) = self.iterations {
            writeln!(f, "  Iterations: {}", iter)?;
        }
        writeln!(f, "  Route: {:?}", self.route)
    }
}

/// The optimized route of one depot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotRoute {
    /// Dense index of the depot
    pub depot: usize,
    pub solution: Solution,
}

/// Result of a full optimization pass over every depot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdmtspSolution {
    /// One entry per depot with a non-empty client group, ordered by depot
    pub routes: Vec<DepotRoute>,
    /// Sum of the closed-tour costs of all routes
    pub total_cost: f64,
    /// Wall-clock duration of the pass
    pub elapsed: Duration,
    /// Seed the pass was run with
    pub seed: u64,
}

/// Route of one depot expressed with the original node labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelledRoute {
    pub depot: NodeLabel,
    pub route: Vec<NodeLabel>,
    pub cost: f64,
}

impl MdmtspSolution {
    /// Route of a depot, if it serves any client
    pub fn route_of(&self, depot: usize) -> Option<&DepotRoute> {
        self.routes.iter().find(|r| r.depot == depot)
    }

    /// Number of clients served over all routes (depot nodes excluded)
    pub fn num_served(&self, instance: &MdmtspInstance) -> usize {
        self.routes.iter()
            .map(|r| r.solution.route.iter().filter(|n| !instance.depots.contains(n)).count())
            .sum()
    }

    /// Map every route back to the labels of the instance file
    pub fn labelled_routes(&self, instance: &MdmtspInstance) -> Vec<LabelledRoute> {
        self.routes.iter()
            .map(|r| LabelledRoute {
                depot: instance.label(r.depot),
                route: r.solution.route.iter().map(|&n| instance.label(n)).collect(),
                cost: r.solution.cost,
            })
            .collect()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
