use crate::instance::CostMatrix;
use crate::solution::Solution;
use ordered_float::OrderedFloat;

pub trait ConstructionHeuristic {
    /// Build a route visiting every node of `nodes` exactly once.
    fn construct(&self, costs: &CostMatrix, nodes: &[usize]) -> Solution;
    fn name(&self) -> &str;
}

/// Nearest Neighbor Heuristic
///
/// Starts from `nodes[0]` and repeatedly appends the unvisited node that is
/// cheapest to reach from the last node of the route. Ties go to the lowest
/// node index so the construction is deterministic.
pub struct NearestNeighborHeuristic;

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic
    }

    fn find_nearest(&self, costs: &CostMatrix, current: usize, remaining: &[usize]) -> Option<usize> {
        remaining.iter()
            .enumerate()
            .min_by_key(|&(_, &n)| (OrderedFloat(costs.cost(current, n)), n))
            .map(|(pos, _)| pos)
    }
}

impl Default for NearestNeighborHeuristic {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, costs: &CostMatrix, nodes: &[usize]) -> Solution {
        let start = std::time::Instant::now();

        let (&first, rest) = match nodes.split_first() {
            Some(split) => split,
            None => return Solution::from_route(costs, Vec::new(), self.name()),
        };
        debug_assert!(!rest.contains(&first), "duplicate node {} in construction input", first);

        let mut route = Vec::with_capacity(nodes.len());
        route.push(first);
        let mut remaining = rest.to_vec();
        let mut current = first;

        while let Some(pos) = self.find_nearest(costs, current, &remaining) {
            let next = remaining.swap_remove(pos);
            route.push(next);
            current = next;
        }

        let mut solution = Solution::from_route(costs, route, self.name());
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}
