//! Local search improvement heuristics for MDMTSP routes.
//!
//! Both searches explore the same 2-opt neighborhood: reversing the segment
//! `route[i..=k]` for `1 <= i < k <= n - 2`. The first and last positions of
//! the route never move, so a depot placed at index 0 stays anchored.
//!
//! - Tabu Search with a bounded FIFO move memory and checkpoint restarts
//! - Plain best-improvement 2-opt descent

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::instance::CostMatrix;
use crate::solution::Solution;

/// Trait for local search improvement methods
pub trait LocalSearch {
    fn improve(&self, costs: &CostMatrix, solution: &mut Solution) -> bool;
    fn name(&self) -> &str;
}

/// Cost of `route` after reversing `route[i..=k]`, given the cost of `route`.
///
/// Symmetric matrices only change the two boundary edges; otherwise the
/// reversed route is written to `scratch` and evaluated in full.
fn segment_reversal_cost(
    costs: &CostMatrix,
    route: &[usize],
    route_cost: f64,
    i: usize,
    k: usize,
    scratch: &mut Vec<usize>,
) -> f64 {
    if costs.is_symmetric() {
        let prev = route[i - 1];
        let next = route[k + 1];
        route_cost
            - costs.cost(prev, route[i]) - costs.cost(route[k], next)
            + costs.cost(prev, route[k]) + costs.cost(route[i], next)
    } else {
        scratch.clear();
        scratch.extend_from_slice(route);
        scratch[i..=k].reverse();
        costs.route_cost(scratch)
    }
}

/// Tabu key of a segment reversal: the unordered pair of its boundary nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(usize, usize);

impl Move {
    pub fn new(a: usize, b: usize) -> Self {
        Move(a.min(b), a.max(b))
    }

    pub fn nodes(&self) -> (usize, usize) {
        (self.0, self.1)
    }
}

/// Bounded memory of the most recent moves.
///
/// The queue keeps eviction order, the set answers membership in O(1).
#[derive(Debug, Clone)]
pub struct TabuMemory {
    capacity: usize,
    queue: VecDeque<Move>,
    set: HashSet<Move>,
}

impl TabuMemory {
    pub fn new(capacity: usize) -> Self {
        TabuMemory {
            capacity,
            queue: VecDeque::with_capacity(capacity),
            set: HashSet::with_capacity(capacity),
        }
    }

    /// Record a move, evicting the oldest one when full. Pushing a move that
    /// is already remembered makes it the most recent entry.
    pub fn push(&mut self, mv: Move) {
        if self.capacity == 0 {
            return;
        }
        if self.set.contains(&mv) {
            self.queue.retain(|m| *m != mv);
        } else if self.queue.len() >= self.capacity {
            if let Some(oldest) = self.queue.pop_front() {
                self.set.remove(&oldest);
            }
        }
        self.queue.push_back(mv);
        self.set.insert(mv);
    }

    #[inline]
    pub fn contains(&self, mv: &Move) -> bool {
        self.set.contains(mv)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Tabu Search parameters
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Maximum number of moves
    pub max_iterations: usize,
    /// Number of recent moves that may not be repeated
    pub tabu_tenure: usize,
    /// Non-improving moves tolerated before returning to the checkpoint
    pub stagnation_limit: usize,
    /// Optional wall-clock limit in seconds, checked before every move
    pub time_limit: Option<f64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        TabuConfig {
            max_iterations: 1000,
            tabu_tenure: 30,
            stagnation_limit: 20,
            time_limit: None,
        }
    }
}

impl TabuConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    pub fn with_stagnation_limit(mut self, n: usize) -> Self {
        self.stagnation_limit = n;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn validate(&self) -> Result<()> {
        match self.time_limit {
            Some(t) if !t.is_finite() || t < 0.0 => Err(Error::invalid_config(format!(
                "tabu time limit must be a non-negative number of seconds, got {}", t
            ))),
            _ => Ok(()),
        }
    }
}

/// What a single Tabu Search iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The move produced a new best route
    Improved,
    /// The move was accepted without improving the best route
    Moved,
    /// The move exhausted the stagnation budget; the search is back at the checkpoint
    Restarted,
    /// Every candidate move is tabu (or the route is too short to have any)
    Exhausted,
}

/// Mutable state of one Tabu Search run
#[derive(Debug, Clone)]
pub struct TabuState {
    current: Vec<usize>,
    current_cost: f64,
    best: Vec<usize>,
    best_cost: f64,
    checkpoint: Vec<usize>,
    checkpoint_cost: f64,
    stagnation: usize,
    stagnation_limit: usize,
    restarts: usize,
    memory: TabuMemory,
    scratch: Vec<usize>,
}

impl TabuState {
    pub fn new(costs: &CostMatrix, route: Vec<usize>, config: &TabuConfig) -> Self {
        let cost = costs.route_cost(&route);
        TabuState {
            best: route.clone(),
            best_cost: cost,
            checkpoint: route.clone(),
            checkpoint_cost: cost,
            scratch: Vec::with_capacity(route.len()),
            current: route,
            current_cost: cost,
            stagnation: 0,
            stagnation_limit: config.stagnation_limit,
            restarts: 0,
            memory: TabuMemory::new(config.tabu_tenure),
        }
    }

    /// Apply the best non-tabu segment reversal of the current route.
    ///
    /// Ties keep the first candidate in `(i, k)` order. Tabu moves are never
    /// taken, even when they would beat the best route.
    pub fn step(&mut self, costs: &CostMatrix) -> StepOutcome {
        let n = self.current.len();
        if n < 4 {
            return StepOutcome::Exhausted;
        }

        let mut selected: Option<(usize, usize, f64)> = None;
        for i in 1..n - 2 {
            for k in i + 1..n - 1 {
                if self.memory.contains(&Move::new(self.current[i], self.current[k])) {
                    continue;
                }
                let cost = segment_reversal_cost(costs, &self.current, self.current_cost, i, k, &mut self.scratch);
                if selected.map_or(true, |(_, _, best)| cost < best) {
                    selected = Some((i, k, cost));
                }
            }
        }

        let (i, k) = match selected {
            Some((i, k, _)) => (i, k),
            None => return StepOutcome::Exhausted,
        };

        let mv = Move::new(self.current[i], self.current[k]);
        self.current[i..=k].reverse();
        self.current_cost = costs.route_cost(&self.current);
        self.memory.push(mv);

        if self.current_cost < self.best_cost {
            self.best.clone_from(&self.current);
            self.best_cost = self.current_cost;
            self.checkpoint.clone_from(&self.current);
            self.checkpoint_cost = self.current_cost;
            self.stagnation = 0;
            return StepOutcome::Improved;
        }

        self.stagnation += 1;
        if self.stagnation >= self.stagnation_limit {
            self.current.clone_from(&self.checkpoint);
            self.current_cost = self.checkpoint_cost;
            self.stagnation = 0;
            self.restarts += 1;
            return StepOutcome::Restarted;
        }

        StepOutcome::Moved
    }

    pub fn current(&self) -> &[usize] {
        &self.current
    }

    pub fn current_cost(&self) -> f64 {
        self.current_cost
    }

    pub fn best(&self) -> &[usize] {
        &self.best
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub fn checkpoint_cost(&self) -> f64 {
        self.checkpoint_cost
    }

    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn memory(&self) -> &TabuMemory {
        &self.memory
    }

    #[cfg(test)]
    pub(crate) fn forbid(&mut self, mv: Move) {
        self.memory.push(mv);
    }
}

/// Result of a Tabu Search run
#[derive(Debug, Clone)]
pub struct TabuOutcome {
    /// Best route found
    pub route: Vec<usize>,
    /// Cost of the best route
    pub cost: f64,
    /// Number of moves applied
    pub iterations: usize,
    /// Number of returns to the checkpoint
    pub restarts: usize,
    /// Whether the run ended because no non-tabu move was left
    pub exhausted: bool,
}

/// Tabu Search
///
/// Steepest descent over the 2-opt neighborhood that always moves to the best
/// non-tabu neighbor, even a worse one, and returns to the last improving
/// route after `stagnation_limit` moves without a new best.
pub struct TabuSearch {
    pub config: TabuConfig,
}

impl TabuSearch {
    pub fn new() -> Self {
        TabuSearch {
            config: TabuConfig::default(),
        }
    }

    pub fn with_config(config: TabuConfig) -> Self {
        TabuSearch { config }
    }

    pub fn with_params(tenure: usize, max_iterations: usize, stagnation_limit: usize) -> Self {
        TabuSearch {
            config: TabuConfig {
                tabu_tenure: tenure,
                max_iterations,
                stagnation_limit,
                time_limit: None,
            },
        }
    }

    /// Improve `route` and return the best route seen, which never costs more
    /// than `route` itself.
    pub fn run(&self, costs: &CostMatrix, route: Vec<usize>) -> TabuOutcome {
        let deadline = self.config.time_limit
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map(|limit| Instant::now() + limit);

        let mut state = TabuState::new(costs, route, &self.config);
        let mut iterations = 0;
        let mut exhausted = false;

        while iterations < self.config.max_iterations {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                log::debug!("tabu search hit its time limit after {} iterations", iterations);
                break;
            }

            match state.step(costs) {
                StepOutcome::Exhausted => {
                    exhausted = true;
                    break;
                }
                StepOutcome::Restarted => {
                    log::debug!(
                        "iteration {}: stagnation, back to checkpoint (cost {:.2})",
                        iterations, state.checkpoint_cost()
                    );
                }
                StepOutcome::Improved => {
                    log::trace!("iteration {}: new best {:.2}", iterations, state.best_cost());
                }
                StepOutcome::Moved => {}
            }
            iterations += 1;
        }

        TabuOutcome {
            cost: state.best_cost,
            route: state.best,
            iterations,
            restarts: state.restarts,
            exhausted,
        }
    }
}

impl Default for TabuSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TabuSearch {
    fn improve(&self, costs: &CostMatrix, solution: &mut Solution) -> bool {
        let initial_cost = costs.route_cost(&solution.route);
        let outcome = self.run(costs, std::mem::take(&mut solution.route));

        solution.route = outcome.route;
        solution.cost = outcome.cost;
        solution.iterations = Some(outcome.iterations);

        outcome.cost < initial_cost
    }

    fn name(&self) -> &str {
        "TabuSearch"
    }
}

/// 2-Opt Local Search
///
/// Applies the best improving segment reversal until none is left.
pub struct TwoOptSearch {
    /// Maximum number of applied moves
    pub max_iterations: usize,
}

impl TwoOptSearch {
    pub fn new() -> Self {
        TwoOptSearch {
            max_iterations: 1000,
        }
    }
}

impl Default for TwoOptSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalSearch for TwoOptSearch {
    fn improve(&self, costs: &CostMatrix, solution: &mut Solution) -> bool {
        solution.validate(costs);
        let n = solution.route.len();
        if n < 4 {
            solution.iterations = Some(0);
            return false;
        }

        let initial_cost = solution.cost;
        let mut scratch = Vec::with_capacity(n);
        let mut iterations = 0;

        while iterations < self.max_iterations {
            let mut best_move = None;
            let mut best_cost = solution.cost - 1e-9;

            for i in 1..n - 2 {
                for k in i + 1..n - 1 {
                    let cost = segment_reversal_cost(costs, &solution.route, solution.cost, i, k, &mut scratch);
                    if cost < best_cost {
                        best_cost = cost;
                        best_move = Some((i, k));
                    }
                }
            }

            match best_move {
                Some((i, k)) => {
                    solution.route[i..=k].reverse();
                    solution.validate(costs);
                    iterations += 1;
                }
                None => break,
            }
        }

        solution.iterations = Some(iterations);
        solution.cost < initial_cost
    }

    fn name(&self) -> &str {
        "2-Opt-BI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::tests::scenario_matrix;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    /// Euclidean matrix over random points, exactly symmetric
    fn random_euclidean(n: usize, seed: u64) -> CostMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();
        let rows = points.iter()
            .map(|&(xi, yi)| {
                points.iter()
                    .map(|&(xj, yj)| ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        CostMatrix::new(rows).unwrap()
    }

    fn random_asymmetric(n: usize, seed: u64) -> CostMatrix {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { rng.gen_range(1.0..50.0) }).collect())
            .collect();
        CostMatrix::new(rows).unwrap()
    }

    #[test]
    fn test_move_is_unordered() {
        assert_eq!(Move::new(3, 7), Move::new(7, 3));
        assert_eq!(Move::new(7, 3).nodes(), (3, 7));
    }

    #[test]
    fn test_memory_evicts_oldest() {
        let mut memory = TabuMemory::new(2);
        memory.push(Move::new(1, 2));
        memory.push(Move::new(3, 4));
        memory.push(Move::new(5, 6));

        assert_eq!(memory.len(), 2);
        assert!(!memory.contains(&Move::new(1, 2)));
        assert!(memory.contains(&Move::new(4, 3)));
        assert!(memory.contains(&Move::new(5, 6)));
    }

    #[test]
    fn test_memory_refreshes_repeated_move() {
        let mut memory = TabuMemory::new(2);
        memory.push(Move::new(1, 2));
        memory.push(Move::new(3, 4));
        memory.push(Move::new(2, 1));
        memory.push(Move::new(5, 6));

        assert_eq!(memory.len(), 2);
        assert!(memory.contains(&Move::new(1, 2)));
        assert!(!memory.contains(&Move::new(3, 4)));
    }

    #[test]
    fn test_memory_zero_capacity() {
        let mut memory = TabuMemory::new(0);
        memory.push(Move::new(1, 2));
        assert!(memory.is_empty());
        assert!(!memory.contains(&Move::new(1, 2)));
    }

    #[test]
    fn test_segment_reversal_cost_matches_full_evaluation() {
        let costs = random_euclidean(9, 3);
        let route: Vec<usize> = (0..9).collect();
        let base = costs.route_cost(&route);
        let mut scratch = Vec::new();

        for i in 1..7 {
            for k in i + 1..8 {
                let mut reversed = route.clone();
                reversed[i..=k].reverse();
                let fast = segment_reversal_cost(&costs, &route, base, i, k, &mut scratch);
                assert!((fast - costs.route_cost(&reversed)).abs() < 1e-9);
            }
        }
    }

    /// Nodes on a line at x = 0..n, cost = |xi - xj|
    fn line_matrix(n: usize) -> CostMatrix {
        let rows = (0..n)
            .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
            .collect();
        CostMatrix::new(rows).unwrap()
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let rows = (0..5)
            .map(|i| (0..5).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
            .collect();
        let costs = CostMatrix::new(rows).unwrap();
        let mut state = TabuState::new(&costs, vec![0, 1, 2, 3, 4], &TabuConfig::default());

        assert_eq!(state.step(&costs), StepOutcome::Moved);
        assert_eq!(state.current(), &[0, 2, 1, 3, 4]);
        assert!(state.memory().contains(&Move::new(1, 2)));
    }

    #[test]
    fn test_tabu_move_skipped_even_if_it_beats_best() {
        let costs = line_matrix(5);
        // 2 + 1 + 2 + 1 + 4; reversing positions (1, 2) is the only improving move (cost 8)
        let route = vec![0, 2, 1, 3, 4];
        let mut state = TabuState::new(&costs, route, &TabuConfig::default());
        assert_eq!(state.best_cost(), 10.0);

        state.forbid(Move::new(2, 1));
        assert_eq!(state.step(&costs), StepOutcome::Moved);

        // (1, 3) and (2, 3) both cost 12; the first one generated wins
        assert_eq!(state.current(), &[0, 3, 1, 2, 4]);
        assert_eq!(state.current_cost(), 12.0);
        assert_eq!(state.best_cost(), 10.0);
        assert_eq!(state.best(), &[0, 2, 1, 3, 4]);
    }

    #[test]
    fn test_zero_iterations_returns_initial_route() {
        let costs = random_euclidean(8, 1);
        let route: Vec<usize> = (0..8).rev().collect();
        let ts = TabuSearch::with_params(30, 0, 20);
        let outcome = ts.run(&costs, route.clone());

        assert_eq!(outcome.route, route);
        assert_eq!(outcome.cost, costs.route_cost(&route));
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_scenario_route_not_worsened() {
        let costs = scenario_matrix();
        let initial = vec![0, 1, 3, 2];
        let outcome = TabuSearch::new().run(&costs, initial.clone());

        assert!(outcome.cost <= costs.route_cost(&initial));
        // The single interior reversal becomes tabu after one move
        assert!(outcome.exhausted);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.route, initial);
    }

    #[test]
    fn test_short_routes_exhaust_immediately() {
        let costs = scenario_matrix();
        for route in [vec![], vec![2], vec![0, 1], vec![0, 1, 2]] {
            let outcome = TabuSearch::new().run(&costs, route.clone());
            assert!(outcome.exhausted);
            assert_eq!(outcome.iterations, 0);
            assert_eq!(outcome.route, route);
        }
    }

    #[test]
    fn test_never_worse_and_endpoints_fixed() {
        for seed in 0..6 {
            for costs in [random_euclidean(12, seed), random_asymmetric(10, seed)] {
                let n = costs.size();
                let mut route: Vec<usize> = (0..n).collect();
                route.shuffle(&mut ChaCha8Rng::seed_from_u64(seed + 100));
                let initial_cost = costs.route_cost(&route);

                let outcome = TabuSearch::with_params(5, 200, 10).run(&costs, route.clone());

                assert!(outcome.cost <= initial_cost);
                assert_eq!(outcome.cost, costs.route_cost(&outcome.route));
                assert_eq!(outcome.route[0], route[0]);
                assert_eq!(outcome.route[n - 1], route[n - 1]);
                let mut sorted = outcome.route.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, (0..n).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_memory_never_exceeds_tenure() {
        let costs = random_euclidean(10, 7);
        let config = TabuConfig::default().with_tabu_tenure(3).with_stagnation_limit(50);
        let mut state = TabuState::new(&costs, (0..10).collect(), &config);

        for _ in 0..100 {
            if state.step(&costs) == StepOutcome::Exhausted {
                break;
            }
            assert!(state.memory().len() <= 3);
        }
        assert_eq!(state.memory().len(), 3);
    }

    #[test]
    fn test_restart_returns_to_checkpoint_cost() {
        let costs = random_euclidean(10, 11);
        let config = TabuConfig::default().with_stagnation_limit(2);
        let mut state = TabuState::new(&costs, (0..10).collect(), &config);
        let mut restarts = 0;

        for _ in 0..300 {
            match state.step(&costs) {
                StepOutcome::Restarted => {
                    restarts += 1;
                    assert_eq!(state.current_cost(), state.checkpoint_cost());
                    assert_eq!(costs.route_cost(state.current()), state.checkpoint_cost());
                    assert_eq!(state.stagnation(), 0);
                }
                StepOutcome::Exhausted => break,
                _ => {}
            }
            assert!(state.best_cost() <= state.current_cost());
        }
        assert!(restarts > 0);
        assert_eq!(restarts, state.restarts());
    }

    #[test]
    fn test_deterministic_runs() {
        let costs = random_euclidean(15, 21);
        let route: Vec<usize> = (0..15).collect();
        let ts = TabuSearch::new();

        let a = ts.run(&costs, route.clone());
        let b = ts.run(&costs, route);
        assert_eq!(a.route, b.route);
        assert_eq!(a.cost.to_bits(), b.cost.to_bits());
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_improve_updates_solution() {
        let costs = random_euclidean(12, 5);
        let mut route: Vec<usize> = (0..12).collect();
        route.shuffle(&mut ChaCha8Rng::seed_from_u64(9));
        let mut solution = Solution::from_route(&costs, route, "test");
        let before = solution.cost;

        let improved = TabuSearch::new().improve(&costs, &mut solution);

        assert_eq!(improved, solution.cost < before);
        assert!(solution.cost <= before);
        assert!(solution.iterations.is_some());
    }

    #[test]
    fn test_two_opt_removes_crossing() {
        // Unit square corners plus midpoints; the route crosses itself
        let points = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (0.0, 1.0)];
        let rows = points.iter()
            .map(|&(xi, yi): &(f64, f64)| {
                points.iter()
                    .map(|&(xj, yj): &(f64, f64)| ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt())
                    .collect()
            })
            .collect();
        let costs = CostMatrix::new(rows).unwrap();
        let mut solution = Solution::from_route(&costs, vec![0, 1, 4, 3, 2, 5], "test");

        assert!(TwoOptSearch::new().improve(&costs, &mut solution));
        assert!((solution.cost - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_limit_validation() {
        assert!(TabuConfig::default().with_time_limit(-1.0).validate().is_err());
        assert!(TabuConfig::default().with_time_limit(0.5).validate().is_ok());

        let costs = random_euclidean(10, 2);
        let ts = TabuSearch::with_config(TabuConfig::default().with_time_limit(0.0));
        let outcome = ts.run(&costs, (0..10).collect());
        assert_eq!(outcome.iterations, 0);
    }
}
