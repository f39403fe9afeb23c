//! End-to-end MDMTSP solving: depot partitioning, then per depot a greedy
//! route improved by local search, merged into one [`MdmtspSolution`].

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use crate::heuristics::local_search::{LocalSearch, TabuConfig, TabuSearch, TwoOptSearch};
use crate::instance::{CostMatrix, MdmtspInstance};
use crate::partition::{ClusterPartitioner, DepotGroup, DepotPartitioner, NearestDepotPartitioner};
use crate::solution::{DepotRoute, MdmtspSolution, Solution};

/// Whether the depot node is part of the routes
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DepotMode {
    /// Routes are closed tours over the clients only
    Excluded,
    /// Routes start at the depot and close back to it; the depot stays at index 0
    Anchored,
}

/// How clients are assigned to depots
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PartitionStrategy {
    Nearest,
    KMeans { clusters: Option<usize> },
}

/// Improvement applied to each greedy route
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Improvement {
    Tabu,
    TwoOpt,
    None,
}

/// Solver configuration
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub partition: PartitionStrategy,
    pub depot_mode: DepotMode,
    pub improvement: Improvement,
    pub tabu: TabuConfig,
    /// Seed of the random generator handed to the partitioner
    pub seed: u64,
    /// Optimize depot groups on the rayon thread pool
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            partition: PartitionStrategy::Nearest,
            depot_mode: DepotMode::Excluded,
            improvement: Improvement::Tabu,
            tabu: TabuConfig::default(),
            seed: 42,
            parallel: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if let PartitionStrategy::KMeans { clusters: Some(0) } = self.partition {
            return Err(Error::invalid_config("cluster count must be at least 1"));
        }
        self.tabu.validate()
    }
}

pub struct MdmtspSolver {
    config: SolverConfig,
}

impl MdmtspSolver {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(MdmtspSolver { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn partitioner(&self) -> Box<dyn DepotPartitioner + Send + Sync> {
        match self.config.partition {
            PartitionStrategy::Nearest => Box::new(NearestDepotPartitioner),
            PartitionStrategy::KMeans { clusters } => Box::new(ClusterPartitioner::kmeans(clusters)),
        }
    }

    /// Solve with the configured seed
    pub fn solve(&self, instance: &MdmtspInstance) -> Result<MdmtspSolution> {
        self.solve_with_seed(instance, self.config.seed)
    }

    pub fn solve_with_seed(&self, instance: &MdmtspInstance, seed: u64) -> Result<MdmtspSolution> {
        let start = Instant::now();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let partitioner = self.partitioner();

        log::info!(
            "Solving {} ({} clients, {} depots) with {} partitioning, seed {}",
            instance.name, instance.num_clients(), instance.num_depots(), partitioner.name(), seed
        );

        let groups = partitioner.partition(instance, &mut rng)?;
        let groups: Vec<&DepotGroup> = groups.iter().filter(|g| !g.clients.is_empty()).collect();

        let routes: Vec<DepotRoute> = if self.config.parallel {
            groups.par_iter().map(|g| self.route_group(&instance.costs, g)).collect::<Result<_>>()?
        } else {
            groups.iter().map(|g| self.route_group(&instance.costs, g)).collect::<Result<_>>()?
        };

        for r in &routes {
            log::debug!(
                "Depot {}: {} nodes, cost {:.2}",
                instance.label(r.depot), r.solution.route.len(), r.solution.cost
            );
        }

        let total_cost: f64 = routes.iter().map(|r| r.solution.cost).sum();
        let elapsed = start.elapsed();
        log::info!("{}: total cost {:.2} in {:.2}s", instance.name, total_cost, elapsed.as_secs_f64());

        Ok(MdmtspSolution { routes, total_cost, elapsed, seed })
    }

    /// Run `runs` passes with seeds `seed, seed + 1, ...` and keep the cheapest.
    pub fn solve_best_of(&self, instance: &MdmtspInstance, runs: usize) -> Result<MdmtspSolution> {
        if runs == 0 {
            return Err(Error::invalid_config("at least one run is required"));
        }

        let mut best: Option<MdmtspSolution> = None;
        for run in 0..runs as u64 {
            let solution = self.solve_with_seed(instance, self.config.seed.wrapping_add(run))?;
            if best.as_ref().map_or(true, |b| solution.total_cost < b.total_cost) {
                best = Some(solution);
            }
        }

        best.ok_or_else(|| Error::invalid_config("at least one run is required"))
    }

    fn route_group(&self, costs: &CostMatrix, group: &DepotGroup) -> Result<DepotRoute> {
        let nodes: Vec<usize> = match self.config.depot_mode {
            DepotMode::Excluded => group.clients.clone(),
            DepotMode::Anchored => std::iter::once(group.depot).chain(group.clients.iter().copied()).collect(),
        };
        // Partitioners are pluggable; reject indices the matrix cannot address
        costs.check_nodes(&nodes)?;

        let solution = self.optimize_route(costs, &nodes);
        debug_assert!(solution.is_permutation_of(&nodes));
        Ok(DepotRoute { depot: group.depot, solution })
    }

    /// Greedy construction from `nodes[0]` followed by the configured improvement
    pub fn optimize_route(&self, costs: &CostMatrix, nodes: &[usize]) -> Solution {
        let start = Instant::now();
        let construction = NearestNeighborHeuristic::new();
        let mut solution = construction.construct(costs, nodes);

        let search: Option<Box<dyn LocalSearch>> = match self.config.improvement {
            Improvement::Tabu => Some(Box::new(TabuSearch::with_config(self.config.tabu.clone()))),
            Improvement::TwoOpt => Some(Box::new(TwoOptSearch::new())),
            Improvement::None => None,
        };
        if let Some(search) = search {
            search.improve(costs, &mut solution);
            solution.algorithm = format!("{} + {}", construction.name(), search.name());
        }

        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }
}
