//! MDMTSP Solver Library
//!
//! A solver for the Multi-Depot Multiple Traveling Salesman Problem (MDMTSP).
//!
//! # Features
//!
//! - AMPL `.dat` instance parsing with explicit or name-derived depot sets,
//!   and raw coordinate files with ceil/round cost scaling
//! - Client to depot partitioning (nearest depot, k-means)
//! - Nearest Neighbor route construction
//! - Tabu Search over 2-opt segment reversals, plus a plain 2-opt descent
//! - Multi-seed benchmarking with CSV export
//!
//! # Example
//!
//! ```no_run
//! use mdmtsp_solver::{MdmtspInstance, MdmtspSolver, SolverConfig};
//!
//! let instance = MdmtspInstance::from_file_with_depots("mdmtsp-4-f_ampl.dat", 4).unwrap();
//! let solver = MdmtspSolver::new(SolverConfig::default()).unwrap();
//! let solution = solver.solve(&instance).unwrap();
//!
//! println!("Total cost: {:.0}", solution.total_cost);
//! ```

pub mod error;
pub mod instance;
pub mod solution;
pub mod heuristics;
pub mod partition;
pub mod solver;
pub mod benchmark;

pub use error::{Error, Result};
pub use instance::MdmtspInstance;
pub use solution::{MdmtspSolution, Solution};
pub use solver::{MdmtspSolver, SolverConfig};
