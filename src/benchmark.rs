//! Benchmarking and experimentation module for MDMTSP.
//!
//! Runs the solver over a set of instances and seeds, collects one result per
//! run, aggregates them per instance and exports everything as CSV or as a
//! text report.

use crate::error::Result;
use crate::instance::{depot_count_from_name, MdmtspInstance, Rounding};
use crate::solver::{MdmtspSolver, SolverConfig};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Result of one solver run on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Instance name
    pub instance: String,
    /// Number of depots
    pub depots: usize,
    /// Number of clients
    pub clients: usize,
    /// Seed of the run
    pub seed: u64,
    /// Total cost over all routes
    pub total_cost: f64,
    /// Total cost rounded to the nearest integer
    pub rounded_cost: i64,
    /// Wall-clock time in seconds
    pub time: f64,
    /// Number of non-empty routes
    pub routes: usize,
}

/// Aggregated statistics of all runs on one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub instance: String,
    pub depots: usize,
    pub runs: usize,
    pub avg_cost: f64,
    pub std_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub best_seed: u64,
    pub avg_time: f64,
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs per instance
    pub num_runs: usize,
    /// Solver settings; run `r` uses seed `solver.seed + r`
    pub solver: SolverConfig,
    /// Show a progress bar over the instances
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 1,
            solver: SolverConfig::default(),
            show_progress: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    solver: MdmtspSolver,
    results: Vec<RunResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Result<Self> {
        let solver = MdmtspSolver::new(config.solver.clone())?;
        Ok(Benchmark {
            config,
            solver,
            results: Vec::new(),
        })
    }

    /// Run every configured seed on an instance
    pub fn run_instance(&mut self, instance: &MdmtspInstance) -> Result<()> {
        log::info!("Running benchmark on instance: {}", instance.name);

        for run in 0..self.config.num_runs as u64 {
            let seed = self.config.solver.seed.wrapping_add(run);
            let solution = self.solver.solve_with_seed(instance, seed)?;

            self.results.push(RunResult {
                instance: instance.name.clone(),
                depots: instance.num_depots(),
                clients: instance.num_clients(),
                seed,
                total_cost: solution.total_cost,
                rounded_cost: solution.total_cost.round() as i64,
                time: solution.elapsed_secs(),
                routes: solution.routes.len(),
            });
        }

        Ok(())
    }

    /// Run benchmark on multiple instances
    pub fn run_on_instances(&mut self, instances: &[MdmtspInstance]) -> Result<()> {
        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(instances.len() as u64);
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        for instance in instances {
            progress.set_message(instance.name.clone());
            self.run_instance(instance)?;
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(())
    }

    /// Compute statistics for each instance, ordered by instance name
    pub fn compute_statistics(&self) -> Vec<InstanceSummary> {
        let mut by_instance: BTreeMap<&str, Vec<&RunResult>> = BTreeMap::new();
        for result in &self.results {
            by_instance.entry(result.instance.as_str())
                .or_default()
                .push(result);
        }

        by_instance.into_iter()
            .map(|(name, runs)| {
                let costs: Vec<f64> = runs.iter().map(|r| r.total_cost).collect();
                let times: Vec<f64> = runs.iter().map(|r| r.time).collect();

                let best = runs.iter()
                    .fold(runs[0], |best, r| if r.total_cost < best.total_cost { r } else { best });
                let worst_cost = costs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let std_cost = if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 };

                InstanceSummary {
                    instance: name.to_string(),
                    depots: runs[0].depots,
                    runs: runs.len(),
                    avg_cost: costs.iter().mean(),
                    std_cost,
                    best_cost: best.total_cost,
                    worst_cost,
                    best_seed: best.seed,
                    avg_time: times.iter().mean(),
                    total_time: times.iter().sum(),
                }
            })
            .collect()
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        MDMTSP Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));

        report.push_str("-".repeat(86).as_str());
        report.push('\n');
        report.push_str(&format!("{:<24} {:>7} {:>5} {:>12} {:>12} {:>10} {:>10}\n",
            "Instance", "Depots", "Runs", "Best Cost", "Avg Cost", "Std Dev", "Avg Time"));
        report.push_str("-".repeat(86).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!("{:<24} {:>7} {:>5} {:>12.0} {:>12.2} {:>10.2} {:>10.4}\n",
                stat.instance,
                stat.depots,
                stat.runs,
                stat.best_cost.round(),
                stat.avg_cost,
                stat.std_cost,
                stat.avg_time));
        }

        report.push_str("-".repeat(86).as_str());
        report.push('\n');

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }
}

/// Layout of an instance file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFormat {
    /// AMPL data with a `param c` matrix. `depots` applies when the file does
    /// not declare its node sets; otherwise the count is taken from the name.
    Ampl { depots: Option<usize> },
    /// Raw `clients depots` header followed by coordinates
    Coordinates { rounding: Rounding },
}

impl Default for InstanceFormat {
    fn default() -> Self {
        InstanceFormat::Ampl { depots: None }
    }
}

/// Load one instance file in the given format
pub fn load_instance<P: AsRef<Path>>(path: P, format: InstanceFormat) -> Result<MdmtspInstance> {
    let path = path.as_ref();
    let depots = match format {
        InstanceFormat::Coordinates { rounding } => return MdmtspInstance::from_coordinates_file(path, rounding),
        InstanceFormat::Ampl { depots } => depots,
    };

    let from_name = path.file_stem()
        .and_then(|s| depot_count_from_name(&s.to_string_lossy()));
    match depots.or(from_name) {
        Some(k) => MdmtspInstance::from_file_with_depots(path, k),
        None => MdmtspInstance::from_file(path),
    }
}

/// Load every `.dat` instance of a directory, ordered by file name.
/// Files that fail to load are skipped with a warning.
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P, format: InstanceFormat) -> Result<Vec<MdmtspInstance>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "dat").unwrap_or(false))
        .collect();
    paths.sort();

    let mut instances = Vec::with_capacity(paths.len());
    for path in paths {
        match load_instance(&path, format) {
            Ok(instance) => instances.push(instance),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    Ok(instances)
}
