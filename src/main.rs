//! MDMTSP Solver - Command Line Interface
//!
//! Solves Multi-Depot Multiple Traveling Salesman instances by partitioning
//! clients among depots and optimizing one route per depot with Tabu Search.

use clap::{Args, Parser, Subcommand, ValueEnum};
use mdmtsp_solver::benchmark::{load_instance, load_instances_from_dir, Benchmark, BenchmarkConfig, InstanceFormat};
use mdmtsp_solver::heuristics::local_search::TabuConfig;
use mdmtsp_solver::instance::Rounding;
use mdmtsp_solver::solver::{self, MdmtspSolver, PartitionStrategy, SolverConfig};
use mdmtsp_solver::Result;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mdmtsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Tabu Search solver for the Multi-Depot Multiple TSP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single instance
    Solve {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Keep the cheapest of this many seeded runs
        #[arg(short, long, default_value = "1")]
        runs: usize,

        /// Write the solution as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        solver: SolverArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing .dat instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Number of seeded runs per instance
        #[arg(short, long, default_value = "1")]
        runs: usize,

        #[command(flatten)]
        solver: SolverArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Number of depots, for AMPL files without DEPOSITOS/CLIENTES sets
    #[arg(long)]
    depots: Option<usize>,

    /// Read raw coordinate files instead of AMPL data, rounding scaled distances this way
    #[arg(long, value_enum)]
    coordinates: Option<CoordinateRounding>,
}

impl InputArgs {
    fn format(&self) -> InstanceFormat {
        match self.coordinates {
            Some(CoordinateRounding::Ceil) => InstanceFormat::Coordinates { rounding: Rounding::Ceil },
            Some(CoordinateRounding::Round) => InstanceFormat::Coordinates { rounding: Rounding::Round },
            None => InstanceFormat::Ampl { depots: self.depots },
        }
    }
}

#[derive(Args, Debug)]
struct SolverArgs {
    /// Client to depot assignment
    #[arg(long, value_enum, default_value = "nearest")]
    partition: Partition,

    /// Number of k-means clusters (defaults to the number of depots)
    #[arg(long)]
    clusters: Option<usize>,

    /// Whether routes pass through their depot
    #[arg(long, value_enum, default_value = "excluded")]
    depot_mode: DepotMode,

    /// Route improvement after greedy construction
    #[arg(long, value_enum, default_value = "tabu")]
    improvement: Improvement,

    /// Maximum Tabu Search iterations per route
    #[arg(long, default_value = "1000")]
    max_iterations: usize,

    /// Tabu tenure (number of remembered moves)
    #[arg(long, default_value = "30")]
    tenure: usize,

    /// Iterations without improvement before restarting from the best route
    #[arg(long, default_value = "20")]
    stagnation_limit: usize,

    /// Time limit per route in seconds
    #[arg(short, long)]
    time_limit: Option<f64>,

    /// Random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Optimize depot routes in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum CoordinateRounding {
    /// ceil(100 * distance)
    Ceil,
    /// round(100 * distance)
    Round,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Partition {
    /// Each client goes to its closest depot
    Nearest,
    /// K-means on client to depot costs
    Kmeans,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum DepotMode {
    /// Closed tours over the clients only
    Excluded,
    /// Tours start and end at the depot
    Anchored,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Improvement {
    /// Tabu Search with 2-opt moves
    Tabu,
    /// Best-improvement 2-opt descent
    TwoOpt,
    /// Greedy routes only
    None,
}

impl SolverArgs {
    fn to_config(&self) -> SolverConfig {
        let mut tabu = TabuConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_tabu_tenure(self.tenure)
            .with_stagnation_limit(self.stagnation_limit);
        if let Some(limit) = self.time_limit {
            tabu = tabu.with_time_limit(limit);
        }

        SolverConfig {
            partition: match self.partition {
                Partition::Nearest => PartitionStrategy::Nearest,
                Partition::Kmeans => PartitionStrategy::KMeans { clusters: self.clusters },
            },
            depot_mode: match self.depot_mode {
                DepotMode::Excluded => solver::DepotMode::Excluded,
                DepotMode::Anchored => solver::DepotMode::Anchored,
            },
            improvement: match self.improvement {
                Improvement::Tabu => solver::Improvement::Tabu,
                Improvement::TwoOpt => solver::Improvement::TwoOpt,
                Improvement::None => solver::Improvement::None,
            },
            tabu,
            seed: self.seed,
            parallel: self.parallel,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { instance, input, runs, output, solver, verbose } => {
            init_logging(verbose);
            solve_instance(&instance, input.format(), runs, output.as_deref(), &solver, verbose)
        }

        Commands::Benchmark { dir, output, input, runs, solver, verbose } => {
            init_logging(verbose);
            run_benchmark(&dir, &output, input.format(), runs, &solver)
        }

        Commands::Analyze { instance, input } => {
            init_logging(false);
            analyze_instance(&instance, input.format())
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_instance(
    path: &Path,
    format: InstanceFormat,
    runs: usize,
    output: Option<&Path>,
    args: &SolverArgs,
    verbose: bool,
) -> Result<()> {
    println!("Loading instance from {:?}...", path);
    let instance = load_instance(path, format)?;

    if verbose {
        println!("{}", instance.statistics());
    }

    let solver = MdmtspSolver::new(args.to_config())?;
    let solution = if runs > 1 {
        solver.solve_best_of(&instance, runs)?
    } else {
        solver.solve(&instance)?
    };

    println!("\n========== Results ==========");
    println!("Instance: {}", instance.name);
    println!("Depots: {}", instance.num_depots());
    println!("Clients served: {}/{}", solution.num_served(&instance), instance.num_clients());
    println!("Total cost: {}", solution.total_cost.round() as i64);
    println!("Time: {:.4}s", solution.elapsed_secs());
    println!("Seed: {}", solution.seed);

    println!();
    for route in solution.labelled_routes(&instance) {
        println!("Depot {:>4} (cost {:>8.0}): {:?}", route.depot, route.cost, route.route);
    }

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    Ok(())
}

fn run_benchmark(
    dir: &Path,
    output: &Path,
    format: InstanceFormat,
    runs: usize,
    args: &SolverArgs,
) -> Result<()> {
    println!("Loading instances from {:?}...", dir);
    let instances = load_instances_from_dir(dir, format)?;
    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return Ok(());
    }

    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig {
        num_runs: runs.max(1),
        solver: args.to_config(),
        show_progress: true,
    };
    let mut benchmark = Benchmark::new(config)?;
    benchmark.run_on_instances(&instances)?;

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

fn analyze_instance(path: &Path, format: InstanceFormat) -> Result<()> {
    let instance = load_instance(path, format)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let depot_labels: Vec<_> = instance.depots.iter().map(|&d| instance.label(d)).collect();
    println!("\nDepot labels: {:?}", depot_labels);

    Ok(())
}
