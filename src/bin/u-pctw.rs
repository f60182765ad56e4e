//! Command line front end: solve single instances, run batches, and
//! generate random instances.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::info;
use thiserror::Error;

use u_pctw::batch::{evaluate_dir, write_results, BatchError};
use u_pctw::evaluation::TourEvaluator;
use u_pctw::fpt::FptSolver;
use u_pctw::generate::{generate, GeneratorConfig};
use u_pctw::io::{read_graph, write_graph, write_tour_table, GraphError};
use u_pctw::models::{InstanceError, PrizeMode};

/// Exact prize-collecting TSP with time windows.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one `.graph` instance and print the optimal tour.
    Solve(SolveArgs),
    /// Solve every `.graph` file in a directory and write runtime reports.
    Batch(BatchArgs),
    /// Write a random instance in `.graph` format.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Path to the instance file.
    instance: PathBuf,
    /// Ignore the prize column: every location is worth 1.
    #[arg(short, long)]
    unit_prizes: bool,
    /// Print the solution as JSON instead of a table.
    #[arg(long)]
    json: bool,
    /// Replay the tour and fail if it violates any time window.
    #[arg(long)]
    verify: bool,
    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory containing `.graph` files.
    dir: PathBuf,
    /// Directory receiving the reports.
    #[arg(short, long, default_value = "results")]
    out: PathBuf,
    /// Ignore the prize column: every location is worth 1.
    #[arg(short, long)]
    unit_prizes: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of locations besides the depot.
    #[arg(short, long, default_value_t = 10)]
    nodes: usize,
    /// Random seed.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Side length of the coordinate grid.
    #[arg(long, default_value_t = 100)]
    grid: u32,
    /// Latest release time.
    #[arg(long, default_value_t = 200)]
    horizon: u32,
    /// Smallest time window width.
    #[arg(long, default_value_t = 10)]
    min_window: u32,
    /// Largest time window width.
    #[arg(long, default_value_t = 60)]
    max_window: u32,
    /// Largest service duration.
    #[arg(long, default_value_t = 10)]
    max_duration: u32,
    /// Largest prize.
    #[arg(long, default_value_t = 10)]
    max_prize: u64,
    /// Write the instance to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tour failed verification: {0}")]
    Verification(String),
}

fn prize_mode(unit_prizes: bool) -> PrizeMode {
    if unit_prizes {
        PrizeMode::Unit
    } else {
        PrizeMode::FromSource
    }
}

fn open_output(path: Option<&PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn solve(args: &SolveArgs) -> Result<(), CliError> {
    let instance = read_graph(&args.instance, prize_mode(args.unit_prizes))?;
    let solution = FptSolver::new(&instance).solve();

    if args.verify {
        let (prize, violations) = TourEvaluator::new(&instance).evaluate(solution.tour());
        if !violations.is_empty() || prize != solution.prize() {
            return Err(CliError::Verification(format!(
                "replayed prize {prize}, reported {}, violations {violations:?}",
                solution.prize()
            )));
        }
        match solution.tour().completion_time() {
            Some(end) => info!("tour verified, last service ends at {end}"),
            None => info!("tour verified, no location is reachable"),
        }
    }

    let mut out = open_output(args.output.as_ref())?;
    if args.json {
        serde_json::to_writer_pretty(&mut out, &solution)?;
        writeln!(out)?;
    } else {
        write_tour_table(&mut out, &solution)?;
    }
    out.flush()?;
    Ok(())
}

fn batch(args: &BatchArgs) -> Result<(), CliError> {
    let mode = prize_mode(args.unit_prizes);
    let records = evaluate_dir(&args.dir, mode)?;
    let (runtimes, paths) = write_results(&args.out, &records, mode)?;
    println!("{}", runtimes.display());
    println!("{}", paths.display());
    Ok(())
}

fn generate_instance(args: &GenerateArgs) -> Result<(), CliError> {
    let config = GeneratorConfig {
        locations: args.nodes,
        grid: args.grid,
        horizon: args.horizon,
        min_window: args.min_window,
        max_window: args.max_window,
        max_duration: args.max_duration,
        max_prize: args.max_prize,
    };
    let instance = generate(&config, args.seed)?;
    let mut out = open_output(args.output.as_ref())?;
    write_graph(&mut out, &instance)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Solve(args) => solve(args),
        Command::Batch(args) => batch(args),
        Command::Generate(args) => generate_instance(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
