use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use carematch_allocator::{
    json::types::{JsonAllocationProblem, JsonAllocationResult},
    problem::allocation_problem::AllocationProblem,
    solver::{
        allocation_result::AllocationResult,
        allocator::allocate,
        error::AllocationError,
        solver_params::{AllocatorParams, SolverBackend},
    },
};
use clap::{Args, ValueEnum};
use tracing::{info, warn};

use crate::parsers;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SolverArg {
    /// Exact 0/1 program solver
    Milp,
    /// Fast constructive heuristic, not proven optimal
    Greedy,
}

impl From<SolverArg> for SolverBackend {
    fn from(value: SolverArg) -> Self {
        match value {
            SolverArg::Milp => SolverBackend::Milp,
            SolverArg::Greedy => SolverBackend::Greedy,
        }
    }
}

#[derive(Args)]
pub struct SolveArgs {
    /// The allocation problem to solve
    #[arg(short, long)]
    input: PathBuf,

    /// Result file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Solver time limit (e.g., "30s", "5m", "PT1M30S")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,

    /// Break ties between equally good assignments deterministically
    #[arg(long)]
    tie_breaking: bool,

    /// Treat skills missing from a hospital's demand as a demand of zero
    #[arg(long)]
    implicit_zero_demand: bool,

    #[arg(long, value_enum, default_value_t = SolverArg::Milp)]
    solver: SolverArg,
}

pub fn read_problem(path: &Path, implicit_zero_demand: bool) -> anyhow::Result<AllocationProblem> {
    let reader = BufReader::new(File::open(path)?);
    let input: JsonAllocationProblem = serde_json::from_reader(reader)?;

    Ok(input.build_problem(implicit_zero_demand)?)
}

/// Runs the allocator and turns the recoverable outcomes into a result:
/// a timeout yields the best assignment found, an infeasible problem yields
/// an empty allocation without objective.
pub fn solve_problem(
    problem: AllocationProblem,
    params: AllocatorParams,
) -> anyhow::Result<AllocationResult> {
    let infeasible = AllocationResult::infeasible(&problem);

    match allocate(problem, params) {
        Ok(result) => Ok(result),
        Err(AllocationError::SolverTimeout { limit, best_found }) => {
            warn!(%limit, "Solver timed out, keeping the best assignment found");
            Ok(*best_found)
        }
        Err(AllocationError::InfeasibleProblem) => {
            warn!("Problem is infeasible");
            Ok(infeasible)
        }
        Err(err) => Err(err.into()),
    }
}

pub fn write_result(result: &AllocationResult, output: Option<&Path>) -> anyhow::Result<()> {
    let json = JsonAllocationResult::from(result);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &json)?;
            writer.flush()?;
            info!("Result written to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &json)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    info!("Solving {:?}", args.input);
    let problem = read_problem(&args.input, args.implicit_zero_demand)?;

    let params = AllocatorParams {
        max_solve_time: match args.timeout {
            Some(timeout) => Some(timeout),
            None => parsers::max_solve_time_from_env()?,
        },
        tie_breaking: args.tie_breaking,
        backend: args.solver.into(),
    };

    let result = solve_problem(problem, params)?;
    info!(
        status = %result.status(),
        objective = ?result.objective(),
        assignments = result.assignment_count(),
        "Solved"
    );

    write_result(&result, args.output.as_deref())
}
