//! Exact backend binding the program to `good_lp` with the pure Rust `microlp`
//! engine.
//!
//! The greedy construction is handed to the backend as a warm start, and a
//! configured `max_solve_time` is passed down as the backend's own time limit.
//! The solve runs on the calling thread, so nothing outlives the call.

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, SolverModel,
    Variable, WithInitialSolution, WithTimeLimit, constraint, microlp, variable,
};
use jiff::SignedDuration;
use tracing::{debug, instrument, warn};

use crate::{
    model::assignment_program::AssignmentProgram,
    solver::{
        assignment_solver::{AssignmentSolver, SolveOutcome},
        error::AllocationError,
        greedy_solver::GreedySolver,
        solve_status::SolveStatus,
        solver_params::AllocatorParams,
    },
};

pub struct MilpSolver;

impl AssignmentSolver for MilpSolver {
    fn name(&self) -> &'static str {
        "milp"
    }

    #[instrument(skip_all, level = "debug", fields(variables = program.num_variables()))]
    fn solve(
        &self,
        program: &AssignmentProgram,
        params: &AllocatorParams,
    ) -> Result<SolveOutcome, AllocationError> {
        if program.num_variables() == 0 {
            return Ok(SolveOutcome::new(program, SolveStatus::Optimal, Vec::new()));
        }

        solve_milp(program, params.max_solve_time)
    }
}

fn solve_milp(
    program: &AssignmentProgram,
    time_limit: Option<SignedDuration>,
) -> Result<SolveOutcome, AllocationError> {
    let incumbent = GreedySolver::construct(program);

    let mut problem_variables = ProblemVariables::new();
    let columns: Vec<Variable> = program
        .variables()
        .iter()
        .map(|_| problem_variables.add(variable().binary()))
        .collect();

    let objective: Expression = program
        .objective()
        .iter()
        .zip(&columns)
        .map(|(&coefficient, &column)| coefficient * column)
        .sum();

    let warm_start: Vec<(Variable, f64)> = columns
        .iter()
        .zip(&incumbent)
        .map(|(&column, &value)| (column, if value { 1.0 } else { 0.0 }))
        .collect();

    let mut model = problem_variables
        .maximise(objective)
        .using(microlp)
        .with_initial_solution(warm_start);

    if let Some(limit) = time_limit {
        model = model.with_time_limit(limit.unsigned_abs().as_secs_f64());
    }

    for row in program.constraints() {
        let lhs: Expression = row
            .variables()
            .iter()
            .map(|variable| columns[variable.get()])
            .sum();
        model = model.with(constraint!(lhs <= row.bound() as f64));
    }

    match model.solve() {
        Ok(solution) => {
            let values: Vec<bool> = columns
                .iter()
                .map(|&column| solution.value(column) > 0.5)
                .collect();

            match solution.status() {
                SolutionStatus::Optimal => {
                    Ok(SolveOutcome::new(program, SolveStatus::Optimal, values))
                }
                SolutionStatus::TimeLimit | SolutionStatus::GapLimit => {
                    warn!("Solver stopped at its time limit before proving optimality");
                    Ok(best_of(program, values, incumbent))
                }
            }
        }
        Err(ResolutionError::Infeasible) => Ok(SolveOutcome::infeasible(program)),
        Err(ResolutionError::Other(reason)) if time_limit.is_some() => {
            warn!(reason, "Solver stopped at its time limit without a solution of its own");
            Ok(SolveOutcome::new(program, SolveStatus::TimedOut, incumbent))
        }
        Err(err) => Err(AllocationError::SolverUnavailable(err.to_string())),
    }
}

/// Interrupted solve: keeps the backend's assignment unless the greedy one is
/// better or the backend's is not feasible.
fn best_of(program: &AssignmentProgram, values: Vec<bool>, incumbent: Vec<bool>) -> SolveOutcome {
    let values = if program.is_feasible(&values)
        && program.objective_value(&values) >= program.objective_value(&incumbent)
    {
        values
    } else {
        debug!("Keeping the greedy incumbent");
        incumbent
    };

    SolveOutcome::new(program, SolveStatus::TimedOut, values)
}
