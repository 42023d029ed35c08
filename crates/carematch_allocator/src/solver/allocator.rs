//! Drives one problem instance through build, solve and extraction.
//!
//! Each step consumes the allocator and returns it in its next state, so a
//! step can never be repeated and a new problem needs a new allocator.

use tracing::{info, instrument, warn};

use crate::{
    model::assignment_program::AssignmentProgram,
    problem::allocation_problem::AllocationProblem,
    solver::{
        allocation_result::AllocationResult,
        assignment_solver::{AssignmentSolver, SolveOutcome},
        error::AllocationError,
        solve_status::SolveStatus,
        solver_params::AllocatorParams,
    },
};

pub struct Unbuilt;

pub struct Built {
    program: AssignmentProgram,
}

pub struct Solved {
    program: AssignmentProgram,
    outcome: SolveOutcome,
}

pub struct Allocator<State> {
    problem: AllocationProblem,
    params: AllocatorParams,
    state: State,
}

impl Allocator<Unbuilt> {
    pub fn new(problem: AllocationProblem, params: AllocatorParams) -> Self {
        Allocator {
            problem,
            params,
            state: Unbuilt,
        }
    }

    pub fn build(self) -> Allocator<Built> {
        let program = AssignmentProgram::build(&self.problem, self.params.tie_breaking);
        Allocator {
            problem: self.problem,
            params: self.params,
            state: Built { program },
        }
    }
}

impl Allocator<Built> {
    pub fn program(&self) -> &AssignmentProgram {
        &self.state.program
    }

    #[instrument(skip_all, level = "debug", fields(solver = solver.name()))]
    pub fn solve(self, solver: &dyn AssignmentSolver) -> Result<Allocator<Solved>, AllocationError> {
        let outcome = solver.solve(&self.state.program, &self.params)?;

        if outcome.status == SolveStatus::Infeasible {
            warn!("Solver reported the assignment program as infeasible");
            return Err(AllocationError::InfeasibleProblem);
        }

        Ok(Allocator {
            problem: self.problem,
            params: self.params,
            state: Solved {
                program: self.state.program,
                outcome,
            },
        })
    }
}

impl Allocator<Solved> {
    pub fn status(&self) -> SolveStatus {
        self.state.outcome.status
    }

    /// Final step. A timed out solve is surfaced as
    /// [`AllocationError::SolverTimeout`] carrying the best assignment found.
    pub fn extract(self) -> Result<AllocationResult, AllocationError> {
        let result =
            AllocationResult::extract(&self.problem, &self.state.program, &self.state.outcome);

        match result.status() {
            SolveStatus::Optimal | SolveStatus::Feasible => Ok(result),
            SolveStatus::Infeasible => Err(AllocationError::InfeasibleProblem),
            SolveStatus::TimedOut => Err(AllocationError::SolverTimeout {
                limit: self.params.max_solve_time.unwrap_or_default(),
                best_found: Box::new(result),
            }),
        }
    }
}

/// Builds, solves and extracts `problem` with the backend selected in `params`.
#[instrument(skip_all, fields(hospitals = problem.num_hospitals(), helpers = problem.num_helpers()))]
pub fn allocate(
    problem: AllocationProblem,
    params: AllocatorParams,
) -> Result<AllocationResult, AllocationError> {
    let solver = params.backend.solver();
    let result = Allocator::new(problem, params)
        .build()
        .solve(solver.as_ref())?
        .extract()?;

    info!(
        objective = result.objective(),
        assignments = result.assignment_count(),
        status = %result.status(),
        "Allocation finished"
    );

    Ok(result)
}
