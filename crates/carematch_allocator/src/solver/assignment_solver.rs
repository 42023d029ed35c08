use crate::{
    model::assignment_program::AssignmentProgram,
    solver::{error::AllocationError, solve_status::SolveStatus, solver_params::AllocatorParams},
};

/// Raw answer of a solver backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// One entry per program variable; all false when `status` is infeasible.
    pub values: Vec<bool>,
    /// Objective reported for `values`, tie-breaking penalty included.
    pub objective_value: f64,
}

impl SolveOutcome {
    pub fn new(program: &AssignmentProgram, status: SolveStatus, values: Vec<bool>) -> Self {
        let objective_value = program.objective_value(&values);
        SolveOutcome {
            status,
            values,
            objective_value,
        }
    }

    pub fn infeasible(program: &AssignmentProgram) -> Self {
        SolveOutcome {
            status: SolveStatus::Infeasible,
            values: vec![false; program.num_variables()],
            objective_value: 0.0,
        }
    }
}

/// A backend able to maximize an [`AssignmentProgram`].
///
/// Implementations report infeasibility and time limits through
/// [`SolveOutcome::status`]; an `Err` means the backend itself could not be
/// run and is only ever [`AllocationError::SolverUnavailable`].
pub trait AssignmentSolver {
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        program: &AssignmentProgram,
        params: &AllocatorParams,
    ) -> Result<SolveOutcome, AllocationError>;
}
