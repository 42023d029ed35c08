use jiff::SignedDuration;

use crate::solver::{
    assignment_solver::AssignmentSolver, greedy_solver::GreedySolver, milp_solver::MilpSolver,
};

#[derive(Clone, Debug)]
pub struct AllocatorParams {
    /// Upper bound on the time the caller waits for the solver. `None` waits
    /// until the backend finishes.
    pub max_solve_time: Option<SignedDuration>,

    /// Adds a tiny index-ranked penalty to every pair so that equally good
    /// assignments prefer early hospitals and low helper indices. See
    /// [`crate::model::objective::TieBreaker`] for its limits.
    pub tie_breaking: bool,

    pub backend: SolverBackend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverBackend {
    Milp,
    Greedy,
}

impl SolverBackend {
    pub fn solver(&self) -> Box<dyn AssignmentSolver> {
        match self {
            SolverBackend::Milp => Box::new(MilpSolver),
            SolverBackend::Greedy => Box::new(GreedySolver),
        }
    }
}

impl Default for AllocatorParams {
    fn default() -> Self {
        Self {
            max_solve_time: None,
            tie_breaking: false,
            backend: SolverBackend::Milp,
        }
    }
}
