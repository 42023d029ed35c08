use jiff::SignedDuration;
use thiserror::Error;

use crate::{problem::validation::ValidationError, solver::allocation_result::AllocationResult};

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("no feasible assignment exists")]
    InfeasibleProblem,

    /// The best assignment found before the deadline, never proven optimal.
    #[error("solver did not finish within {limit}")]
    SolverTimeout {
        limit: SignedDuration,
        best_found: Box<AllocationResult>,
    },

    #[error("solver unavailable: {0}")]
    SolverUnavailable(String),
}
