use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The assignment is proven optimal.
    Optimal,
    /// The assignment is feasible but not proven optimal.
    Feasible,
    Infeasible,
    /// The time limit was reached; the assignment is the best one found so far.
    TimedOut,
}

impl SolveStatus {
    pub fn is_proven_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    pub fn has_solution(&self) -> bool {
        !matches!(self, SolveStatus::Infeasible)
    }
}

impl Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SolveStatus::Optimal => "optimal",
                SolveStatus::Feasible => "feasible",
                SolveStatus::Infeasible => "infeasible",
                SolveStatus::TimedOut => "timed_out",
            }
        )
    }
}
