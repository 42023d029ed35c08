use tracing::{debug, instrument};

use crate::{
    model::assignment_program::AssignmentProgram,
    solver::{
        assignment_solver::{AssignmentSolver, SolveOutcome},
        error::AllocationError,
        solve_status::SolveStatus,
        solver_params::AllocatorParams,
    },
};

/// Constructive heuristic: takes the most valuable pairs first while every row
/// they appear in still has room. The result is always feasible, never proven
/// optimal.
pub struct GreedySolver;

impl GreedySolver {
    #[instrument(skip_all, level = "debug")]
    pub fn construct(program: &AssignmentProgram) -> Vec<bool> {
        let objective = program.objective();
        let constraints_by_variable = program.constraints_by_variable();
        let mut slack: Vec<i64> = program.constraints().iter().map(|c| c.bound()).collect();
        let mut values = vec![false; program.num_variables()];

        let mut order: Vec<usize> = (0..program.num_variables())
            .filter(|&variable| objective[variable] > 0.0)
            .collect();
        order.sort_by(|&a, &b| objective[b].total_cmp(&objective[a]).then(a.cmp(&b)));

        for variable in order {
            let rows = &constraints_by_variable[variable];
            if rows.iter().all(|row| slack[row.get()] >= 1) {
                for row in rows {
                    slack[row.get()] -= 1;
                }
                values[variable] = true;
            }
        }

        debug!(
            assigned = values.iter().filter(|value| **value).count(),
            "Greedy construction finished"
        );

        values
    }
}

impl AssignmentSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(
        &self,
        program: &AssignmentProgram,
        _params: &AllocatorParams,
    ) -> Result<SolveOutcome, AllocationError> {
        let values = GreedySolver::construct(program);
        Ok(SolveOutcome::new(program, SolveStatus::Feasible, values))
    }
}
