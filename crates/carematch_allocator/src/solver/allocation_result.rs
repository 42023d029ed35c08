use tracing::{debug, instrument, warn};

use crate::{
    model::{assignment_program::AssignmentProgram, objective::objective_value},
    problem::{
        allocation_problem::AllocationProblem, helper::HelperIdx, hospital::HospitalIdx,
        travel_cost_matrix::Cost,
    },
    solver::{assignment_solver::SolveOutcome, solve_status::SolveStatus},
};

/// Helpers assigned to one hospital, sorted by helper id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalAllocation {
    pub hospital_id: String,
    pub helper_ids: Vec<String>,
}

/// One assigned pair together with the skills it covers, that is the
/// helper's skills for which the hospital has a positive demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub hospital_id: String,
    pub helper_id: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult {
    objective: Option<Cost>,
    status: SolveStatus,
    allocations: Vec<HospitalAllocation>,
    matches: Vec<Match>,
}

impl AllocationResult {
    /// Reads the solved values back into per-hospital lists.
    ///
    /// Presentation is deterministic for a given set of values: hospitals keep
    /// their input order and helpers are sorted by id. The objective is
    /// recomputed exactly from the extracted pairs.
    #[instrument(skip_all, level = "debug", fields(status = %outcome.status))]
    pub fn extract(
        problem: &AllocationProblem,
        program: &AssignmentProgram,
        outcome: &SolveOutcome,
    ) -> Self {
        if !outcome.status.has_solution() {
            return AllocationResult::infeasible(problem);
        }

        let mut assigned: Vec<Vec<HelperIdx>> = vec![Vec::new(); problem.num_hospitals()];
        for (position, _) in outcome
            .values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value)
        {
            let variable = program.variable(position.into());
            assigned[variable.hospital.get()].push(variable.helper);
        }

        let objective = objective_value(
            problem,
            assigned.iter().enumerate().flat_map(|(hospital, helpers)| {
                helpers
                    .iter()
                    .map(move |&helper| (HospitalIdx::new(hospital), helper))
            }),
        );

        if (objective as f64 - outcome.objective_value).abs() >= 0.5 {
            warn!(
                objective,
                reported = outcome.objective_value,
                "Solver objective differs from the extracted assignment"
            );
        }

        let mut allocations = Vec::with_capacity(problem.num_hospitals());
        let mut matches = Vec::new();

        for (hospital_idx, hospital) in problem.hospitals_iter() {
            let mut helpers = assigned[hospital_idx.get()].clone();
            helpers.sort_by(|a, b| {
                problem
                    .helper(*a)
                    .external_id()
                    .cmp(problem.helper(*b).external_id())
            });

            for &helper_idx in &helpers {
                let helper = problem.helper(helper_idx);
                matches.push(Match {
                    hospital_id: hospital.external_id().to_owned(),
                    helper_id: helper.external_id().to_owned(),
                    skills: helper
                        .sorted_skills()
                        .into_iter()
                        .filter(|skill| hospital.demand_for(skill).is_some_and(|count| count > 0))
                        .map(|skill| skill.to_string())
                        .collect(),
                });
            }

            allocations.push(HospitalAllocation {
                hospital_id: hospital.external_id().to_owned(),
                helper_ids: helpers
                    .into_iter()
                    .map(|helper| problem.helper(helper).external_id().to_owned())
                    .collect(),
            });
        }

        debug!(objective, assignments = matches.len(), "Extracted allocation");

        AllocationResult {
            objective: Some(objective),
            status: outcome.status,
            allocations,
            matches,
        }
    }

    /// No assignment; every hospital is listed with an empty helper list.
    pub fn infeasible(problem: &AllocationProblem) -> Self {
        AllocationResult {
            objective: None,
            status: SolveStatus::Infeasible,
            allocations: problem
                .hospitals()
                .iter()
                .map(|hospital| HospitalAllocation {
                    hospital_id: hospital.external_id().to_owned(),
                    helper_ids: Vec::new(),
                })
                .collect(),
            matches: Vec::new(),
        }
    }

    pub fn objective(&self) -> Option<Cost> {
        self.objective
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_proven_optimal(&self) -> bool {
        self.status.is_proven_optimal()
    }

    pub fn allocations(&self) -> &[HospitalAllocation] {
        &self.allocations
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn assignment_count(&self) -> usize {
        self.matches.len()
    }

    pub fn helper_ids_for(&self, hospital_id: &str) -> Option<&[String]> {
        self.allocations
            .iter()
            .find(|allocation| allocation.hospital_id == hospital_id)
            .map(|allocation| allocation.helper_ids.as_slice())
    }
}
