//! The 0/1 program handed to a solver backend.
//!
//! One boolean variable exists per (hospital, helper) pair of the full cross
//! product, stored row-major by hospital. Skill compatibility is not filtered
//! up front: it only enters through the capacity rows, which is why every
//! hospital must list every offered skill in its demand map.

use tracing::{debug, instrument, warn};

use crate::{
    define_index_newtype,
    model::objective::{TieBreaker, assignment_value},
    problem::{
        allocation_problem::AllocationProblem, helper::HelperIdx, hospital::HospitalIdx,
        skill::Skill,
    },
};

define_index_newtype!(VariableIdx, AssignmentVariable);
define_index_newtype!(ConstraintIdx, LinearConstraint);

/// `x[hospital][helper]`: the helper is assigned to the hospital.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentVariable {
    pub hospital: HospitalIdx,
    pub helper: HelperIdx,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    /// A helper is assigned to at most one hospital.
    Uniqueness { helper: HelperIdx },
    /// A hospital receives at most its demand of helpers offering a skill.
    Capacity { hospital: HospitalIdx, skill: Skill },
}

/// `sum(variables) <= bound`, all coefficients being one.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    kind: ConstraintKind,
    variables: Vec<VariableIdx>,
    bound: i64,
}

impl LinearConstraint {
    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn variables(&self) -> &[VariableIdx] {
        &self.variables
    }

    pub fn bound(&self) -> i64 {
        self.bound
    }

    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let count = self
            .variables
            .iter()
            .filter(|variable| values[variable.get()])
            .count();
        count as i64 <= self.bound
    }
}

/// Maximization program over binary variables.
#[derive(Debug, Clone)]
pub struct AssignmentProgram {
    variables: Vec<AssignmentVariable>,
    constraints: Vec<LinearConstraint>,
    objective: Vec<f64>,
    num_helpers: usize,
}

impl AssignmentProgram {
    #[instrument(skip_all, level = "debug")]
    pub fn build(problem: &AllocationProblem, tie_breaking: bool) -> Self {
        let num_helpers = problem.num_helpers();

        let variables: Vec<AssignmentVariable> = HospitalIdx::range(problem.num_hospitals())
            .flat_map(|hospital| {
                HelperIdx::range(num_helpers).map(move |helper| AssignmentVariable { hospital, helper })
            })
            .collect();

        let tie_breaker =
            tie_breaking.then(|| TieBreaker::new(problem.num_hospitals(), num_helpers));
        if let Some(tie_breaker) = tie_breaker {
            if !tie_breaker.is_reliable() {
                warn!(
                    epsilon = tie_breaker.epsilon(),
                    "Problem too large for a reliable tie-breaking preference"
                );
            }
        }
        let objective = variables
            .iter()
            .map(|variable| {
                let value = assignment_value(problem, variable.hospital, variable.helper) as f64;
                match tie_breaker {
                    Some(tie_breaker) => value - tie_breaker.penalty(variable.hospital, variable.helper),
                    None => value,
                }
            })
            .collect();

        let mut program = AssignmentProgram {
            variables,
            constraints: Vec::new(),
            objective,
            num_helpers,
        };

        program.add_uniqueness_constraints(problem);
        program.add_capacity_constraints(problem);

        debug!(
            variables = program.variables.len(),
            constraints = program.constraints.len(),
            tie_breaking,
            "Built assignment program"
        );

        program
    }

    fn add_uniqueness_constraints(&mut self, problem: &AllocationProblem) {
        for helper in HelperIdx::range(problem.num_helpers()) {
            let variables = HospitalIdx::range(problem.num_hospitals())
                .map(|hospital| self.variable_index(hospital, helper))
                .collect();

            self.push_constraint(ConstraintKind::Uniqueness { helper }, variables, 1);
        }
    }

    fn add_capacity_constraints(&mut self, problem: &AllocationProblem) {
        for (hospital_idx, hospital) in problem.hospitals_iter() {
            for (skill, demand) in hospital.sorted_demand() {
                let variables = problem
                    .helpers_iter()
                    .filter(|(_, helper)| helper.has_skill(skill))
                    .map(|(helper_idx, _)| self.variable_index(hospital_idx, helper_idx))
                    .collect();

                self.push_constraint(
                    ConstraintKind::Capacity {
                        hospital: hospital_idx,
                        skill: skill.clone(),
                    },
                    variables,
                    demand,
                );
            }
        }
    }

    /// Rows without variables are trivially satisfied and are not stored.
    fn push_constraint(&mut self, kind: ConstraintKind, variables: Vec<VariableIdx>, bound: i64) {
        if variables.is_empty() {
            return;
        }

        self.constraints.push(LinearConstraint {
            kind,
            variables,
            bound,
        });
    }

    #[inline(always)]
    pub fn variable_index(&self, hospital: HospitalIdx, helper: HelperIdx) -> VariableIdx {
        VariableIdx::new(hospital.get() * self.num_helpers + helper.get())
    }

    pub fn variables(&self) -> &[AssignmentVariable] {
        &self.variables
    }

    pub fn variable(&self, index: VariableIdx) -> AssignmentVariable {
        self.variables[index]
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Objective coefficient of every variable, indexed like [`Self::variables`].
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Value of the objective, tie-breaking penalty included, for a full
    /// assignment of the variables.
    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.objective
            .iter()
            .zip(values)
            .filter(|(_, value)| **value)
            .map(|(coefficient, _)| coefficient)
            .sum()
    }

    pub fn is_feasible(&self, values: &[bool]) -> bool {
        values.len() == self.variables.len()
            && self
                .constraints
                .iter()
                .all(|constraint| constraint.is_satisfied(values))
    }

    /// For every variable, the constraints it appears in.
    pub fn constraints_by_variable(&self) -> Vec<Vec<ConstraintIdx>> {
        let mut index: Vec<Vec<ConstraintIdx>> = vec![Vec::new(); self.variables.len()];
        for (position, constraint) in self.constraints.iter().enumerate() {
            for variable in &constraint.variables {
                index[variable.get()].push(ConstraintIdx::new(position));
            }
        }
        index
    }
}
