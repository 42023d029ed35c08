use crate::problem::{
    allocation_problem::AllocationProblem, helper::HelperIdx, hospital::HospitalIdx,
    travel_cost_matrix::Cost,
};

/// Fixed reward for every helper placed at a hospital. It has to dominate any
/// single travel cost so that the number of matches is maximized first, and it
/// is coupled to [`crate::problem::travel_cost_matrix::DISTANCE_SCALE`].
pub const ASSIGNMENT_REWARD: Cost = 100;

/// Objective contribution of assigning one helper to one hospital.
pub fn assignment_value(problem: &AllocationProblem, hospital: HospitalIdx, helper: HelperIdx) -> Cost {
    ASSIGNMENT_REWARD - problem.travel_cost(hospital, helper)
}

/// Exact objective of a set of (hospital, helper) pairs.
pub fn objective_value<I>(problem: &AllocationProblem, pairs: I) -> Cost
where
    I: IntoIterator<Item = (HospitalIdx, HelperIdx)>,
{
    pairs
        .into_iter()
        .map(|(hospital, helper)| assignment_value(problem, hospital, helper))
        .sum()
}

/// Epsilon below which penalty differences get close to the backend's numeric
/// tolerances, roughly `num_hospitals * num_helpers^2 > 5e6`.
pub const MIN_RELIABLE_EPSILON: f64 = 1e-7;

/// Small per-pair penalty ranking pairs by `(hospital index, helper index)`.
///
/// Every helper is assigned at most once, so a feasible assignment holds at
/// most `num_helpers` pairs each ranked at most `num_hospitals * num_helpers`.
/// Epsilon keeps the total penalty below 0.5, which never outweighs a one unit
/// difference of the integer objective.
///
/// The penalty steers equally good assignments toward low helper indices and
/// early hospitals. It is additive, so exchanging two helpers between two
/// hospitals keeps the same total: the choice among such exchanges is left to
/// the backend, which is deterministic for a given program. Once epsilon drops
/// under [`MIN_RELIABLE_EPSILON`] the preference itself is no longer reliable,
/// only the integer optimum is.
#[derive(Debug, Clone, Copy)]
pub struct TieBreaker {
    epsilon: f64,
    num_helpers: usize,
}

impl TieBreaker {
    pub fn new(num_hospitals: usize, num_helpers: usize) -> Self {
        let max_total_rank = (num_hospitals * num_helpers * num_helpers) as f64;
        TieBreaker {
            epsilon: 0.5 / (max_total_rank + 1.0),
            num_helpers,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn is_reliable(&self) -> bool {
        self.epsilon >= MIN_RELIABLE_EPSILON
    }

    pub fn penalty(&self, hospital: HospitalIdx, helper: HelperIdx) -> f64 {
        let rank = hospital.get() * self.num_helpers + helper.get() + 1;
        self.epsilon * rank as f64
    }
}
