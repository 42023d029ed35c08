use fxhash::FxHashSet;
use tracing::{debug, instrument};

use crate::{
    problem::{
        helper::{Helper, HelperIdx},
        hospital::{Hospital, HospitalIdx},
        location::Location,
        skill::Skill,
        travel_cost_matrix::{Cost, TravelCostMatrix},
        validation::{ValidationError, validate},
    },
    utils::enumerate_idx::EnumerateIdx,
};

/// A validated snapshot of hospitals and helpers, ready to be modelled.
#[derive(Debug, Clone)]
pub struct AllocationProblem {
    hospitals: Vec<Hospital>,
    helpers: Vec<Helper>,
    skills: Vec<Skill>,
    travel_costs: TravelCostMatrix,
}

impl AllocationProblem {
    fn new(hospitals: Vec<Hospital>, helpers: Vec<Helper>) -> Self {
        let hospital_locations: Vec<Location> = hospitals.iter().map(|h| *h.location()).collect();
        let helper_locations: Vec<Location> = helpers.iter().map(|h| *h.location()).collect();
        let travel_costs = TravelCostMatrix::from_locations(&hospital_locations, &helper_locations);

        let mut skills: Vec<Skill> = hospitals
            .iter()
            .flat_map(|hospital| hospital.demand().keys())
            .chain(helpers.iter().flat_map(|helper| helper.skills().iter()))
            .collect::<FxHashSet<&Skill>>()
            .into_iter()
            .cloned()
            .collect();
        skills.sort();

        Self {
            hospitals,
            helpers,
            skills,
            travel_costs,
        }
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    pub fn hospital(&self, index: HospitalIdx) -> &Hospital {
        &self.hospitals[index]
    }

    pub fn hospitals_iter(&self) -> impl Iterator<Item = (HospitalIdx, &Hospital)> {
        self.hospitals.iter().enumerate_idx()
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.helpers
    }

    pub fn helper(&self, index: HelperIdx) -> &Helper {
        &self.helpers[index]
    }

    pub fn helpers_iter(&self) -> impl Iterator<Item = (HelperIdx, &Helper)> {
        self.helpers.iter().enumerate_idx()
    }

    /// Every skill mentioned by a hospital or a helper, sorted.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn travel_cost(&self, hospital: HospitalIdx, helper: HelperIdx) -> Cost {
        self.travel_costs.travel_cost(hospital, helper)
    }

    pub fn travel_costs(&self) -> &TravelCostMatrix {
        &self.travel_costs
    }

    pub fn num_hospitals(&self) -> usize {
        self.hospitals.len()
    }

    pub fn num_helpers(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty() || self.helpers.is_empty()
    }
}

#[derive(Default)]
pub struct AllocationProblemBuilder {
    hospitals: Vec<Hospital>,
    helpers: Vec<Helper>,
    implicit_zero_demand: bool,
}

impl AllocationProblemBuilder {
    pub fn set_hospitals(&mut self, hospitals: Vec<Hospital>) -> &mut AllocationProblemBuilder {
        self.hospitals = hospitals;
        self
    }

    pub fn add_hospital(&mut self, hospital: Hospital) -> &mut AllocationProblemBuilder {
        self.hospitals.push(hospital);
        self
    }

    pub fn set_helpers(&mut self, helpers: Vec<Helper>) -> &mut AllocationProblemBuilder {
        self.helpers = helpers;
        self
    }

    pub fn add_helper(&mut self, helper: Helper) -> &mut AllocationProblemBuilder {
        self.helpers.push(helper);
        self
    }

    /// When enabled, skills offered by helpers but absent from a hospital's
    /// demand map are added to it with a demand of zero instead of failing
    /// validation with [`ValidationError::MissingDemandEntry`].
    pub fn set_implicit_zero_demand(&mut self, enabled: bool) -> &mut AllocationProblemBuilder {
        self.implicit_zero_demand = enabled;
        self
    }

    #[instrument(skip_all, level = "debug", fields(hospitals = self.hospitals.len(), helpers = self.helpers.len()))]
    pub fn build(self) -> Result<AllocationProblem, ValidationError> {
        let mut hospitals = self.hospitals;
        let helpers = self.helpers;

        if self.implicit_zero_demand {
            let offered: FxHashSet<&Skill> = helpers
                .iter()
                .flat_map(|helper| helper.skills().iter())
                .collect();

            for hospital in hospitals.iter_mut() {
                for skill in &offered {
                    hospital.insert_zero_demand(skill);
                }
            }
        }

        validate(&hospitals, &helpers)?;

        let problem = AllocationProblem::new(hospitals, helpers);
        debug!(
            skills = problem.skills().len(),
            max_cost = problem.travel_costs().max_cost(),
            "Built allocation problem"
        );

        Ok(problem)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_helper, create_hospital};

    use super::*;

    #[test]
    fn test_build_collects_sorted_skills() {
        let mut builder = AllocationProblemBuilder::default();
        builder
            .add_hospital(create_hospital(
                "H1",
                (0.0, 0.0),
                &[("medical", 1), ("admin", 0), ("hotline", 2)],
            ))
            .add_helper(create_helper("W1", (0.0, 1.0), &["medical", "admin"]));

        let problem = builder.build().unwrap();

        let skills: Vec<&str> = problem.skills().iter().map(|s| s.as_str()).collect();
        assert_eq!(skills, vec!["admin", "hotline", "medical"]);
        assert_eq!(problem.num_hospitals(), 1);
        assert_eq!(problem.num_helpers(), 1);
        assert_eq!(
            problem.travel_cost(HospitalIdx::new(0), HelperIdx::new(0)),
            10
        );
    }

    #[test]
    fn test_build_rejects_missing_demand_entry() {
        let mut builder = AllocationProblemBuilder::default();
        builder
            .add_hospital(create_hospital("H1", (0.0, 0.0), &[("medical", 1)]))
            .add_helper(create_helper("W1", (0.0, 0.0), &["logistic"]));

        assert!(matches!(
            builder.build(),
            Err(ValidationError::MissingDemandEntry { .. })
        ));
    }

    #[test]
    fn test_build_fills_implicit_zero_demand() {
        let mut builder = AllocationProblemBuilder::default();
        builder
            .add_hospital(create_hospital("H1", (0.0, 0.0), &[("medical", 1)]))
            .add_helper(create_helper("W1", (0.0, 0.0), &["logistic", "medical"]))
            .set_implicit_zero_demand(true);

        let problem = builder.build().unwrap();
        let hospital = problem.hospital(HospitalIdx::new(0));

        assert_eq!(hospital.demand_for(&Skill::from("logistic")), Some(0));
        assert_eq!(hospital.demand_for(&Skill::from("medical")), Some(1));
    }

    #[test]
    fn test_empty_problem() {
        let problem = AllocationProblemBuilder::default().build().unwrap();
        assert!(problem.is_empty());
        assert!(problem.skills().is_empty());
    }
}
