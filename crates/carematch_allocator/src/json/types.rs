use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    problem::{
        allocation_problem::{AllocationProblem, AllocationProblemBuilder},
        helper::{Helper, HelperBuilder},
        hospital::{Hospital, HospitalBuilder},
        location::Location,
        skill::Skill,
        validation::ValidationError,
    },
    solver::{
        allocation_result::{AllocationResult, HospitalAllocation, Match},
        solve_status::SolveStatus,
    },
};

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "AllocationProblem")]
pub struct JsonAllocationProblem {
    pub hospitals: Vec<JsonHospital>,
    pub helpers: Vec<JsonHelper>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Hospital")]
pub struct JsonHospital {
    pub id: String,
    /// `[latitude, longitude]`
    pub location: [f64; 2],
    /// Number of helpers required per skill. Every skill offered by a helper
    /// must be listed, use zero when the hospital does not need it.
    pub demand: BTreeMap<String, i64>,
}

impl From<JsonHospital> for Hospital {
    fn from(value: JsonHospital) -> Self {
        let mut builder = HospitalBuilder::new(value.id, Location::from(value.location));
        builder.set_demand(
            value
                .demand
                .into_iter()
                .map(|(skill, count)| (Skill::new(skill), count))
                .collect(),
        );
        builder.build()
    }
}

impl From<&Hospital> for JsonHospital {
    fn from(value: &Hospital) -> Self {
        JsonHospital {
            id: value.external_id().to_owned(),
            location: [value.location().lat(), value.location().lon()],
            demand: value
                .demand()
                .iter()
                .map(|(skill, &count)| (skill.to_string(), count))
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields, rename = "Helper")]
pub struct JsonHelper {
    pub id: String,
    /// `[latitude, longitude]`
    pub location: [f64; 2],
    pub skills: Vec<String>,
}

impl From<JsonHelper> for Helper {
    fn from(value: JsonHelper) -> Self {
        let mut builder = HelperBuilder::new(value.id, Location::from(value.location));
        builder.set_skills(value.skills);
        builder.build()
    }
}

impl From<&Helper> for JsonHelper {
    fn from(value: &Helper) -> Self {
        JsonHelper {
            id: value.external_id().to_owned(),
            location: [value.location().lat(), value.location().lon()],
            skills: value
                .sorted_skills()
                .into_iter()
                .map(|skill| skill.to_string())
                .collect(),
        }
    }
}

impl JsonAllocationProblem {
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(
        self,
        implicit_zero_demand: bool,
    ) -> Result<AllocationProblem, ValidationError> {
        let mut builder = AllocationProblemBuilder::default();

        builder
            .set_hospitals(self.hospitals.into_iter().map(Hospital::from).collect())
            .set_helpers(self.helpers.into_iter().map(Helper::from).collect())
            .set_implicit_zero_demand(implicit_zero_demand);

        builder.build()
    }

    pub fn from_problem(problem: &AllocationProblem) -> Self {
        JsonAllocationProblem {
            hospitals: problem.hospitals().iter().map(JsonHospital::from).collect(),
            helpers: problem.helpers().iter().map(JsonHelper::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "AllocationResult")]
pub struct JsonAllocationResult {
    /// `100 * assignments - total travel cost`, `null` when no assignment exists.
    pub objective: Option<i64>,
    pub status: SolveStatus,
    pub allocations: Vec<JsonHospitalAllocation>,
    pub matches: Vec<JsonMatch>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "HospitalAllocation")]
pub struct JsonHospitalAllocation {
    pub hospital_id: String,
    pub helper_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Match")]
pub struct JsonMatch {
    pub hospital_id: String,
    pub helper_id: String,
    pub skills: Vec<String>,
}

impl From<&HospitalAllocation> for JsonHospitalAllocation {
    fn from(value: &HospitalAllocation) -> Self {
        JsonHospitalAllocation {
            hospital_id: value.hospital_id.clone(),
            helper_ids: value.helper_ids.clone(),
        }
    }
}

impl From<&Match> for JsonMatch {
    fn from(value: &Match) -> Self {
        JsonMatch {
            hospital_id: value.hospital_id.clone(),
            helper_id: value.helper_id.clone(),
            skills: value.skills.clone(),
        }
    }
}

impl From<&AllocationResult> for JsonAllocationResult {
    fn from(value: &AllocationResult) -> Self {
        JsonAllocationResult {
            objective: value.objective(),
            status: value.status(),
            allocations: value
                .allocations()
                .iter()
                .map(JsonHospitalAllocation::from)
                .collect(),
            matches: value.matches().iter().map(JsonMatch::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::solver::{allocator::allocate, solver_params::AllocatorParams};

    use super::*;

    #[test]
    fn test_parse_and_solve() {
        let input: JsonAllocationProblem = serde_json::from_value(json!({
            "hospitals": [{"id": "H1", "location": [0.0, 0.0], "demand": {"medical": 1}}],
            "helpers": [{"id": "W1", "location": [0.0, 0.0], "skills": ["medical"]}]
        }))
        .unwrap();

        let problem = input.build_problem(false).unwrap();
        let result = allocate(problem, AllocatorParams::default()).unwrap();
        let output = serde_json::to_value(JsonAllocationResult::from(&result)).unwrap();

        assert_eq!(
            output,
            json!({
                "objective": 100,
                "status": "optimal",
                "allocations": [{"hospital_id": "H1", "helper_ids": ["W1"]}],
                "matches": [{"hospital_id": "H1", "helper_id": "W1", "skills": ["medical"]}]
            })
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let input = serde_json::from_value::<JsonAllocationProblem>(json!({
            "hospitals": [{"id": "H1", "location": [0.0, 0.0], "demand": {}, "beds": 3}],
            "helpers": []
        }));

        assert!(input.is_err());
    }

    #[test]
    fn test_location_is_lat_lon() {
        let helper = Helper::from(JsonHelper {
            id: "W1".to_owned(),
            location: [50.9, 6.9],
            skills: vec!["medical".to_owned()],
        });

        assert_eq!(helper.location().lat(), 50.9);
        assert_eq!(helper.location().lon(), 6.9);

        let json = JsonHelper::from(&helper);
        assert_eq!(json.location, [50.9, 6.9]);
        assert_eq!(json.skills, vec!["medical"]);
    }

    #[test]
    fn test_missing_demand_entry_from_json() {
        let input: JsonAllocationProblem = serde_json::from_value(json!({
            "hospitals": [{"id": "H1", "location": [0.0, 0.0], "demand": {"medical": 1}}],
            "helpers": [{"id": "W1", "location": [0.0, 0.0], "skills": ["medical", "admin"]}]
        }))
        .unwrap();

        assert!(matches!(
            input.build_problem(false),
            Err(ValidationError::MissingDemandEntry { .. })
        ));
    }
}
