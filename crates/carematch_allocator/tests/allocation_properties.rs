use std::{collections::HashMap, fs::File, path::PathBuf};

use carematch_allocator::{
    json::types::{JsonAllocationProblem, JsonAllocationResult},
    problem::{
        allocation_problem::{AllocationProblem, AllocationProblemBuilder},
        helper::{Helper, HelperBuilder},
        hospital::{Hospital, HospitalBuilder},
        location::Location,
        validation::ValidationError,
    },
    solver::{
        allocation_result::AllocationResult, allocator::allocate, solve_status::SolveStatus,
        solver_params::AllocatorParams,
    },
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

const SKILLS: [&str; 3] = ["admin", "logistic", "medical"];

fn hospital(id: &str, lat: f64, lon: f64, demand: &[(&str, i64)]) -> Hospital {
    let mut builder = HospitalBuilder::new(id, Location::from_lat_lon(lat, lon));
    for &(skill, count) in demand {
        builder.add_demand(skill, count);
    }
    builder.build()
}

fn helper(id: &str, lat: f64, lon: f64, skills: &[&str]) -> Helper {
    let mut builder = HelperBuilder::new(id, Location::from_lat_lon(lat, lon));
    for &skill in skills {
        builder.add_skill(skill);
    }
    builder.build()
}

fn build(hospitals: Vec<Hospital>, helpers: Vec<Helper>) -> Result<AllocationProblem, ValidationError> {
    let mut builder = AllocationProblemBuilder::default();
    builder.set_hospitals(hospitals).set_helpers(helpers);
    builder.build()
}

fn random_instance(rng: &mut SmallRng, num_hospitals: usize, num_helpers: usize) -> (Vec<Hospital>, Vec<Helper>) {
    let hospitals = (0..num_hospitals)
        .map(|index| {
            let demand: Vec<(&str, i64)> = SKILLS
                .iter()
                .map(|&skill| (skill, rng.random_range(0..3)))
                .collect();
            hospital(
                &format!("H{index}"),
                rng.random_range(48.0..54.0),
                rng.random_range(6.0..14.0),
                &demand,
            )
        })
        .collect();

    let helpers = (0..num_helpers)
        .map(|index| {
            let skills: Vec<&str> = SKILLS
                .iter()
                .copied()
                .filter(|_| rng.random_bool(0.4))
                .collect();
            let skills = if skills.is_empty() {
                vec![SKILLS[index % SKILLS.len()]]
            } else {
                skills
            };
            helper(
                &format!("W{index}"),
                rng.random_range(48.0..54.0),
                rng.random_range(6.0..14.0),
                &skills,
            )
        })
        .collect();

    (hospitals, helpers)
}

fn assert_invariants(hospitals: &[Hospital], helpers: &[Helper], result: &AllocationResult) {
    let helpers_by_id: HashMap<&str, &Helper> =
        helpers.iter().map(|h| (h.external_id(), h)).collect();
    let hospitals_by_id: HashMap<&str, &Hospital> =
        hospitals.iter().map(|h| (h.external_id(), h)).collect();

    // Uniqueness
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for allocation in result.allocations() {
        for helper_id in &allocation.helper_ids {
            assert!(
                seen.insert(helper_id.as_str(), allocation.hospital_id.as_str()).is_none(),
                "{helper_id} assigned twice"
            );
        }
    }

    // Capacity
    for allocation in result.allocations() {
        let hospital = hospitals_by_id[allocation.hospital_id.as_str()];
        for (skill, demand) in hospital.sorted_demand() {
            let count = allocation
                .helper_ids
                .iter()
                .filter(|id| helpers_by_id[id.as_str()].has_skill(skill))
                .count() as i64;
            assert!(count <= demand, "{} over capacity for {skill}", hospital.external_id());
        }
    }

    // Objective consistency
    let helpers_by_id = &helpers_by_id;
    let expected: i64 = result
        .allocations()
        .iter()
        .flat_map(|allocation| {
            let hospital = hospitals_by_id[allocation.hospital_id.as_str()];
            allocation.helper_ids.iter().map(move |id| {
                100 - hospital
                    .location()
                    .travel_cost(helpers_by_id[id.as_str()].location())
            })
        })
        .sum();
    assert_eq!(result.objective(), Some(expected));

    // Presentation
    let hospital_ids: Vec<&str> = result
        .allocations()
        .iter()
        .map(|a| a.hospital_id.as_str())
        .collect();
    let input_ids: Vec<&str> = hospitals.iter().map(|h| h.external_id()).collect();
    assert_eq!(hospital_ids, input_ids);
    for allocation in result.allocations() {
        assert!(allocation.helper_ids.is_sorted());
    }
}

#[test]
fn test_single_pair_scenario() {
    let problem = build(
        vec![hospital("H1", 0.0, 0.0, &[("medical", 1)])],
        vec![helper("W1", 0.0, 0.0, &["medical"])],
    )
    .unwrap();

    let result = allocate(problem, AllocatorParams::default()).unwrap();

    assert_eq!(result.objective(), Some(100));
    assert_eq!(result.allocations().len(), 1);
    assert_eq!(result.allocations()[0].hospital_id, "H1");
    assert_eq!(result.allocations()[0].helper_ids, vec!["W1"]);
}

#[test]
fn test_reward_dominates_distance() {
    let problem = build(
        vec![
            hospital("H_far", 3.0, 0.0, &[("medical", 1)]),
            hospital("H_near", 0.0, 0.0, &[("medical", 1)]),
        ],
        vec![helper("W1", 0.0, 0.0, &["medical"])],
    )
    .unwrap();

    let result = allocate(problem, AllocatorParams::default()).unwrap();

    assert_eq!(result.objective(), Some(100));
    assert!(result.helper_ids_for("H_far").unwrap().is_empty());
    assert_eq!(result.helper_ids_for("H_near").unwrap(), &["W1"]);
}

#[test]
fn test_far_match_beats_no_match() {
    let problem = build(
        vec![hospital("H1", 0.0, 0.0, &[("medical", 1)])],
        vec![helper("W1", 5.0, 0.0, &["medical"])],
    )
    .unwrap();

    let result = allocate(problem, AllocatorParams::default()).unwrap();

    assert_eq!(result.objective(), Some(50));
    assert_eq!(result.assignment_count(), 1);
}

#[test]
fn test_missing_demand_entry_is_rejected() {
    let result = build(
        vec![hospital("H1", 0.0, 0.0, &[("medical", 1)])],
        vec![helper("W1", 0.0, 0.0, &["medical", "logistic"])],
    );

    assert!(matches!(
        result,
        Err(ValidationError::MissingDemandEntry { .. })
    ));
}

#[test]
fn test_empty_inputs() {
    let no_helpers = build(vec![hospital("H1", 0.0, 0.0, &[("medical", 2)])], vec![]).unwrap();
    let result = allocate(no_helpers, AllocatorParams::default()).unwrap();
    assert_eq!(result.objective(), Some(0));
    assert!(result.allocations().iter().all(|a| a.helper_ids.is_empty()));

    let no_hospitals = build(vec![], vec![helper("W1", 0.0, 0.0, &["medical"])]).unwrap();
    let result = allocate(no_hospitals, AllocatorParams::default()).unwrap();
    assert_eq!(result.objective(), Some(0));
    assert!(result.allocations().is_empty());
}

#[test]
fn test_zero_demand_blocks_multi_skill_helper() {
    // W1 offers medical and admin: at H1 it would also consume admin capacity,
    // of which there is none, so it goes to the farther H2.
    let problem = build(
        vec![
            hospital("H1", 0.0, 0.0, &[("medical", 1), ("admin", 0)]),
            hospital("H2", 1.0, 0.0, &[("medical", 1), ("admin", 1)]),
        ],
        vec![helper("W1", 0.0, 0.0, &["medical", "admin"])],
    )
    .unwrap();

    let result = allocate(problem, AllocatorParams::default()).unwrap();

    assert_eq!(result.objective(), Some(90));
    assert_eq!(result.helper_ids_for("H2").unwrap(), &["W1"]);
    assert_eq!(result.matches()[0].skills, vec!["admin", "medical"]);
}

#[test]
fn test_random_instances_respect_invariants() {
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..20 {
        let num_hospitals = rng.random_range(1..4);
        let num_helpers = rng.random_range(1..9);
        let (hospitals, helpers) = random_instance(&mut rng, num_hospitals, num_helpers);

        let problem = build(hospitals.clone(), helpers.clone()).unwrap();
        let result = allocate(problem, AllocatorParams::default()).unwrap();

        assert_eq!(result.status(), SolveStatus::Optimal);
        assert_invariants(&hospitals, &helpers, &result);
    }
}

#[test]
fn test_adding_a_helper_never_decreases_the_objective() {
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..15 {
        let num_hospitals = rng.random_range(1..4);
        let num_helpers = rng.random_range(1..7);
        let (hospitals, mut helpers) = random_instance(&mut rng, num_hospitals, num_helpers + 1);
        let extra = helpers.pop().unwrap();

        let before = allocate(
            build(hospitals.clone(), helpers.clone()).unwrap(),
            AllocatorParams::default(),
        )
        .unwrap();

        helpers.push(extra);
        let after = allocate(build(hospitals, helpers).unwrap(), AllocatorParams::default()).unwrap();

        assert!(after.objective() >= before.objective());
    }
}

#[test]
fn test_tie_breaking_is_reproducible() {
    // Two identical hospitals and one helper: both assignments are optimal.
    let hospitals = vec![
        hospital("H1", 1.0, 0.0, &[("medical", 1)]),
        hospital("H2", 1.0, 0.0, &[("medical", 1)]),
    ];
    let helpers = vec![helper("W1", 0.0, 0.0, &["medical"])];
    let params = AllocatorParams {
        tie_breaking: true,
        ..AllocatorParams::default()
    };

    let first = allocate(build(hospitals.clone(), helpers.clone()).unwrap(), params.clone()).unwrap();
    let second = allocate(build(hospitals, helpers).unwrap(), params).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.objective(), Some(90));
    // The penalty grows with the hospital index, so the first hospital wins.
    assert_eq!(first.helper_ids_for("H1").unwrap(), &["W1"]);
}

#[test]
fn test_tie_breaking_with_many_equal_assignments() {
    // Every pair costs nothing, so every way to fill the 12 slots ties.
    let hospitals: Vec<Hospital> = (0..4)
        .map(|index| hospital(&format!("H{index}"), 0.0, 0.0, &[("medical", 3)]))
        .collect();
    let helpers: Vec<Helper> = (0..24)
        .map(|index| helper(&format!("W{index:02}"), 0.0, 0.0, &["medical"]))
        .collect();
    let params = AllocatorParams {
        tie_breaking: true,
        ..AllocatorParams::default()
    };

    let first = allocate(build(hospitals.clone(), helpers.clone()).unwrap(), params.clone()).unwrap();
    let second = allocate(build(hospitals.clone(), helpers.clone()).unwrap(), params).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.objective(), Some(1200));
    assert_invariants(&hospitals, &helpers, &first);
    assert!(first.allocations().iter().all(|a| a.helper_ids.len() == 3));

    // Lower helper indices are preferred.
    let mut assigned: Vec<&str> = first
        .allocations()
        .iter()
        .flat_map(|a| a.helper_ids.iter().map(String::as_str))
        .collect();
    assigned.sort();
    let expected: Vec<String> = (0..12).map(|index| format!("W{index:02}")).collect();
    assert_eq!(assigned, expected);
}

#[test]
fn test_german_regional_example_from_json() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/germany.json");
    let input: JsonAllocationProblem = serde_json::from_reader(File::open(path).unwrap()).unwrap();
    let problem = input.build_problem(false).unwrap();
    let hospitals = problem.hospitals().to_vec();
    let helpers = problem.helpers().to_vec();

    let result = allocate(problem, AllocatorParams::default()).unwrap();

    assert_eq!(result.objective(), Some(1033));
    assert_eq!(result.assignment_count(), 12);
    assert_invariants(&hospitals, &helpers, &result);

    let output = serde_json::to_value(JsonAllocationResult::from(&result)).unwrap();
    assert_eq!(output["status"], "optimal");
    assert_eq!(output["allocations"][1]["helper_ids"][0], "Student Luckenwalde");
}
