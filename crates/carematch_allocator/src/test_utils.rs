use std::{fs::File, path::PathBuf};

use crate::{
    json::types::JsonAllocationProblem,
    problem::{
        allocation_problem::{AllocationProblem, AllocationProblemBuilder},
        helper::{Helper, HelperBuilder},
        hospital::{Hospital, HospitalBuilder},
        location::Location,
    },
};

pub fn create_hospital(id: &str, (lat, lon): (f64, f64), demand: &[(&str, i64)]) -> Hospital {
    let mut builder = HospitalBuilder::new(id, Location::from_lat_lon(lat, lon));
    for &(skill, count) in demand {
        builder.add_demand(skill, count);
    }
    builder.build()
}

pub fn create_helper(id: &str, (lat, lon): (f64, f64), skills: &[&str]) -> Helper {
    let mut builder = HelperBuilder::new(id, Location::from_lat_lon(lat, lon));
    for &skill in skills {
        builder.add_skill(skill);
    }
    builder.build()
}

pub fn create_problem(hospitals: Vec<Hospital>, helpers: Vec<Helper>) -> AllocationProblem {
    let mut builder = AllocationProblemBuilder::default();
    builder.set_hospitals(hospitals).set_helpers(helpers);
    builder.build().unwrap()
}

pub fn fixture_path(fixture: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture)
}

pub fn create_problem_from_json_file(fixture: &str) -> AllocationProblem {
    let file = File::open(fixture_path(fixture)).unwrap();
    let json: JsonAllocationProblem = serde_json::from_reader(file).unwrap();
    json.build_problem(false).unwrap()
}
