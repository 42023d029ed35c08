use fxhash::FxHashMap;

use crate::{
    define_index_newtype,
    problem::{location::Location, skill::Skill},
};

define_index_newtype!(HospitalIdx, Hospital);

/// A hospital and the number of helpers it needs per skill.
#[derive(Debug, Clone)]
pub struct Hospital {
    external_id: String,
    location: Location,
    demand: FxHashMap<Skill, i64>,
}

impl Hospital {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn demand(&self) -> &FxHashMap<Skill, i64> {
        &self.demand
    }

    pub fn demand_for(&self, skill: &Skill) -> Option<i64> {
        self.demand.get(skill).copied()
    }

    pub fn has_demand_entry(&self, skill: &Skill) -> bool {
        self.demand.contains_key(skill)
    }

    /// Demand entries ordered by skill, so that models built from the same
    /// hospital are identical.
    pub fn sorted_demand(&self) -> Vec<(&Skill, i64)> {
        let mut demand: Vec<(&Skill, i64)> = self
            .demand
            .iter()
            .map(|(skill, &count)| (skill, count))
            .collect();
        demand.sort_by(|a, b| a.0.cmp(b.0));
        demand
    }

    pub(crate) fn insert_zero_demand(&mut self, skill: &Skill) {
        self.demand.entry(skill.clone()).or_insert(0);
    }
}

pub struct HospitalBuilder {
    external_id: String,
    location: Location,
    demand: FxHashMap<Skill, i64>,
}

impl HospitalBuilder {
    pub fn new(external_id: impl Into<String>, location: Location) -> Self {
        HospitalBuilder {
            external_id: external_id.into(),
            location,
            demand: FxHashMap::default(),
        }
    }

    pub fn set_demand(&mut self, demand: FxHashMap<Skill, i64>) -> &mut HospitalBuilder {
        self.demand = demand;
        self
    }

    pub fn add_demand(&mut self, skill: impl Into<Skill>, count: i64) -> &mut HospitalBuilder {
        self.demand.insert(skill.into(), count);
        self
    }

    pub fn build(self) -> Hospital {
        Hospital {
            external_id: self.external_id,
            location: self.location,
            demand: self.demand,
        }
    }
}
