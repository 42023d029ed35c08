use fxhash::FxHashSet;

use crate::{
    define_index_newtype,
    problem::{location::Location, skill::Skill},
};

define_index_newtype!(HelperIdx, Helper);

/// A volunteer offering one or more skills.
#[derive(Debug, Clone)]
pub struct Helper {
    external_id: String,
    location: Location,
    skills: FxHashSet<Skill>,
}

impl Helper {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn has_skill(&self, skill: &Skill) -> bool {
        self.skills.contains(skill)
    }

    pub fn sorted_skills(&self) -> Vec<&Skill> {
        let mut skills: Vec<&Skill> = self.skills.iter().collect();
        skills.sort();
        skills
    }
}

pub struct HelperBuilder {
    external_id: String,
    location: Location,
    skills: Vec<Skill>,
}

impl HelperBuilder {
    pub fn new(external_id: impl Into<String>, location: Location) -> Self {
        HelperBuilder {
            external_id: external_id.into(),
            location,
            skills: Vec::new(),
        }
    }

    pub fn set_skills(&mut self, skills: Vec<String>) -> &mut HelperBuilder {
        self.skills = skills.into_iter().map(Skill::new).collect();
        self
    }

    pub fn add_skill(&mut self, skill: impl Into<Skill>) -> &mut HelperBuilder {
        self.skills.push(skill.into());
        self
    }

    pub fn build(self) -> Helper {
        Helper {
            external_id: self.external_id,
            location: self.location,
            skills: FxHashSet::from_iter(self.skills),
        }
    }
}
