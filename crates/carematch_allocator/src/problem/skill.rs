use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Opaque capability tag such as `"medical"` or `"logistic"`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Skill(String);

impl Skill {
    pub fn new(skill: String) -> Self {
        Skill(skill)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Skill {
    fn from(value: &str) -> Self {
        Skill(value.to_owned())
    }
}

impl From<String> for Skill {
    fn from(value: String) -> Self {
        Skill(value)
    }
}
