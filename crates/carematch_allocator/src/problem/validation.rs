//! Sanity checks run on raw hospital and helper records before any model is
//! built. The first violation found is reported; hospitals are checked before
//! helpers and records are visited in input order.

use fxhash::FxHashSet;
use thiserror::Error;

use crate::problem::{helper::Helper, hospital::Hospital, skill::Skill};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hospital at position {position} has an empty id")]
    EmptyHospitalId { position: usize },

    #[error("helper at position {position} has an empty id")]
    EmptyHelperId { position: usize },

    #[error("duplicate hospital id '{0}'")]
    DuplicateHospitalId(String),

    #[error("duplicate helper id '{0}'")]
    DuplicateHelperId(String),

    #[error("'{id}' has a non-finite coordinate")]
    NonFiniteCoordinate { id: String },

    #[error("hospital '{hospital_id}' has negative demand {count} for skill '{skill}'")]
    NegativeDemand {
        hospital_id: String,
        skill: Skill,
        count: i64,
    },

    #[error("helper '{helper_id}' has no skills")]
    EmptySkills { helper_id: String },

    #[error(
        "hospital '{hospital_id}' has no demand entry for skill '{skill}' offered by helper '{helper_id}'"
    )]
    MissingDemandEntry {
        hospital_id: String,
        skill: Skill,
        helper_id: String,
    },
}

pub fn validate(hospitals: &[Hospital], helpers: &[Helper]) -> Result<(), ValidationError> {
    validate_hospitals(hospitals)?;
    validate_helpers(helpers)?;
    validate_demand_coverage(hospitals, helpers)
}

fn validate_hospitals(hospitals: &[Hospital]) -> Result<(), ValidationError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for (position, hospital) in hospitals.iter().enumerate() {
        let id = hospital.external_id();
        if id.is_empty() {
            return Err(ValidationError::EmptyHospitalId { position });
        }

        if !seen.insert(id) {
            return Err(ValidationError::DuplicateHospitalId(id.to_owned()));
        }

        if !hospital.location().is_finite() {
            return Err(ValidationError::NonFiniteCoordinate { id: id.to_owned() });
        }

        if let Some((skill, count)) = hospital
            .sorted_demand()
            .into_iter()
            .find(|(_, count)| *count < 0)
        {
            return Err(ValidationError::NegativeDemand {
                hospital_id: id.to_owned(),
                skill: skill.clone(),
                count,
            });
        }
    }

    Ok(())
}

fn validate_helpers(helpers: &[Helper]) -> Result<(), ValidationError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for (position, helper) in helpers.iter().enumerate() {
        let id = helper.external_id();
        if id.is_empty() {
            return Err(ValidationError::EmptyHelperId { position });
        }

        if !seen.insert(id) {
            return Err(ValidationError::DuplicateHelperId(id.to_owned()));
        }

        if !helper.location().is_finite() {
            return Err(ValidationError::NonFiniteCoordinate { id: id.to_owned() });
        }

        if helper.skills().is_empty() {
            return Err(ValidationError::EmptySkills {
                helper_id: id.to_owned(),
            });
        }
    }

    Ok(())
}

/// Every skill offered by any helper needs an explicit entry in every hospital's
/// demand map, otherwise the capacity rows would not limit that helper.
fn validate_demand_coverage(
    hospitals: &[Hospital],
    helpers: &[Helper],
) -> Result<(), ValidationError> {
    for hospital in hospitals {
        for helper in helpers {
            if let Some(skill) = helper
                .sorted_skills()
                .into_iter()
                .find(|skill| !hospital.has_demand_entry(skill))
            {
                return Err(ValidationError::MissingDemandEntry {
                    hospital_id: hospital.external_id().to_owned(),
                    skill: skill.clone(),
                    helper_id: helper.external_id().to_owned(),
                });
            }
        }
    }

    Ok(())
}
